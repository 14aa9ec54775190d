//! Output formatting for CLI commands.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cli::args::{OutputFormat, TonescopeArgs};
use crate::error::Result;
use crate::ml::classifier::{EvaluationReport, ModelKind};
use crate::profile::{RadarVector, ToneProfile};

/// Result structure for a training run.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub kind: ModelKind,
    pub model_path: String,
    pub trainer: String,
    pub labels: Vec<String>,
    pub vocabulary_size: usize,
    pub duration_ms: u64,
    pub report: EvaluationReport,
}

/// Result structure for a single prediction.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResult {
    pub kind: ModelKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<Vec<LabelScore>>,
}

/// Decision score of one label.
#[derive(Debug, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// State of one model slot.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    pub kind: ModelKind,
    pub trained: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trainer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result structure for the info command.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelsInfo {
    pub models_dir: String,
    pub models: Vec<ModelInfo>,
}

/// Output a result in the selected format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &TonescopeArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!("{message}");
                println!();
            }
            let value = serde_json::to_value(result)?;
            print!("{}", render_human(&value, 0));
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output tone profiles: a single profile as one object, several as an
/// array.
pub fn output_profiles(profiles: &[ToneProfile], args: &TonescopeArgs) -> Result<()> {
    match (args.output_format, profiles) {
        (OutputFormat::Json, [profile]) => output_json(profile, args),
        (OutputFormat::Json, _) => output_json(&profiles, args),
        (OutputFormat::Human, _) => {
            for (i, profile) in profiles.iter().enumerate() {
                if profiles.len() > 1 {
                    println!("Text {}", i + 1);
                    println!("══════");
                }
                print!("{}", render_profile(profile));
                if i + 1 < profiles.len() {
                    println!();
                }
            }
            Ok(())
        }
    }
}

/// Output in JSON format.
fn output_json<T: Serialize + ?Sized>(result: &T, args: &TonescopeArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Human-readable report of a tone profile.
pub fn render_profile(profile: &ToneProfile) -> String {
    let mut out = String::new();
    out.push_str(&format!("Emotion:    {}\n", profile.emotion));
    out.push_str(&format!("Tone:       {}\n", profile.tone));
    out.push_str(&format!("Formality:  {:.2}/100\n", profile.formality));
    out.push_str(&format!(
        "Sentiment:  compound {:.3} (neg {:.3}, neu {:.3}, pos {:.3})\n",
        profile.sentiment.compound,
        profile.sentiment.negative,
        profile.sentiment.neutral,
        profile.sentiment.positive
    ));

    out.push_str("\nFeedback:\n");
    for line in &profile.feedback {
        out.push_str(&format!("  - {line}\n"));
    }
    out.push_str("\nSuggestions:\n");
    for line in &profile.suggestions {
        out.push_str(&format!("  - {line}\n"));
    }

    out.push_str("\nRadar:\n");
    out.push_str(&render_radar(&profile.radar));

    if !profile.warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        for warning in &profile.warnings {
            out.push_str(&format!("  ! {warning}\n"));
        }
    }
    out
}

/// One bar per radar axis, twenty cells wide.
fn render_radar(radar: &RadarVector) -> String {
    const WIDTH: usize = 20;

    radar
        .axes()
        .map(|(label, value)| {
            let filled = (value * WIDTH as f64).round() as usize;
            format!(
                "  {label:<11}{}{} {value:.2}\n",
                "█".repeat(filled),
                "░".repeat(WIDTH - filled.min(WIDTH))
            )
        })
        .collect()
}

/// Render a JSON value as indented `key: value` lines.
fn render_human(value: &Value, indent: usize) -> String {
    let pad = "  ".repeat(indent);
    match value {
        Value::Object(obj) => {
            let mut out = String::new();
            for (key, val) in obj {
                match val {
                    Value::Object(inner) if !inner.is_empty() => {
                        out.push_str(&format!("{pad}{key}:\n"));
                        out.push_str(&render_human(val, indent + 1));
                    }
                    Value::Array(items) if items.iter().any(Value::is_object) => {
                        out.push_str(&format!("{pad}{key}:\n"));
                        for item in items {
                            out.push_str(&render_human(item, indent + 1));
                            out.push('\n');
                        }
                    }
                    _ => out.push_str(&format!("{pad}{key}: {}\n", format_value(val))),
                }
            }
            out
        }
        Value::Array(items) => items.iter().map(|item| render_human(item, indent)).collect(),
        _ => format!("{pad}{}\n", format_value(value)),
    }
}

/// Format a JSON value for human output.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format!("{f:.4}"),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        Value::Object(obj) if obj.is_empty() => "{}".to_string(),
        Value::Object(_) => "[object]".to_string(),
        Value::Null => "null".to_string(),
    }
}

/// Per-label counts as `label=count` pairs.
pub fn format_distribution(distribution: &BTreeMap<String, usize>) -> String {
    distribution
        .iter()
        .map(|(label, count)| format!("{label}={count}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::sentiment::SentimentVector;

    fn profile() -> ToneProfile {
        let sentiment = SentimentVector {
            negative: 0.0,
            neutral: 0.5,
            positive: 0.5,
            compound: 0.6,
        };
        ToneProfile {
            emotion: "joy".to_string(),
            tone: "Error".to_string(),
            sentiment,
            formality: 72.5,
            feedback: vec!["Looks good.".to_string()],
            suggestions: vec!["None.".to_string()],
            radar: RadarVector::new(&sentiment, 72.5),
            warnings: vec!["no tone model".to_string()],
        }
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&Value::String("test".to_string())), "test");
        assert_eq!(format_value(&Value::from(42)), "42");
        assert_eq!(format_value(&Value::from(0.5)), "0.5000");
        assert_eq!(format_value(&Value::Bool(false)), "false");
        assert_eq!(format_value(&Value::Null), "null");
        assert_eq!(format_value(&serde_json::json!(["a", "b"])), "[a, b]");
    }

    #[test]
    fn test_render_human_nests_objects() {
        let value = serde_json::json!({ "kind": "tone", "report": { "accuracy": 0.75 } });
        assert_eq!(render_human(&value, 0), "kind: tone\nreport:\n  accuracy: 0.7500\n");
    }

    #[test]
    fn test_render_profile() {
        let rendered = render_profile(&profile());

        assert!(rendered.contains("Emotion:    joy"));
        assert!(rendered.contains("Formality:  72.50/100"));
        assert!(rendered.contains("  - Looks good."));
        assert!(rendered.contains("  Formality  "));
        assert!(rendered.contains("  ! no tone model"));
    }

    #[test]
    fn test_render_radar_bars() {
        let radar = profile().radar;
        let lines: Vec<String> = render_radar(&radar).lines().map(str::to_string).collect();

        assert_eq!(lines.len(), 5);
        // positivity 0.5 fills half the bar
        assert!(lines[1].contains(&format!("{}{}", "█".repeat(10), "░".repeat(10))));
    }

    #[test]
    fn test_format_distribution() {
        let mut distribution = BTreeMap::new();
        distribution.insert("joy".to_string(), 3);
        distribution.insert("fear".to_string(), 2);
        assert_eq!(format_distribution(&distribution), "fear=2, joy=3");
    }
}
