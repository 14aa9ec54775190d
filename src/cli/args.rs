//! Command line argument parsing for the Tonescope CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::ml::classifier::ModelKind;

/// Tonescope - psychological tone profiles for short texts
#[derive(Parser, Debug, Clone)]
#[command(name = "tonescope")]
#[command(about = "Emotion, tone, sentiment and formality analysis for emails")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TonescopeArgs {
    /// Verbosity level (repeat for more: -v warn, -vv info, -vvv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "TONESCOPE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the trained models (overrides the config file)
    #[arg(long, value_name = "DIR", env = "TONESCOPE_MODELS_DIR", global = true)]
    pub models_dir: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl TonescopeArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a classifier from a labeled corpus
    Train(TrainArgs),

    /// Compute the full tone profile of a text
    Analyze(AnalyzeArgs),

    /// Predict a label with one trained classifier
    Predict(PredictArgs),

    /// Compute the formality score of a text
    Formality(TextArgs),

    /// Compute the sentiment vector of a text
    Sentiment(TextArgs),

    /// Show the trained classifiers and their metrics
    Info,
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Classifier to train
    #[arg(short, long, value_enum)]
    pub kind: ModelKind,

    /// Corpus file (CSV, or JSON array of objects)
    #[arg(value_name = "CORPUS")]
    pub corpus: PathBuf,
}

/// Arguments for analysis
#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Text to analyze
    #[arg(value_name = "TEXT", required_unless_present = "file", conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the text from a file instead
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Treat every non-blank line of the input as a separate text
    #[arg(long)]
    pub lines: bool,
}

/// Arguments for a single prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Classifier to apply
    #[arg(short, long, value_enum)]
    pub kind: ModelKind,

    /// Text to classify
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Also show the decision score of every label
    #[arg(long)]
    pub scores: bool,
}

/// A single text argument
#[derive(Parser, Debug, Clone)]
pub struct TextArgs {
    /// Text to score
    #[arg(value_name = "TEXT")]
    pub text: String,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_text() {
        let args = TonescopeArgs::try_parse_from(["tonescope", "analyze", "Hello there"]).unwrap();

        assert_eq!(args.verbosity(), 1);
        assert_eq!(args.output_format, OutputFormat::Human);
        match args.command {
            Command::Analyze(analyze) => {
                assert_eq!(analyze.text.as_deref(), Some("Hello there"));
                assert!(analyze.file.is_none());
            }
            other => panic!("Expected Analyze command, got {other:?}"),
        }
    }

    #[test]
    fn test_analyze_requires_input() {
        assert!(TonescopeArgs::try_parse_from(["tonescope", "analyze"]).is_err());
        assert!(
            TonescopeArgs::try_parse_from([
                "tonescope",
                "analyze",
                "Hello",
                "--file",
                "mail.txt"
            ])
            .is_err()
        );
    }

    #[test]
    fn test_train_kind() {
        let args = TonescopeArgs::try_parse_from([
            "tonescope",
            "train",
            "--kind",
            "tone",
            "data/tone.csv",
        ])
        .unwrap();

        match args.command {
            Command::Train(train) => {
                assert_eq!(train.kind, ModelKind::Tone);
                assert_eq!(train.corpus, PathBuf::from("data/tone.csv"));
            }
            other => panic!("Expected Train command, got {other:?}"),
        }

        assert!(
            TonescopeArgs::try_parse_from(["tonescope", "train", "--kind", "mood", "x.csv"])
                .is_err()
        );
    }

    #[test]
    fn test_global_flags() {
        let args = TonescopeArgs::try_parse_from([
            "tonescope",
            "predict",
            "--kind",
            "emotion",
            "Great work",
            "-f",
            "json",
            "--pretty",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.output_format, OutputFormat::Json);
        assert!(args.pretty);
        assert_eq!(args.verbosity(), 2);

        let args = TonescopeArgs::try_parse_from(["tonescope", "-q", "-vvv", "info"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }
}
