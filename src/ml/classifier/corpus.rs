//! Training corpora: labeled examples, loaders and cleaning.
//!
//! A CSV corpus has a header row naming its columns; the text and label
//! columns are picked by name and every other column is ignored:
//! ```csv
//! content,sentiment
//! "I can't wait to see you!",joy
//! "Please send the report by Friday.",neutral
//! ```
//! A JSON corpus is an array of `{"text": .., "label": ..}` objects.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

use crate::config::TrainingConfig;
use crate::error::{Result, ToneError};

/// A (text, label) pair used for training.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledExample {
    /// Free text.
    pub text: String,
    /// Corpus-defined label.
    pub label: String,
}

impl LabeledExample {
    pub fn new<T: Into<String>, L: Into<String>>(text: T, label: L) -> Self {
        LabeledExample {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Load a corpus file, choosing the format from its extension.
///
/// `.json` files are read as JSON arrays; anything else is read as CSV with
/// the column names from `config`.
pub fn load_corpus<P: AsRef<Path>>(path: P, config: &TrainingConfig) -> Result<Vec<LabeledExample>> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        load_json(path)
    } else {
        load_csv(path, &config.text_column, &config.label_column)
    }
}

/// Load a JSON array of labeled examples.
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledExample>> {
    let content = std::fs::read_to_string(path)?;
    let examples: Vec<LabeledExample> = serde_json::from_str(&content)?;
    Ok(examples)
}

/// Load a CSV corpus from a file.
pub fn load_csv<P: AsRef<Path>>(
    path: P,
    text_column: &str,
    label_column: &str,
) -> Result<Vec<LabeledExample>> {
    let file = File::open(path)?;
    read_csv(file, text_column, label_column)
}

/// Read a CSV corpus from any reader.
///
/// Rows missing either column yield an example with an empty field, which
/// [`clean_corpus`] later drops.
pub fn read_csv<R: Read>(
    reader: R,
    text_column: &str,
    label_column: &str,
) -> Result<Vec<LabeledExample>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header.trim() == name)
            .ok_or_else(|| ToneError::data_quality(format!("corpus has no '{name}' column")))
    };
    let text_idx = column(text_column)?;
    let label_idx = column(label_column)?;

    let mut examples = Vec::new();
    for record in reader.records() {
        let record = record?;
        examples.push(LabeledExample {
            text: record.get(text_idx).unwrap_or_default().to_string(),
            label: record.get(label_idx).unwrap_or_default().to_string(),
        });
    }

    Ok(examples)
}

/// Clean a raw corpus for training.
///
/// Text and label are trimmed; rows with an empty label or a text of at most
/// `min_text_length` characters are dropped; text is lower-cased.
pub fn clean_corpus(examples: Vec<LabeledExample>, min_text_length: usize) -> Vec<LabeledExample> {
    examples
        .into_iter()
        .filter_map(|example| {
            let text = example.text.trim();
            let label = example.label.trim();
            if text.is_empty() || label.is_empty() || text.chars().count() <= min_text_length {
                return None;
            }
            Some(LabeledExample::new(text.to_lowercase(), label))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_csv_by_column_name() {
        let data = "id,content,tone\n1,\"Hello, team!\",Friendly\n2,Urgent: reply now,Urgent\n3,no label here\n";
        let examples = read_csv(data.as_bytes(), "content", "tone").unwrap();

        assert_eq!(examples.len(), 3);
        assert_eq!(examples[0], LabeledExample::new("Hello, team!", "Friendly"));
        assert_eq!(examples[2].label, "");
    }

    #[test]
    fn test_missing_column_is_data_quality_error() {
        let data = "text,label\nhello,joy\n";
        let err = read_csv(data.as_bytes(), "content", "sentiment").unwrap_err();
        assert!(matches!(err, ToneError::DataQuality(_)));
    }

    #[test]
    fn test_clean_corpus() {
        let examples = vec![
            LabeledExample::new("  Thanks For The Update  ", " joy "),
            LabeledExample::new("short", "joy"),
            LabeledExample::new("a perfectly long sentence", ""),
            LabeledExample::new("   ", "fear"),
        ];

        let cleaned = clean_corpus(examples.clone(), 10);
        assert_eq!(cleaned, vec![LabeledExample::new("thanks for the update", "joy")]);

        let cleaned = clean_corpus(examples, 0);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[1].text, "short");
    }

    #[test]
    fn test_load_corpus_by_extension() {
        let mut json = NamedTempFile::with_suffix(".json").unwrap();
        write!(json, r#"[{{"text": "all good", "label": "calm"}}]"#).unwrap();
        let examples = load_corpus(json.path(), &TrainingConfig::tone()).unwrap();
        assert_eq!(examples, vec![LabeledExample::new("all good", "calm")]);

        let mut csv = NamedTempFile::with_suffix(".csv").unwrap();
        write!(csv, "content,sentiment\nso happy today,joy\n").unwrap();
        let examples = load_corpus(csv.path(), &TrainingConfig::emotion()).unwrap();
        assert_eq!(examples, vec![LabeledExample::new("so happy today", "joy")]);
    }
}
