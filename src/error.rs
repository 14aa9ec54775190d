//! Error types for the Tonescope library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`ToneError`] enum. Heuristic scorers never produce errors; the
//! classification subsystem fails hard while training and fails soft while
//! predicting (see [`crate::ml::classifier::Prediction`]).
//!
//! ```
//! use tonescope::error::{Result, ToneError};
//! use tonescope::ml::classifier::ModelKind;
//!
//! fn require_corpus(rows: usize) -> Result<usize> {
//!     if rows == 0 {
//!         return Err(ToneError::data_quality("corpus has no usable rows"));
//!     }
//!     Ok(rows)
//! }
//!
//! assert!(require_corpus(0).is_err());
//! let missing = ToneError::model_not_found(ModelKind::Emotion);
//! assert!(missing.to_string().contains("emotion"));
//! ```

use std::io;

use thiserror::Error;

use crate::ml::classifier::ModelKind;

/// The main error type for Tonescope operations.
#[derive(Error, Debug)]
pub enum ToneError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No persisted classifier exists for the requested kind.
    #[error("Model not found: no {kind} model has been trained yet, run training first")]
    ModelNotFound { kind: ModelKind },

    /// The training corpus cannot produce a classifier.
    #[error("Data quality error: {0}")]
    DataQuality(String),

    /// Feature transform or decision function failure at inference time.
    #[error("Prediction error: {0}")]
    Prediction(String),

    /// Invalid token pattern or failed filter.
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Backend failure while reading, publishing or locking a slot.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Rejected caller input, such as blank text.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A training run stopped through its cancellation flag.
    #[error("Operation cancelled: {0}")]
    OperationCancelled(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for operations that may fail with ToneError.
pub type Result<T> = std::result::Result<T, ToneError>;

impl ToneError {
    /// No artifact for `kind`.
    pub fn model_not_found(kind: ModelKind) -> Self {
        ToneError::ModelNotFound { kind }
    }

    pub fn data_quality<S: Into<String>>(msg: S) -> Self {
        ToneError::DataQuality(msg.into())
    }

    pub fn prediction<S: Into<String>>(msg: S) -> Self {
        ToneError::Prediction(msg.into())
    }

    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        ToneError::Analysis(msg.into())
    }

    pub fn storage<S: Into<String>>(msg: S) -> Self {
        ToneError::Storage(msg.into())
    }

    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        ToneError::InvalidConfig(msg.into())
    }

    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        ToneError::InvalidArgument(msg.into())
    }

    /// `stage` names where the run stopped.
    pub fn cancelled<S: Into<String>>(stage: S) -> Self {
        ToneError::OperationCancelled(stage.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = ToneError::data_quality("only one label");
        assert_eq!(error.to_string(), "Data quality error: only one label");

        let error = ToneError::storage("disk full");
        assert_eq!(error.to_string(), "Storage error: disk full");

        let error = ToneError::analysis("bad pattern");
        assert_eq!(error.to_string(), "Analysis error: bad pattern");
    }

    #[test]
    fn test_model_not_found_mentions_training() {
        let error = ToneError::model_not_found(ModelKind::Tone);
        let message = error.to_string();
        assert!(message.contains("tone"));
        assert!(message.contains("run training first"));
    }

    #[test]
    fn test_source_conversions() {
        let error: ToneError = io::Error::other("disk unplugged").into();
        assert!(matches!(error, ToneError::Io(_)));

        let error: ToneError = serde_json::from_str::<u32>("{").unwrap_err().into();
        assert!(error.to_string().starts_with("JSON error"));
    }
}
