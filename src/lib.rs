//! # Tonescope
//!
//! Psychological tone profiling for short English documents such as
//! emails.
//!
//! ## Features
//!
//! - Trainable emotion and tone classifiers (TF-IDF features with linear
//!   models) persisted as atomically replaced artifacts
//! - Lexicon and rule based sentiment scoring
//! - Heuristic formality scoring with tunable weights
//! - Rule based feedback, style suggestions and a radar vector
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use tonescope::config::ToneConfig;
//! use tonescope::ml::classifier::ModelStore;
//! use tonescope::profile::ToneProfiler;
//! use tonescope::storage::memory::MemoryStorage;
//!
//! let store = ModelStore::new(Arc::new(MemoryStorage::default()));
//! let profiler = ToneProfiler::with_store(ToneConfig::default(), store);
//!
//! let profile = profiler.analyze("Dear team, thank you for the excellent work this quarter.");
//! assert!(profile.sentiment.compound > 0.0);
//! assert_eq!(profile.radar.values().len(), 5);
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod ml;
pub mod profile;
pub mod scoring;
pub mod storage;

pub mod prelude {
    pub use crate::config::ToneConfig;
    pub use crate::error::{Result, ToneError};
    pub use crate::ml::classifier::{LabeledExample, ModelKind, ModelStore, Prediction};
    pub use crate::profile::{ToneProfile, ToneProfiler};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
