//! Machine learning components.
//!
//! The [`classifier`] module holds the trainable text classification
//! subsystem used for both the emotion and the tone signal.

pub mod classifier;
