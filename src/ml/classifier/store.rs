//! Artifact slots keyed by model kind.

use std::path::Path;
use std::sync::Arc;

use super::ModelKind;
use super::artifact::ClassifierArtifact;
use crate::error::{Result, ToneError};
use crate::storage::file::FileStorageConfig;
use crate::storage::{Storage, StorageConfig, StorageFactory, StorageLock};

/// Reads and atomically replaces the persisted classifier of each kind.
///
/// A save writes the serialized artifact to a temporary output, syncs it
/// and renames it over the slot, so readers see either the previous
/// artifact or the new one and never a partial write.
#[derive(Debug, Clone)]
pub struct ModelStore {
    storage: Arc<dyn Storage>,
}

impl ModelStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        ModelStore { storage }
    }

    /// Open a store backed by a directory, creating it when missing.
    pub fn open<P: AsRef<Path>>(directory: P) -> Result<Self> {
        Self::with_config(StorageConfig::File(FileStorageConfig::new(directory)))
    }

    /// Open a store on whichever backend `config` selects.
    pub fn with_config(config: StorageConfig) -> Result<Self> {
        Ok(Self::new(StorageFactory::create(config)?))
    }

    /// Check whether an artifact of this kind has been persisted.
    pub fn exists(&self, kind: ModelKind) -> bool {
        self.storage.file_exists(&kind.file_name())
    }

    /// Load the artifact of a kind.
    ///
    /// Fails with [`ToneError::ModelNotFound`] when the slot is empty, and
    /// with [`ToneError::Prediction`] when it holds an unreadable or
    /// inconsistent artifact.
    pub fn load(&self, kind: ModelKind) -> Result<ClassifierArtifact> {
        let name = kind.file_name();
        if !self.storage.file_exists(&name) {
            return Err(ToneError::model_not_found(kind));
        }

        let input = self.storage.open_input(&name)?;
        let artifact: ClassifierArtifact = serde_json::from_reader(input)
            .map_err(|e| ToneError::prediction(format!("corrupt {kind} artifact: {e}")))?;

        if artifact.kind() != kind {
            return Err(ToneError::prediction(format!(
                "slot {name} holds a {} artifact",
                artifact.kind()
            )));
        }

        Ok(artifact)
    }

    /// Persist an artifact into its kind's slot, replacing any previous one.
    pub fn save(&self, artifact: &ClassifierArtifact) -> Result<()> {
        let kind = artifact.kind();
        let (temp_name, mut output) = self.storage.create_temp_output(kind.as_str())?;

        let written = serde_json::to_writer(&mut output, artifact)
            .map_err(ToneError::from)
            .and_then(|_| output.finish());
        drop(output);

        if let Err(e) = written.and_then(|_| self.storage.rename_file(&temp_name, &kind.file_name()))
        {
            if let Err(cleanup) = self.storage.delete_file(&temp_name) {
                log::warn!("Failed to remove temporary artifact {temp_name}: {cleanup}");
            }
            return Err(e);
        }

        log::info!("Saved {kind} artifact to {}", kind.file_name());
        Ok(())
    }

    /// Remove the artifact of a kind, if any.
    pub fn delete(&self, kind: ModelKind) -> Result<()> {
        self.storage.delete_file(&kind.file_name())
    }

    /// Take the exclusive training lock of a kind.
    ///
    /// The lock is released when the returned guard is dropped.
    pub fn lock_training(&self, kind: ModelKind) -> Result<Box<dyn StorageLock>> {
        self.storage.acquire_lock(&kind.lock_name()).map_err(|e| {
            ToneError::storage(format!("{kind} training already in progress ({e})"))
        })
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VectorizerConfig;
    use crate::ml::classifier::linear::LinearModel;
    use crate::ml::classifier::metrics::EvaluationReport;
    use crate::ml::classifier::tfidf::TfIdfVectorizer;
    use crate::storage::memory::MemoryStorage;

    fn artifact(kind: ModelKind) -> ClassifierArtifact {
        let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig {
            ngram_range: (1, 1),
            ..VectorizerConfig::default()
        });
        vectorizer
            .fit(&["great news".to_string(), "awful news".to_string()])
            .unwrap();
        // features: awful, great, news
        let model = LinearModel::new(
            vec!["negative".to_string(), "positive".to_string()],
            vec![vec![1.0, -1.0, 0.0], vec![-1.0, 1.0, 0.0]],
            vec![0.0, 0.0],
        )
        .unwrap();
        ClassifierArtifact::new(kind, vectorizer, model, EvaluationReport::default(), "manual")
            .unwrap()
    }

    #[test]
    fn test_load_empty_slot_is_model_not_found() {
        let store = ModelStore::new(Arc::new(MemoryStorage::default()));
        assert!(!store.exists(ModelKind::Emotion));
        assert!(matches!(
            store.load(ModelKind::Emotion),
            Err(ToneError::ModelNotFound {
                kind: ModelKind::Emotion
            })
        ));
    }

    #[test]
    fn test_save_and_load_round_trip_on_disk() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = ModelStore::open(temp_dir.path()).unwrap();

        store.save(&artifact(ModelKind::Tone)).unwrap();
        let loaded = store.load(ModelKind::Tone).unwrap();

        assert_eq!(loaded.predict("great").unwrap(), "positive");
        assert_eq!(loaded.predict("awful").unwrap(), "negative");
        assert!(loaded.supports_label("positive"));
        assert!(!loaded.supports_label("joy"));
        assert!(!store.exists(ModelKind::Emotion));

        // only the slot remains, no temporary files
        let files = store.storage().list_files().unwrap();
        assert_eq!(files, vec!["tone.model.json".to_string()]);
    }

    #[test]
    fn test_corrupt_artifact_is_prediction_error() {
        let storage = Arc::new(MemoryStorage::default());
        storage.put("emotion.model.json", b"{ not json");
        let store = ModelStore::new(storage);

        let err = store.load(ModelKind::Emotion).unwrap_err();
        assert!(matches!(err, ToneError::Prediction(_)));
        assert!(err.to_string().contains("corrupt emotion artifact"));
    }

    #[test]
    fn test_slot_holding_other_kind_is_rejected() {
        let storage = Arc::new(MemoryStorage::default());
        let bytes = serde_json::to_vec(&artifact(ModelKind::Tone)).unwrap();
        storage.put("emotion.model.json", &bytes);
        let store = ModelStore::new(storage);

        assert!(matches!(
            store.load(ModelKind::Emotion),
            Err(ToneError::Prediction(_))
        ));
    }

    #[test]
    fn test_store_on_configured_backend() {
        let store = ModelStore::with_config(StorageConfig::default()).unwrap();
        store.save(&artifact(ModelKind::Emotion)).unwrap();
        assert!(store.exists(ModelKind::Emotion));
        assert_eq!(store.load(ModelKind::Emotion).unwrap().predict("great").unwrap(), "positive");
    }

    #[test]
    fn test_training_lock_is_exclusive_per_kind() {
        let store = ModelStore::new(Arc::new(MemoryStorage::default()));
        let _guard = store.lock_training(ModelKind::Tone).unwrap();

        assert!(store.lock_training(ModelKind::Tone).is_err());
        assert!(store.lock_training(ModelKind::Emotion).is_ok());
    }
}
