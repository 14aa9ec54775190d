//! TF-IDF vectorizer for text feature extraction.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::analysis::{Analyzer, EnglishAnalyzer};
use crate::config::VectorizerConfig;
use crate::error::{Result, ToneError};

/// Sparse feature vector: `(feature index, value)` pairs sorted by index.
pub type SparseVector = Vec<(usize, f64)>;

static TERMS_WITHOUT_STOP_WORDS: LazyLock<EnglishAnalyzer> = LazyLock::new(EnglishAnalyzer::default);

static TERMS_WITH_STOP_WORDS: LazyLock<EnglishAnalyzer> = LazyLock::new(|| {
    EnglishAnalyzer::keeping_stop_words().expect("term pattern should be valid")
});

/// TF-IDF vectorizer over word n-grams.
///
/// Text is lower-cased and split into terms of two or more word
/// characters; stop words are optionally removed before n-grams are built.
/// The vocabulary is pruned by document frequency and then limited to the
/// most frequent terms. Feature values are raw counts times the smoothed
/// idf `ln((1 + n) / (1 + df)) + 1`, L2-normalised per document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StoredVectorizer")]
pub struct TfIdfVectorizer {
    /// Settings the vectorizer was fitted with.
    config: VectorizerConfig,
    /// Term -> feature index, indices follow term order.
    vocabulary: BTreeMap<String, usize>,
    /// Inverse document frequency per feature index.
    idf: Vec<f64>,
}

#[derive(Deserialize)]
struct StoredVectorizer {
    config: VectorizerConfig,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TryFrom<StoredVectorizer> for TfIdfVectorizer {
    type Error = ToneError;

    fn try_from(stored: StoredVectorizer) -> Result<Self> {
        // every term owns a distinct idf slot
        let n_features = stored.idf.len();
        if stored.vocabulary.len() != n_features {
            return Err(ToneError::prediction(format!(
                "vocabulary has {} terms but idf has {n_features} weights",
                stored.vocabulary.len()
            )));
        }
        let mut seen = vec![false; n_features];
        for (term, &idx) in &stored.vocabulary {
            if idx >= n_features || std::mem::replace(&mut seen[idx], true) {
                return Err(ToneError::prediction(format!(
                    "term {term:?} has invalid feature index {idx}"
                )));
            }
        }

        Ok(TfIdfVectorizer {
            config: stored.config,
            vocabulary: stored.vocabulary,
            idf: stored.idf,
        })
    }
}

impl TfIdfVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new(config: VectorizerConfig) -> Self {
        TfIdfVectorizer {
            config,
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
        }
    }

    /// Fit the vocabulary and idf weights on training documents.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        if documents.is_empty() {
            return Err(ToneError::data_quality("cannot fit a vectorizer on zero documents"));
        }

        let mut document_frequency: AHashMap<String, usize> = AHashMap::new();
        let mut corpus_frequency: AHashMap<String, usize> = AHashMap::new();

        for doc in documents {
            let terms = self.terms(doc)?;
            let mut seen = AHashSet::new();
            for term in terms {
                if seen.insert(term.clone()) {
                    *document_frequency.entry(term.clone()).or_insert(0) += 1;
                }
                *corpus_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let n_documents = documents.len();
        let max_doc_count = self.config.max_df * n_documents as f64;

        let mut candidates: Vec<&String> = document_frequency
            .iter()
            .filter(|&(_, &df)| df >= self.config.min_df && df as f64 <= max_doc_count)
            .map(|(term, _)| term)
            .collect();
        candidates.sort();

        if let Some(max_features) = self.config.max_features {
            // stable sort keeps alphabetical order among equal frequencies
            candidates.sort_by(|a, b| corpus_frequency[*b].cmp(&corpus_frequency[*a]));
            candidates.truncate(max_features);
            candidates.sort();
        }

        if candidates.is_empty() {
            return Err(ToneError::data_quality(
                "no terms left after document frequency pruning",
            ));
        }

        let n = n_documents as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(candidates.len());
        for (idx, term) in candidates.into_iter().enumerate() {
            let df = document_frequency[term] as f64;
            idf.push(((1.0 + n) / (1.0 + df)).ln() + 1.0);
            vocabulary.insert(term.clone(), idx);
        }

        log::debug!(
            "Fitted TF-IDF vocabulary of {} terms on {} documents",
            vocabulary.len(),
            n_documents
        );

        self.vocabulary = vocabulary;
        self.idf = idf;

        Ok(())
    }

    /// Transform a document into an L2-normalised TF-IDF vector.
    ///
    /// Out-of-vocabulary terms are ignored; a document without known terms
    /// yields an empty vector.
    pub fn transform(&self, document: &str) -> Result<SparseVector> {
        if self.vocabulary.is_empty() {
            return Err(ToneError::prediction("vectorizer has not been fitted"));
        }

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.terms(document)? {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut features: SparseVector = counts
            .into_iter()
            .map(|(idx, count)| (idx, count * self.idf[idx]))
            .collect();

        let norm = features.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, value) in &mut features {
                *value /= norm;
            }
        }

        Ok(features)
    }

    /// Fit on the documents and transform each of them.
    pub fn fit_transform(&mut self, documents: &[String]) -> Result<Vec<SparseVector>> {
        self.fit(documents)?;
        documents.iter().map(|doc| self.transform(doc)).collect()
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Feature names in feature index order.
    pub fn feature_names(&self) -> Vec<&str> {
        self.vocabulary.keys().map(String::as_str).collect()
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    /// Analyze a document into unigrams and n-grams.
    fn terms(&self, document: &str) -> Result<Vec<String>> {
        let analyzer: &EnglishAnalyzer = if self.config.stop_words {
            &TERMS_WITHOUT_STOP_WORDS
        } else {
            &TERMS_WITH_STOP_WORDS
        };
        let tokens = analyzer.terms(document)?;

        let (low, high) = self.config.ngram_range;
        let mut terms = Vec::new();
        for n in low..=high {
            if n == 0 || n > tokens.len() {
                continue;
            }
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }

        Ok(terms)
    }
}
