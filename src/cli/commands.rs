//! Command implementations for the Tonescope CLI.

use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::ToneConfig;
use crate::error::{Result, ToneError};
use crate::ml::classifier::{ModelKind, ModelStore};
use crate::profile::ToneProfiler;
use crate::scoring::formality::FormalityScorer;
use crate::scoring::sentiment::SentimentAnalyzer;

/// Execute a CLI command.
pub fn execute_command(args: TonescopeArgs) -> Result<()> {
    let config = load_config(&args)?;

    match &args.command {
        Command::Train(train_args) => train(train_args, config, &args),
        Command::Analyze(analyze_args) => analyze(analyze_args, config, &args),
        Command::Predict(predict_args) => predict(predict_args, config, &args),
        Command::Formality(text_args) => formality(text_args, &config, &args),
        Command::Sentiment(text_args) => sentiment(text_args, &args),
        Command::Info => info(&config, &args),
    }
}

/// Read the configuration file, if any, and apply command line overrides.
pub fn load_config(args: &TonescopeArgs) -> Result<ToneConfig> {
    let config = match &args.config {
        Some(path) => {
            log::debug!("Loading configuration from {}", path.display());
            ToneConfig::load(path)?
        }
        None => ToneConfig::default(),
    };

    Ok(match &args.models_dir {
        Some(dir) => config.with_models_dir(dir),
        None => config,
    })
}

/// Reject blank input before it reaches the analysis core.
pub fn require_text(text: &str) -> Result<&str> {
    if text.trim().is_empty() {
        Err(ToneError::invalid_argument("input text is empty"))
    } else {
        Ok(text)
    }
}

fn train(args: &TrainArgs, config: ToneConfig, cli_args: &TonescopeArgs) -> Result<()> {
    if !args.corpus.exists() {
        return Err(ToneError::invalid_argument(format!(
            "corpus file not found: {}",
            args.corpus.display()
        )));
    }

    let models_dir = config.models_dir.clone();
    let profiler = ToneProfiler::new(config)?;
    let start = Instant::now();
    let artifact = profiler.train_file(args.kind, &args.corpus)?;
    let duration_ms = start.elapsed().as_millis() as u64;

    let report = artifact.report().clone();
    let message = format!(
        "Trained {} model on {} rows ({})",
        args.kind,
        report.train_size + report.validation_size,
        format_distribution(&report.distribution_after)
    );

    output_result(
        &message,
        &TrainingSummary {
            kind: args.kind,
            model_path: models_dir.join(args.kind.file_name()).display().to_string(),
            trainer: artifact.trainer().to_string(),
            labels: artifact.labels().to_vec(),
            vocabulary_size: artifact.vectorizer().vocabulary_size(),
            duration_ms,
            report,
        },
        cli_args,
    )
}

fn analyze(args: &AnalyzeArgs, config: ToneConfig, cli_args: &TonescopeArgs) -> Result<()> {
    let input = match (&args.text, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => read_text_file(path)?,
        (None, None) => return Err(ToneError::invalid_argument("no text given")),
    };

    let texts: Vec<String> = if args.lines {
        input
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect()
    } else {
        vec![require_text(&input)?.to_string()]
    };
    if texts.is_empty() {
        return Err(ToneError::invalid_argument("input holds no non-blank line"));
    }

    let profiler = ToneProfiler::new(config)?;
    let profiles = profiler.analyze_batch(&texts);
    output_profiles(&profiles, cli_args)
}

fn predict(args: &PredictArgs, config: ToneConfig, cli_args: &TonescopeArgs) -> Result<()> {
    let text = require_text(&args.text)?;
    let profiler = ToneProfiler::new(config)?;
    let predictor = profiler.predictor();

    let prediction = predictor.predict(args.kind, text);
    let scores = if args.scores && !prediction.is_degraded() {
        let scores = predictor.predict_scores(args.kind, text)?;
        Some(
            scores
                .into_iter()
                .map(|(label, score)| LabelScore { label, score })
                .collect(),
        )
    } else {
        None
    };

    output_result(
        &format!("{} prediction", args.kind),
        &PredictionResult {
            kind: args.kind,
            label: prediction.label().to_string(),
            degraded: prediction.degradation(),
            scores,
        },
        cli_args,
    )
}

fn formality(args: &TextArgs, config: &ToneConfig, cli_args: &TonescopeArgs) -> Result<()> {
    let text = require_text(&args.text)?;
    let breakdown = FormalityScorer::new(config.formality.clone()).breakdown(text);
    output_result("Formality", &breakdown, cli_args)
}

fn sentiment(args: &TextArgs, cli_args: &TonescopeArgs) -> Result<()> {
    let text = require_text(&args.text)?;
    let scores = SentimentAnalyzer::new().polarity_scores(text);
    output_result("Sentiment", &scores, cli_args)
}

fn info(config: &ToneConfig, cli_args: &TonescopeArgs) -> Result<()> {
    let models_dir = &config.models_dir;
    let models = if models_dir.is_dir() {
        let store = ModelStore::open(models_dir)?;
        ModelKind::ALL
            .iter()
            .map(|&kind| model_info(&store, kind))
            .collect()
    } else {
        ModelKind::ALL.iter().map(|&kind| untrained(kind)).collect()
    };

    output_result(
        &format!("Models in {}", models_dir.display()),
        &ModelsInfo {
            models_dir: models_dir.display().to_string(),
            models,
        },
        cli_args,
    )
}

fn model_info(store: &ModelStore, kind: ModelKind) -> ModelInfo {
    if !store.exists(kind) {
        return untrained(kind);
    }

    match store.load(kind) {
        Ok(artifact) => ModelInfo {
            kind,
            trained: true,
            trainer: Some(artifact.trainer().to_string()),
            trained_at: Some(artifact.trained_at()),
            labels: artifact.labels().to_vec(),
            vocabulary_size: Some(artifact.vectorizer().vocabulary_size()),
            accuracy: Some(artifact.report().accuracy),
            f1: Some(artifact.report().f1),
            error: None,
        },
        Err(e) => ModelInfo {
            error: Some(e.to_string()),
            trained: true,
            ..untrained(kind)
        },
    }
}

fn untrained(kind: ModelKind) -> ModelInfo {
    ModelInfo {
        kind,
        trained: false,
        trainer: None,
        trained_at: None,
        labels: Vec::new(),
        vocabulary_size: None,
        accuracy: None,
        f1: None,
        error: None,
    }
}

fn read_text_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        ToneError::invalid_argument(format!("cannot read {}: {e}", path.display()))
    })
}
