//! Wires a drawing session to the shared classifier.
//!
//! [`AppContext`] holds the process-wide pieces (model cache, label set,
//! reference data) and is shared by every [`Session`] through an `Arc`. A
//! `Session` owns what belongs to a single user: pen settings and history.

use std::path::Path;
use std::sync::Arc;
use ndarray::ArrayView3;

use crate::canvas::CanvasSettings;
use crate::classifier::{is_blank, preprocess, Classifier, ClassifierError, ModelLoader};
use crate::config::AppConfig;
use crate::history::{History, HistoryLine};
use crate::labels::{capitalize, LabelSet};
use crate::reference::ReferenceData;

/// Process-wide state shared by all sessions.
#[derive(Debug)]
pub struct AppContext {
    classifier: Classifier,
    reference: ReferenceData,
    startup_error: Option<String>,
}

impl AppContext {
    /// Loads reference data and attempts the model load.
    ///
    /// A model that fails to load does not fail construction: the context is
    /// returned in a degraded state with the failure kept for display.
    pub fn new(config: &AppConfig) -> Self {
        let loader = Arc::new(ModelLoader::new(config.model_source()));
        let reference = Self::load_reference(&config.reference_path);
        Self::from_parts(config.labels.clone(), loader, reference)
    }

    pub fn from_parts(labels: LabelSet, loader: Arc<ModelLoader>, reference: ReferenceData) -> Self {
        let startup_error = match loader.get() {
            Ok(_) => None,
            Err(e) => {
                log::error!("Model failed to load, predictions disabled: {}", e);
                Some(e.to_string())
            }
        };
        Self {
            classifier: Classifier::new(labels, loader),
            reference,
            startup_error,
        }
    }

    /// Reference data from `path`, or an empty mapping if it cannot be read.
    pub fn load_reference(path: &Path) -> ReferenceData {
        ReferenceData::load(path).unwrap_or_else(|e| {
            log::warn!("Ignoring reference data at {:?}: {}", path, e);
            ReferenceData::default()
        })
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Why the model could not be loaded at startup, if it could not.
    pub fn startup_error(&self) -> Option<&str> {
        self.startup_error.as_deref()
    }

    pub fn model_ready(&self) -> bool {
        self.classifier.loader().loaded().is_some()
    }

    /// Releases the cached model.
    pub fn shutdown(&self) {
        self.classifier.loader().unload();
    }
}

/// A successful prediction as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionView {
    pub label: String,
    pub display_label: String,
    pub confidence: f32,
    pub description: Option<String>,
}

/// Result of pressing "predict". Nothing here is fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Predicted(PredictionView),
    /// The canvas looks untouched; inference was skipped
    Blank,
    ModelUnavailable(String),
    InvalidInput(String),
    Failed(String),
}

/// One user's interaction state.
#[derive(Debug)]
pub struct Session {
    ctx: Arc<AppContext>,
    settings: CanvasSettings,
    history: History,
}

impl Session {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            settings: CanvasSettings::default(),
            history: History::new(),
        }
    }

    pub fn context(&self) -> &Arc<AppContext> {
        &self.ctx
    }

    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut CanvasSettings {
        &mut self.settings
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_lines(&self) -> Vec<HistoryLine> {
        self.history.render()
    }

    /// Runs the full pipeline on a canvas snapshot.
    ///
    /// Model availability is checked first, then emptiness, then the image is
    /// preprocessed and classified. Only a successful prediction is recorded.
    pub fn predict(&mut self, buffer: ArrayView3<'_, u8>) -> Outcome {
        if let Err(e) = self.ctx.classifier.ensure_ready() {
            log::warn!("Prediction requested without a model: {}", e);
            return Outcome::ModelUnavailable(e.to_string());
        }

        if is_blank(buffer) {
            log::info!("Canvas is blank, skipping inference");
            return Outcome::Blank;
        }

        let tensor = match preprocess(buffer) {
            Ok(tensor) => tensor,
            Err(e) => {
                log::error!("Rejected pixel buffer: {}", e);
                return Outcome::InvalidInput(e.to_string());
            }
        };

        let prediction = match self.ctx.classifier.predict(&tensor) {
            Ok(prediction) => prediction,
            Err(e @ ClassifierError::ModelUnavailable(_)) => {
                return Outcome::ModelUnavailable(e.to_string())
            }
            Err(e) => {
                log::error!("Inference failed: {}", e);
                return Outcome::Failed(e.to_string());
            }
        };

        log::info!(
            "Prediction #{}: {} ({:.2}%)",
            self.history.len() + 1,
            prediction.label,
            prediction.confidence
        );
        self.history.append(prediction.label.clone(), prediction.confidence);

        let description = self
            .ctx
            .reference
            .describe(&prediction.label)
            .map(|d| d.to_string());

        Outcome::Predicted(PredictionView {
            display_label: capitalize(&prediction.label),
            label: prediction.label,
            confidence: prediction.confidence,
            description,
        })
    }
}
