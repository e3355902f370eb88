use std::sync::Arc;
use ndarray::{Array4, ArrayView1, ArrayView3};

use super::error::ClassifierError;
use super::loader::ModelLoader;
use super::model::ImageModel;
use super::preprocess::{preprocess, INPUT_SHAPE};
use super::utils::argmax;
use crate::labels::LabelSet;

/// Top label of one inference call.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Member of the label set
    pub label: String,
    /// Position of `label` in the label set and the model output
    pub index: usize,
    /// Winning probability scaled to 0..=100
    pub confidence: f32,
}

/// Picks the label with the highest probability.
///
/// The first maximum wins ties. `confidence` is the maximum probability times 100.
///
/// # Errors
/// - `PredictionError` if the vector length differs from the label set
/// - `PredictionError` if the vector has no comparable value
pub fn top_prediction(
    probabilities: ArrayView1<'_, f32>,
    labels: &LabelSet,
) -> Result<Prediction, ClassifierError> {
    if probabilities.len() != labels.len() {
        return Err(ClassifierError::PredictionError(format!(
            "Model returned {} scores for {} labels",
            probabilities.len(),
            labels.len()
        )));
    }

    let (index, probability) = argmax(probabilities).ok_or_else(|| {
        ClassifierError::PredictionError("Model output has no finite scores".into())
    })?;
    let label = labels
        .get(index)
        .ok_or_else(|| ClassifierError::PredictionError(format!("No label at index {}", index)))?;

    Ok(Prediction {
        label: label.to_string(),
        index,
        confidence: probability * 100.0,
    })
}

/// Runs the shared model and maps its output onto a label set.
#[derive(Debug, Clone)]
pub struct Classifier {
    labels: LabelSet,
    loader: Arc<ModelLoader>,
}

impl Classifier {
    pub fn new(labels: LabelSet, loader: Arc<ModelLoader>) -> Self {
        Self { labels, loader }
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn loader(&self) -> &Arc<ModelLoader> {
        &self.loader
    }

    /// Returns the model, loading it on first use.
    ///
    /// # Errors
    /// - `ModelUnavailable` if the model cannot be loaded
    pub fn ensure_ready(&self) -> Result<Arc<dyn ImageModel>, ClassifierError> {
        self.loader
            .get()
            .map_err(|e| ClassifierError::ModelUnavailable(e.to_string()))
    }

    /// Classifies an already preprocessed `(1, 150, 150, 3)` tensor.
    pub fn predict(&self, tensor: &Array4<f32>) -> Result<Prediction, ClassifierError> {
        if tensor.shape() != INPUT_SHAPE {
            return Err(ClassifierError::InputFormat(format!(
                "Expected tensor of shape {:?}, got {:?}",
                INPUT_SHAPE,
                tensor.shape()
            )));
        }

        let model = self.ensure_ready()?;
        let probabilities = model.predict(tensor)?;
        let prediction = top_prediction(probabilities.view(), &self.labels)?;
        log::debug!(
            "Predicted '{}' (index {}) with {:.2}% confidence",
            prediction.label,
            prediction.index,
            prediction.confidence
        );
        Ok(prediction)
    }

    /// Preprocesses a raw RGBA pixel buffer and classifies it.
    pub fn classify(&self, buffer: ArrayView3<'_, u8>) -> Result<Prediction, ClassifierError> {
        let tensor = preprocess(buffer)?;
        self.predict(&tensor)
    }
}
