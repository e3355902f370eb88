use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use ndarray::{Array1, Array4};
use ort::session::Session;
use ort::value::{Tensor, ValueType};

use super::error::ClassifierError;
use crate::model_manager::ModelError;
use crate::runtime::{create_session_builder, RuntimeConfig};

/// A pre-trained image classifier treated as a black box: given a normalized
/// `(1, 150, 150, 3)` tensor it returns one probability per label.
///
/// Implementations are shared between sessions and must be `Send + Sync`.
pub trait ImageModel: Send + Sync + fmt::Debug {
    fn predict(&self, tensor: &Array4<f32>) -> Result<Array1<f32>, ClassifierError>;
}

/// An [`ImageModel`] backed by an ONNX Runtime session.
///
/// The model is expected to:
/// - Accept a single float input of shape [1, 150, 150, 3] (NHWC)
/// - Output a probability vector of shape [1, num_labels]
#[derive(Debug)]
pub struct OnnxModel {
    pub model_path: String,
    session: Session,
    input_name: String,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<OnnxModel>();
    }
};

impl OnnxModel {
    /// Builds a session from the artifact at `path` and checks its signature.
    ///
    /// When `expected_outputs` is set, a model whose last output dimension is
    /// fixed to a different size is rejected as corrupt.
    pub fn from_file(
        path: &Path,
        config: &RuntimeConfig,
        expected_outputs: Option<usize>,
    ) -> Result<Self, ModelError> {
        let session = create_session_builder(config)
            .and_then(|builder| builder.commit_from_file(path))
            .map_err(|e| {
                log::error!("Failed to build session from {:?}: {}", path, e);
                ModelError::Corrupt(e.to_string())
            })?;

        if session.inputs.len() != 1 {
            return Err(ModelError::Corrupt(format!(
                "Model must have exactly one input, found {}",
                session.inputs.len()
            )));
        }
        if session.outputs.is_empty() {
            return Err(ModelError::Corrupt("Model has no outputs".into()));
        }
        if let (Some(expected), ValueType::Tensor { dimensions, .. }) =
            (expected_outputs, &session.outputs[0].output_type)
        {
            check_output_size(dimensions, expected)?;
        }
        let input_name = session.inputs[0].name.clone();
        log::info!("Model loaded from {:?} (input '{}')", path, input_name);

        Ok(Self {
            model_path: path.to_string_lossy().to_string(),
            session,
            input_name,
        })
    }
}

impl ImageModel for OnnxModel {
    fn predict(&self, tensor: &Array4<f32>) -> Result<Array1<f32>, ClassifierError> {
        let input_dyn = tensor.clone().into_dyn();
        let input = input_dyn.as_standard_layout();

        let mut input_tensors = HashMap::new();
        input_tensors.insert(
            self.input_name.as_str(),
            Tensor::from_array(&input).map_err(|e| {
                ClassifierError::ModelError(format!("Failed to create input tensor: {}", e))
            })?,
        );

        let outputs = self
            .session
            .run(input_tensors)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to run model: {}", e)))?;
        let output = outputs[0].try_extract_tensor::<f32>().map_err(|e| {
            ClassifierError::ModelError(format!("Failed to extract output tensor: {}", e))
        })?;

        if output.shape().first().copied().unwrap_or(0) != 1 {
            return Err(ClassifierError::PredictionError(format!(
                "Expected a single batch in model output, got shape {:?}",
                output.shape()
            )));
        }
        Ok(output.iter().copied().collect())
    }
}

/// Compares the declared output shape with the label count. Dynamic (negative)
/// dimensions are accepted and left to the per-prediction check.
pub(crate) fn check_output_size(dimensions: &[i64], expected: usize) -> Result<(), ModelError> {
    match dimensions.last() {
        Some(&size) if size >= 0 && size as usize != expected => Err(ModelError::Corrupt(format!(
            "Model outputs {} scores but {} labels are configured",
            size, expected
        ))),
        _ => Ok(()),
    }
}
