use ort::Error as OrtError;
use std::fmt;

/// Represents the different types of errors that can occur while classifying a drawing.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// The pixel buffer or tensor does not have the expected shape
    InputFormat(String),
    /// The model has not been loaded, or failed to load
    ModelUnavailable(String),
    /// Error occurred while running the model
    ModelError(String),
    /// The model output could not be turned into a prediction
    PredictionError(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputFormat(msg) => write!(f, "Input format error: {}", msg),
            Self::ModelUnavailable(msg) => write!(f, "Model unavailable: {}", msg),
            Self::ModelError(msg) => write!(f, "Model error: {}", msg),
            Self::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}

impl From<OrtError> for ClassifierError {
    fn from(err: OrtError) -> Self {
        ClassifierError::ModelError(err.to_string())
    }
}
