mod error;
mod utils;
mod model;
mod loader;
mod classifier;
pub mod preprocess;

pub use error::ClassifierError;
pub use model::{ImageModel, OnnxModel};
pub use loader::{ModelLoader, ModelSource, OnnxModelSource};
pub use classifier::{top_prediction, Classifier, Prediction};
pub use preprocess::{count_distinct_values, is_blank, preprocess, INPUT_SHAPE, INPUT_SIZE};
