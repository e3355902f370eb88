//! Handwritten Hijaiyah letter recognition.
//!
//! A freehand drawing is captured as an RGBA pixel buffer, reduced to a
//! normalized `(1, 150, 150, 3)` tensor and classified by a pre-trained ONNX
//! model. Each [`Session`] keeps its own prediction history; the model and the
//! letter descriptions live in a shared [`AppContext`].
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hijaiyah::{AppConfig, AppContext, Canvas, Drawing, Session};
//! use hijaiyah::view::render_outcome;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = Arc::new(AppContext::new(&AppConfig::from_env()));
//! let mut session = Session::new(Arc::clone(&ctx));
//!
//! let mut canvas = Canvas::new(session.settings());
//! canvas.draw(&Drawing::from_json_file("alif.json")?, session.settings());
//!
//! let outcome = session.predict(canvas.pixels().view());
//! println!("{}", render_outcome(&outcome));
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! `AppContext` is `Send + Sync` and meant to be shared with `Arc`. The model
//! is loaded once no matter how many sessions ask for it first.

pub mod canvas;
pub mod classifier;
pub mod config;
pub mod console;
pub mod history;
pub mod labels;
pub mod model_manager;
pub mod reference;
mod runtime;
pub mod session;
pub mod view;

pub use canvas::{Canvas, CanvasError, CanvasSettings, Drawing, HexColor, PixelBuffer};
pub use classifier::{
    Classifier, ClassifierError, ImageModel, ModelLoader, ModelSource, OnnxModel, OnnxModelSource,
    Prediction,
};
pub use config::AppConfig;
pub use history::{History, HistoryEntry, HistoryLine};
pub use labels::{LabelError, LabelSet};
pub use model_manager::{ModelError, ModelManager};
pub use reference::{Description, ReferenceData, ReferenceError};
pub use runtime::{create_session_builder, RuntimeConfig};
pub use session::{AppContext, Outcome, PredictionView, Session};

pub fn init_logger() {
    env_logger::init();
}
