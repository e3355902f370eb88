use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::model::{ImageModel, OnnxModel};
use crate::model_manager::{file_sha256, ModelError};
use crate::runtime::RuntimeConfig;

/// Something that can produce a ready-to-use model.
pub trait ModelSource: Send + Sync {
    /// Human-readable origin of the model, used in logs and messages.
    fn describe(&self) -> String;

    fn load(&self) -> Result<Arc<dyn ImageModel>, ModelError>;
}

/// Loads an ONNX artifact from disk, optionally checking its SHA-256 first.
#[derive(Debug, Clone)]
pub struct OnnxModelSource {
    pub path: PathBuf,
    pub expected_sha256: Option<String>,
    pub expected_outputs: Option<usize>,
    pub runtime_config: RuntimeConfig,
}

impl OnnxModelSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            expected_sha256: None,
            expected_outputs: None,
            runtime_config: RuntimeConfig::default(),
        }
    }

    pub fn with_sha256(mut self, hash: impl Into<String>) -> Self {
        self.expected_sha256 = Some(hash.into());
        self
    }

    /// Rejects models whose output size differs from `labels` at load time.
    pub fn with_output_size(mut self, labels: usize) -> Self {
        self.expected_outputs = Some(labels);
        self
    }

    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }
}

impl ModelSource for OnnxModelSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Arc<dyn ImageModel>, ModelError> {
        if !self.path.exists() {
            return Err(ModelError::NotFound(self.describe()));
        }
        if let Some(expected) = &self.expected_sha256 {
            let actual = file_sha256(&self.path)?;
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(ModelError::HashMismatch {
                    expected: expected.clone(),
                    actual,
                });
            }
        }
        let model = OnnxModel::from_file(&self.path, &self.runtime_config, self.expected_outputs)?;
        Ok(Arc::new(model))
    }
}

/// Process-wide model cache with an explicit lifetime.
///
/// The first successful [`get`](ModelLoader::get) loads the model; every later
/// call returns the same instance. Loading happens under a lock, so sessions
/// racing on first use trigger a single load. Failures are not cached and the
/// next call tries again.
pub struct ModelLoader {
    source: Box<dyn ModelSource>,
    cached: Mutex<Option<Arc<dyn ImageModel>>>,
    loads: AtomicUsize,
}

impl ModelLoader {
    pub fn new(source: impl ModelSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cached: Mutex::new(None),
            loads: AtomicUsize::new(0),
        }
    }

    /// Returns the cached model, loading it first if needed.
    pub fn get(&self) -> Result<Arc<dyn ImageModel>, ModelError> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(model) = cached.as_ref() {
            return Ok(Arc::clone(model));
        }

        log::info!("Loading model from {}", self.source.describe());
        let model = self.source.load().map_err(|e| {
            log::error!("Failed to load model from {}: {}", self.source.describe(), e);
            e
        })?;
        self.loads.fetch_add(1, Ordering::SeqCst);
        *cached = Some(Arc::clone(&model));
        Ok(model)
    }

    /// Returns the model only if it is already loaded.
    pub fn loaded(&self) -> Option<Arc<dyn ImageModel>> {
        self.cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(Arc::clone)
    }

    /// Drops the cached model. Returns whether one was loaded.
    pub fn unload(&self) -> bool {
        let previous = self
            .cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            log::info!("Unloaded model from {}", self.source.describe());
        }
        previous.is_some()
    }

    /// Number of successful loads since construction.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for ModelLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelLoader")
            .field("source", &self.source.describe())
            .field("loaded", &self.loaded().is_some())
            .field("loads", &self.load_count())
            .finish()
    }
}
