use std::env;
use std::path::PathBuf;

use crate::classifier::OnnxModelSource;
use crate::labels::LabelSet;
use crate::model_manager::ModelManager;
use crate::runtime::RuntimeConfig;

/// Default location of the letter descriptions.
pub const DEFAULT_REFERENCE_PATH: &str = "static/abjad_updated.json";
/// Environment variable that overrides the reference data path.
pub const REFERENCE_ENV: &str = "HIJAIYAH_REFERENCE";
/// Environment variable holding the expected SHA-256 of the model artifact.
pub const MODEL_SHA256_ENV: &str = "HIJAIYAH_MODEL_SHA256";

/// Everything needed to build an [`AppContext`](crate::AppContext).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub model_sha256: Option<String>,
    pub reference_path: PathBuf,
    pub labels: LabelSet,
    pub runtime: RuntimeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: ModelManager::new("models").get_model_path(),
            model_sha256: None,
            reference_path: PathBuf::from(DEFAULT_REFERENCE_PATH),
            labels: LabelSet::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self {
            model_path: ModelManager::new_default().get_model_path(),
            ..Self::default()
        };
        if let Some(path) = non_empty_var(REFERENCE_ENV) {
            config.reference_path = PathBuf::from(path);
        }
        config.model_sha256 = non_empty_var(MODEL_SHA256_ENV);
        config
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn with_reference_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.reference_path = path.into();
        self
    }

    pub fn model_source(&self) -> OnnxModelSource {
        let source = OnnxModelSource::new(&self.model_path)
            .with_output_size(self.labels.len())
            .with_runtime_config(self.runtime.clone());
        match &self.model_sha256 {
            Some(hash) => source.with_sha256(hash.clone()),
            None => source,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
