use std::path::{Path, PathBuf};
use std::fs;
use std::io;
use std::sync::Arc;
use std::env;
use tokio::sync::Mutex;
use reqwest;
use sha2::{Sha256, Digest};
use log;

/// File name of the classifier artifact inside the models directory.
pub const MODEL_FILE_NAME: &str = "fixmodel.onnx";
/// Environment variable that overrides the models directory.
pub const MODELS_DIR_ENV: &str = "HIJAIYAH_MODELS";

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model artifact not found: {0}")]
    NotFound(String),
    #[error("Model artifact is corrupt: {0}")]
    Corrupt(String),
    #[error("Download error: {0}")]
    DownloadError(#[from] reqwest::Error),
    #[error("Download failed with HTTP status {0}")]
    HttpStatus(u16),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Hash mismatch: expected {expected}, got {actual}")]
    HashMismatch {
        expected: String,
        actual: String,
    },
}

/// Hex-encoded SHA-256 of a file's contents.
pub fn file_sha256(path: &Path) -> Result<String, ModelError> {
    let bytes = fs::read(path)?;
    Ok(sha256_hex(&bytes))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn models_dir_from(value: Option<String>) -> PathBuf {
    match value {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from("models"),
    }
}

/// Locates, verifies and fetches the classifier artifact.
#[derive(Clone, Debug)]
pub struct ModelManager {
    models_dir: PathBuf,
    download_lock: Arc<Mutex<()>>,
}

impl ModelManager {
    /// Creates a ModelManager rooted at the default models directory
    pub fn new_default() -> Self {
        Self::new(Self::get_default_models_dir())
    }

    /// Returns the default models directory path
    pub fn get_default_models_dir() -> PathBuf {
        models_dir_from(env::var(MODELS_DIR_ENV).ok())
    }

    pub fn new<P: AsRef<Path>>(models_dir: P) -> Self {
        Self {
            models_dir: models_dir.as_ref().to_path_buf(),
            download_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn get_model_path(&self) -> PathBuf {
        self.models_dir.join(MODEL_FILE_NAME)
    }

    pub fn is_model_present(&self) -> bool {
        let model_path = self.get_model_path();
        log::debug!("Model path: {:?} (exists: {})", model_path, model_path.exists());
        model_path.exists()
    }

    /// Checks the artifact against an expected SHA-256. A missing file
    /// verifies as `false`.
    pub fn verify_model(&self, expected_hash: &str) -> Result<bool, ModelError> {
        let model_path = self.get_model_path();
        if !model_path.exists() {
            log::info!("Model file {:?} does not exist", model_path);
            return Ok(false);
        }

        let hash = file_sha256(&model_path)?;
        log::info!("Calculated hash: {}", hash);
        log::info!("Expected hash:   {}", expected_hash);
        Ok(hash.eq_ignore_ascii_case(expected_hash))
    }

    /// Downloads the artifact from `url`, verifying it before it replaces
    /// anything on disk. An existing artifact with the right hash is kept.
    pub async fn download_model(&self, url: &str, expected_hash: &str) -> Result<PathBuf, ModelError> {
        let _lock = self.download_lock.lock().await;
        let model_path = self.get_model_path();

        if self.verify_model(expected_hash)? {
            log::info!("Existing model file verified successfully");
            return Ok(model_path);
        }

        log::info!("Downloading model from {} to {:?}", url, model_path);
        let response = reqwest::get(url).await?;
        log::info!("Download response status: {}", response.status());
        if !response.status().is_success() {
            return Err(ModelError::HttpStatus(response.status().as_u16()));
        }
        let bytes = response.bytes().await?;
        log::info!("Downloaded {} bytes", bytes.len());

        let hash = sha256_hex(&bytes);
        if !hash.eq_ignore_ascii_case(expected_hash) {
            log::error!("Model hash mismatch: expected {}, got {}", expected_hash, hash);
            return Err(ModelError::HashMismatch {
                expected: expected_hash.to_string(),
                actual: hash,
            });
        }

        fs::create_dir_all(&self.models_dir)?;
        let partial = model_path.with_extension("onnx.part");
        fs::write(&partial, &bytes)?;
        if let Err(e) = fs::rename(&partial, &model_path) {
            let _ = fs::remove_file(&partial);
            return Err(e.into());
        }

        log::info!("Model downloaded and verified at {:?}", model_path);
        Ok(model_path)
    }

    pub fn remove_model(&self) -> Result<bool, ModelError> {
        let model_path = self.get_model_path();
        if model_path.exists() {
            fs::remove_file(&model_path)?;
            log::info!("Removed model file {:?}", model_path);
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_path_layout() {
        let manager = ModelManager::new("/tmp/hijaiyah-test/models");
        assert!(manager.get_model_path().ends_with("models/fixmodel.onnx"));
    }

    #[test]
    fn test_default_models_dir() {
        assert_eq!(
            models_dir_from(Some("/tmp/hijaiyah-cache".into())),
            PathBuf::from("/tmp/hijaiyah-cache")
        );
        assert_eq!(models_dir_from(Some(String::new())), PathBuf::from("models"));
        assert_eq!(models_dir_from(None), PathBuf::from("models"));
    }

    #[test]
    fn test_verify_and_remove() -> Result<(), ModelError> {
        let dir = tempfile::tempdir()?;
        let manager = ModelManager::new(dir.path());
        assert!(!manager.verify_model("abc")?);
        assert!(!manager.remove_model()?);

        fs::write(manager.get_model_path(), b"weights")?;
        let hash = sha256_hex(b"weights");
        assert!(manager.verify_model(&hash)?);
        assert!(manager.verify_model(&hash.to_uppercase())?);
        assert!(!manager.verify_model("deadbeef")?);

        assert!(manager.remove_model()?);
        assert!(!manager.is_model_present());
        Ok(())
    }

    #[tokio::test]
    async fn test_download_keeps_verified_artifact() -> Result<(), ModelError> {
        let dir = tempfile::tempdir()?;
        let manager = ModelManager::new(dir.path());
        fs::write(manager.get_model_path(), b"weights")?;

        // never contacted because the local file already matches
        let path = manager
            .download_model("http://127.0.0.1:9/fixmodel.onnx", &sha256_hex(b"weights"))
            .await?;
        assert_eq!(path, manager.get_model_path());
        Ok(())
    }

    #[tokio::test]
    async fn test_download_failure_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ModelManager::new(dir.path());
        let result = manager
            .download_model("http://127.0.0.1:9/fixmodel.onnx", "00")
            .await;
        assert!(result.is_err());
        assert!(!manager.is_model_present());
    }
}
