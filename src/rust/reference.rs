//! Descriptive text for each letter, loaded from a JSON object of
//! `label -> description`.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("Failed to read reference data: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed reference data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A description is usually plain text, but structured entries are kept as-is.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Structured(serde_json::Value),
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Structured(value) => {
                let pretty = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
                f.write_str(&pretty)
            }
        }
    }
}

/// Immutable label to description mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    entries: HashMap<String, Description>,
}

impl ReferenceData {
    /// Loads the mapping from `path`. A missing file is not an error and
    /// yields an empty mapping.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No reference data at {:?}, descriptions disabled", path);
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let data = Self::from_json(&raw)?;
        log::info!("Loaded {} reference entries from {:?}", data.len(), path);
        Ok(data)
    }

    pub fn from_json(raw: &str) -> Result<Self, ReferenceError> {
        let entries: HashMap<String, Description> = serde_json::from_str(raw)?;
        Ok(Self { entries })
    }

    pub fn describe(&self, label: &str) -> Option<&Description> {
        self.entries.get(label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Description)> for ReferenceData {
    fn from_iter<T: IntoIterator<Item = (String, Description)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
