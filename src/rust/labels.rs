use lazy_static::lazy_static;
use std::collections::HashSet;

/// Class names of the Hijaiyah model, in the order of its output vector.
const HIJAIYAH: [&str; 30] = [
    "ain", "alif", "ba", "dal", "dhod", "dzal", "dzho", "fa", "ghoin", "ha", "ha'",
    "hamzah", "jim", "kaf", "kho", "lam", "lamalif", "mim", "nun", "qof", "ro",
    "shod", "sin", "syin", "ta", "tho", "tsa", "wawu", "ya", "zain",
];

lazy_static! {
    /// Label set used when no other set is configured.
    pub static ref DEFAULT_LABELS: LabelSet = LabelSet::hijaiyah();
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LabelError {
    #[error("Label set cannot be empty")]
    Empty,
    #[error("Label {index} is empty")]
    EmptyLabel { index: usize },
    #[error("Duplicate label: {0}")]
    Duplicate(String),
}

/// Ordered class names; position `i` names output `i` of the model.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    pub fn new<I, S>(labels: I) -> Result<Self, LabelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(LabelError::Empty);
        }

        let mut seen = HashSet::with_capacity(labels.len());
        for (index, label) in labels.iter().enumerate() {
            if label.is_empty() {
                return Err(LabelError::EmptyLabel { index });
            }
            if !seen.insert(label.as_str()) {
                return Err(LabelError::Duplicate(label.clone()));
            }
        }

        Ok(Self { labels })
    }

    /// The 30 Hijaiyah letters the bundled model was trained on.
    pub fn hijaiyah() -> Self {
        Self {
            labels: HIJAIYAH.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl Default for LabelSet {
    fn default() -> Self {
        DEFAULT_LABELS.clone()
    }
}

/// Display form of a label: first character uppercased, the rest lowercased.
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
