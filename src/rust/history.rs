use std::fmt;

use crate::labels::capitalize;

/// One recorded prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub label: String,
    pub confidence: f32,
}

/// A history entry prepared for display, carrying its 1-based chronological
/// number.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryLine {
    pub number: usize,
    pub label: String,
    pub confidence: f32,
}

impl fmt::Display for HistoryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. {} (confidence: {:.2}%)",
            self.number,
            capitalize(&self.label),
            self.confidence
        )
    }
}

/// Append-only log of the predictions made in one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, label: impl Into<String>, confidence: f32) {
        self.entries.push(HistoryEntry {
            label: label.into(),
            confidence,
        });
    }

    /// Entries in chronological order.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest first; the Kth appended entry is always numbered K.
    pub fn render(&self) -> Vec<HistoryLine> {
        self.entries
            .iter()
            .enumerate()
            .rev()
            .map(|(i, entry)| HistoryLine {
                number: i + 1,
                label: entry.label.clone(),
                confidence: entry.confidence,
            })
            .collect()
    }
}
