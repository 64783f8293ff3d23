use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Coarse stage of a scan session. Ordered: a session only moves forward.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Phase {
    #[default]
    Ready,
    Scanning,
    HandlingFiles,
    Completed,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Ready => "Ready",
            Phase::Scanning => "Scanning",
            Phase::HandlingFiles => "Handling files",
            Phase::Completed => "Completed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOperation {
    Create,
    Update,
    Remove,
}

impl FileOperation {
    pub fn label(&self) -> &'static str {
        match self {
            FileOperation::Create => "create",
            FileOperation::Update => "update",
            FileOperation::Remove => "remove",
        }
    }
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pages done out of a document's total, as last reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageProgress {
    pub index: u32,
    pub total: u32,
}

impl PageProgress {
    pub fn new(index: u32, total: u32) -> Self {
        Self { index, total }
    }

    /// Fraction in `0.0..=1.0`. An empty document counts as done.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.index as f64 / self.total as f64).clamp(0.0, 1.0)
    }
}

/// The single file currently in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlingFile {
    pub path: PathBuf,
    pub operation: FileOperation,
    pub parse_progress: Option<PageProgress>,
    pub index_progress: Option<PageProgress>,
}

impl HandlingFile {
    pub fn new(path: PathBuf, operation: FileOperation) -> Self {
        Self {
            path,
            operation,
            parse_progress: None,
            index_progress: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedFile {
    pub path: PathBuf,
    pub operation: FileOperation,
}

impl CompletedFile {
    pub fn new(path: impl Into<PathBuf>, operation: FileOperation) -> Self {
        Self {
            path: path.into(),
            operation,
        }
    }
}
