use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::SourceError;
use crate::models::progress::FileOperation;

/// One scan lifecycle event as pushed by the server, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Event {
    // Session state
    Scanning,
    ScanCompleted {
        count: u64,
    },
    Completed,

    // File handling
    #[serde(rename = "startHandingFile", alias = "startHandlingFile")]
    StartHandlingFile {
        path: PathBuf,
        operation: FileOperation,
    },
    #[serde(rename = "completeHandingFile", alias = "completeHandlingFile")]
    CompleteHandlingFile {
        path: PathBuf,
        operation: FileOperation,
    },
    #[serde(rename = "completeParsePdfPage", alias = "completeParsePage")]
    CompleteParsePage {
        index: u32,
        total: u32,
    },
    #[serde(rename = "completeIndexPdfPage", alias = "completeIndexPage")]
    CompleteIndexPage {
        index: u32,
        total: u32,
    },

    // Overlays
    Failure {
        error: String,
    },
    Interrupting,
    Interrupted,

    // Keep-alive
    Heartbeat,
}

impl Event {
    /// Decode one framed payload.
    pub fn from_json(payload: &str) -> Result<Self, SourceError> {
        serde_json::from_str(payload).map_err(|e| SourceError::Malformed {
            message: format!("{e} in {payload:?}"),
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Event::Scanning => "scanning",
            Event::ScanCompleted { .. } => "scanCompleted",
            Event::Completed => "completed",
            Event::StartHandlingFile { .. } => "startHandingFile",
            Event::CompleteHandlingFile { .. } => "completeHandingFile",
            Event::CompleteParsePage { .. } => "completeParsePdfPage",
            Event::CompleteIndexPage { .. } => "completeIndexPdfPage",
            Event::Failure { .. } => "failure",
            Event::Interrupting => "interrupting",
            Event::Interrupted => "interrupted",
            Event::Heartbeat => "heartbeat",
        }
    }
}

/// Out-of-band notification from the watcher (transport failures).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    StreamFailed(String),
}

pub type NoticeSender = mpsc::UnboundedSender<Notice>;
pub type NoticeReceiver = mpsc::UnboundedReceiver<Notice>;

pub fn create_notice_channel() -> (NoticeSender, NoticeReceiver) {
    mpsc::unbounded_channel()
}
