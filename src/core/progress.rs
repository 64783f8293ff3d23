use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::events::Event;
use crate::models::progress::{CompletedFile, HandlingFile, PageProgress, Phase};

/// Everything known about the current scan session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub phase: Phase,
    pub scan_count: u64,
    pub handling_file: Option<HandlingFile>,
    pub completed_files: Vec<CompletedFile>,
    pub error: Option<String>,
    pub is_interrupting: bool,
    pub is_interrupted: bool,
}

#[derive(Debug, Clone, Copy)]
enum PageStep {
    Parse,
    Index,
}

impl ProgressState {
    pub fn is_scanning(&self) -> bool {
        !matches!(self.phase, Phase::Ready | Phase::Completed)
            && self.error.is_none()
            && !self.is_interrupted
    }

    /// The session completed or was interrupted. A failure alone is not
    /// terminal: the server may still report the interruption or completion.
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Completed || self.is_interrupted
    }

    /// Fold one event into the state. Returns whether anything changed.
    pub fn apply(&mut self, event: &Event) -> bool {
        match event {
            Event::Scanning => {
                *self = Self {
                    phase: Phase::Scanning,
                    ..Self::default()
                };
                true
            }
            Event::ScanCompleted { count } => {
                self.advance(Phase::HandlingFiles);
                self.scan_count = *count;
                true
            }
            Event::StartHandlingFile { path, operation } => {
                self.handling_file = Some(HandlingFile::new(path.clone(), *operation));
                true
            }
            Event::CompleteHandlingFile { path, operation } => {
                if let Some(current) = &self.handling_file {
                    if current.path != *path {
                        tracing::debug!(
                            "Completed {} while {} was in flight",
                            path.display(),
                            current.path.display()
                        );
                    }
                }
                self.handling_file = None;
                self.completed_files
                    .push(CompletedFile::new(path.clone(), *operation));
                true
            }
            Event::CompleteParsePage { index, total } => {
                self.record_pages(PageStep::Parse, PageProgress::new(*index, *total))
            }
            Event::CompleteIndexPage { index, total } => {
                self.record_pages(PageStep::Index, PageProgress::new(*index, *total))
            }
            Event::Completed => {
                self.advance(Phase::Completed);
                true
            }
            Event::Failure { error } => {
                self.error = Some(error.clone());
                true
            }
            Event::Interrupting => {
                if self.is_interrupted {
                    tracing::debug!("Interrupting after interruption, ignoring");
                    return false;
                }
                self.is_interrupting = true;
                true
            }
            Event::Interrupted => {
                self.is_interrupting = false;
                self.is_interrupted = true;
                true
            }
            Event::Heartbeat => false,
        }
    }

    fn advance(&mut self, target: Phase) {
        if target < self.phase {
            tracing::warn!(
                "Ignoring phase change {} -> {} without a new session",
                self.phase,
                target
            );
            return;
        }
        self.phase = target;
    }

    fn record_pages(&mut self, step: PageStep, pages: PageProgress) -> bool {
        let Some(file) = self.handling_file.as_mut() else {
            tracing::warn!(
                ?step,
                index = pages.index,
                total = pages.total,
                "Page progress with no file in flight, ignoring"
            );
            return false;
        };
        match step {
            PageStep::Parse => file.parse_progress = Some(pages),
            PageStep::Index => file.index_progress = Some(pages),
        }
        true
    }
}

/// Folds events into [`ProgressState`] and publishes every change.
pub struct ProgressReducer {
    state: watch::Sender<ProgressState>,
}

impl ProgressReducer {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ProgressState::default());
        Self { state }
    }

    pub fn apply(&self, event: &Event) -> bool {
        tracing::debug!(kind = event.kind(), "Applying event");
        self.state.send_if_modified(|state| state.apply(event))
    }

    /// Start over from an empty state. Subscribers are notified.
    pub fn reset(&self) {
        self.state.send_replace(ProgressState::default());
    }

    /// Receiver woken on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ProgressState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ProgressState {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    pub fn scan_count(&self) -> u64 {
        self.state.borrow().scan_count
    }

    pub fn handling_file(&self) -> Option<HandlingFile> {
        self.state.borrow().handling_file.clone()
    }

    pub fn completed_files(&self) -> Vec<CompletedFile> {
        self.state.borrow().completed_files.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn is_interrupting(&self) -> bool {
        self.state.borrow().is_interrupting
    }

    pub fn is_interrupted(&self) -> bool {
        self.state.borrow().is_interrupted
    }

    pub fn is_scanning(&self) -> bool {
        self.state.borrow().is_scanning()
    }
}

impl Default for ProgressReducer {
    fn default() -> Self {
        Self::new()
    }
}
