use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use super::client::ScanControl;
use super::events::{Notice, NoticeSender};
use super::progress::{ProgressReducer, ProgressState};
use super::source::EventSource;
use super::transport::Connector;
use crate::error::{SourceError, WatchError};

type ActiveSource = Arc<Mutex<Option<EventSource>>>;

/// Owns at most one subscription and feeds it into a [`ProgressReducer`].
///
/// Dropping the watcher stops watching.
pub struct ScanWatcher {
    connector: Arc<dyn Connector>,
    control: Arc<dyn ScanControl>,
    reducer: Arc<ProgressReducer>,
    active: ActiveSource,
    notices: Option<NoticeSender>,
}

impl ScanWatcher {
    pub fn new(connector: Arc<dyn Connector>, control: Arc<dyn ScanControl>) -> Self {
        Self {
            connector,
            control,
            reducer: Arc::new(ProgressReducer::new()),
            active: Arc::new(Mutex::new(None)),
            notices: None,
        }
    }

    /// Report stream failures on `notices` as well as the log.
    pub fn with_notices(mut self, notices: NoticeSender) -> Self {
        self.notices = Some(notices);
        self
    }

    pub fn reducer(&self) -> &Arc<ProgressReducer> {
        &self.reducer
    }

    pub fn subscribe(&self) -> watch::Receiver<ProgressState> {
        self.reducer.subscribe()
    }

    pub fn is_watching(&self) -> bool {
        lock(&self.active).is_some()
    }

    /// Subscribe and start folding events into a fresh reducer state. No-op
    /// while already watching. Returns whether a new subscription was opened.
    ///
    /// The server replays the current session on subscribe, so state from a
    /// previous subscription is dropped here.
    pub fn start_watching(&self) -> bool {
        let source = {
            let mut active = lock(&self.active);
            if active.is_some() {
                tracing::debug!("Already watching, start ignored");
                return false;
            }
            self.reducer.reset();
            let source = EventSource::open(self.connector.as_ref());
            *active = Some(source.clone());
            source
        };

        tracing::info!("Started watching scan progress");
        tokio::spawn(consume(
            source,
            Arc::clone(&self.reducer),
            Arc::clone(&self.active),
            self.notices.clone(),
        ));
        true
    }

    /// Close the active subscription, if any. Reducer state is kept until the
    /// next start.
    pub fn stop_watching(&self) {
        let source = lock(&self.active).take();
        if let Some(source) = source {
            source.close();
            tracing::info!("Stopped watching scan progress");
        }
    }

    pub async fn scan(&self) -> Result<(), WatchError> {
        self.control.scan().await
    }

    pub async fn interrupt(&self) -> Result<(), WatchError> {
        self.control.interrupt().await
    }
}

impl Drop for ScanWatcher {
    fn drop(&mut self) {
        self.stop_watching();
    }
}

async fn consume(
    source: EventSource,
    reducer: Arc<ProgressReducer>,
    active: ActiveSource,
    notices: Option<NoticeSender>,
) {
    let outcome: Result<(), SourceError> = loop {
        match source.get().await {
            Ok(Some(event)) => {
                // Stopped between delivery and now: state stays frozen.
                if source.is_closed() {
                    break Ok(());
                }
                reducer.apply(&event);
            }
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        }
    };

    {
        let mut active = lock(&active);
        if active
            .as_ref()
            .is_some_and(|current| current.same_source(&source))
        {
            *active = None;
        }
    }
    source.close();

    match outcome {
        Ok(()) => tracing::info!("Scan progress stream finished"),
        Err(e) => {
            tracing::error!("Watching scan progress failed: {}", e);
            if let Some(notices) = &notices {
                let _ = notices.send(Notice::StreamFailed(e.to_string()));
            }
        }
    }
}

fn lock(active: &Mutex<Option<EventSource>>) -> MutexGuard<'_, Option<EventSource>> {
    active.lock().unwrap_or_else(PoisonError::into_inner)
}
