//! Non-interactive mode: follow one session through the log.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::settings::Settings;
use crate::core::client::HttpScanControl;
use crate::core::events::{create_notice_channel, Notice, NoticeReceiver};
use crate::core::progress::ProgressState;
use crate::core::transport::SseConnector;
use crate::core::watcher::ScanWatcher;
use crate::export::json::export_json;
use crate::models::progress::Phase;

#[derive(Debug, Clone)]
pub struct HeadlessOptions {
    /// Request a scan once subscribed.
    pub trigger_scan: bool,
    pub export_path: Option<PathBuf>,
    /// How long a failed session may stay quiet before giving up on it.
    pub failure_grace: Duration,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            trigger_scan: false,
            export_path: None,
            failure_grace: Duration::from_secs(10),
        }
    }
}

/// How a followed session ended.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub last: ProgressState,
    pub stream_failure: Option<String>,
}

pub async fn run(settings: Settings, options: HeadlessOptions) -> anyhow::Result<()> {
    let connector = Arc::new(SseConnector::from_settings(&settings));
    let control = Arc::new(HttpScanControl::from_settings(&settings)?);
    let (notice_tx, notice_rx) = create_notice_channel();
    let watcher = ScanWatcher::new(connector, control).with_notices(notice_tx);

    let outcome = follow(&watcher, notice_rx, &options).await?;
    let last = outcome.last;

    if let Some(path) = &options.export_path {
        export_json(&last, path)?;
        println!("Exported to: {}", path.display());
    }

    if let Some(message) = outcome.stream_failure {
        anyhow::bail!("event stream failed: {}", message);
    }
    if let Some(error) = &last.error {
        anyhow::bail!("scan failed: {}", error);
    }
    Ok(())
}

/// Watch until the session completes, is interrupted, fails and goes quiet,
/// or the stream ends. Stops watching before returning.
pub async fn follow(
    watcher: &ScanWatcher,
    mut notice_rx: NoticeReceiver,
    options: &HeadlessOptions,
) -> anyhow::Result<SessionOutcome> {
    let mut progress_rx = watcher.subscribe();
    watcher.start_watching();
    // Fold whatever arrived before the first change notification.
    progress_rx.mark_changed();

    if options.trigger_scan {
        watcher.scan().await?;
    }

    // A replayed snapshot of an earlier session must not end a requested scan.
    let mut awaiting_session = options.trigger_scan;
    let mut interrupt_sent = false;
    let mut stream_failure = None;
    let mut previous = ProgressState::default();
    let mut last_change = Instant::now();
    let tick_period = options
        .failure_grace
        .clamp(Duration::from_millis(10), Duration::from_millis(250));
    let mut tick = tokio::time::interval(tick_period);

    loop {
        tokio::select! {
            changed = progress_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = progress_rx.borrow_and_update().clone();
                log_changes(&previous, &current);
                last_change = Instant::now();
                if current.phase == Phase::Scanning {
                    awaiting_session = false;
                }
                let finished = !awaiting_session && current.is_finished();
                previous = current;
                if finished {
                    break;
                }
            }
            Some(notice) = notice_rx.recv() => {
                let Notice::StreamFailed(message) = notice;
                stream_failure = Some(message);
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                if interrupt_sent {
                    tracing::warn!("Stopping without waiting for the scan");
                    break;
                }
                interrupt_sent = true;
                tracing::warn!("Interrupting scan, press Ctrl+C again to stop watching");
                if let Err(e) = watcher.interrupt().await {
                    tracing::error!("Interrupt request failed: {}", e);
                }
            }
            _ = tick.tick() => {
                if !watcher.is_watching() {
                    tracing::info!("Event stream closed by server");
                    break;
                }
                if previous.error.is_some() && last_change.elapsed() >= options.failure_grace {
                    tracing::warn!("No further events after the failure, stopping");
                    break;
                }
            }
        }
    }

    watcher.stop_watching();
    // The loop may have seen the stream end before its failure notice.
    if stream_failure.is_none() {
        if let Ok(Notice::StreamFailed(message)) = notice_rx.try_recv() {
            stream_failure = Some(message);
        }
    }
    Ok(SessionOutcome {
        last: watcher.reducer().snapshot(),
        stream_failure,
    })
}

fn log_changes(previous: &ProgressState, current: &ProgressState) {
    if current.phase != previous.phase {
        tracing::info!(phase = %current.phase, scan_count = current.scan_count, "Phase changed");
    }

    let handling = current.handling_file.as_ref();
    if handling.map(|f| &f.path) != previous.handling_file.as_ref().map(|f| &f.path) {
        if let Some(file) = handling {
            tracing::info!("Handling {} ({})", file.path.display(), file.operation);
        }
    } else if let Some(file) = handling {
        if let Some(pages) = file.parse_progress {
            tracing::debug!("Parsed {}/{} pages", pages.index, pages.total);
        }
        if let Some(pages) = file.index_progress {
            tracing::debug!("Indexed {}/{} pages", pages.index, pages.total);
        }
    }

    if current.completed_files.len() > previous.completed_files.len() {
        for file in &current.completed_files[previous.completed_files.len()..] {
            tracing::info!(
                "Handled {} ({}) [{}/{}]",
                file.path.display(),
                file.operation,
                current.completed_files.len(),
                current.scan_count
            );
        }
    }

    if let Some(error) = &current.error {
        if previous.error.as_ref() != Some(error) {
            tracing::error!("Scan failed: {}", error);
        }
    }
    if current.is_interrupting && !previous.is_interrupting {
        tracing::warn!("Scan is being interrupted");
    }
    if current.is_interrupted && !previous.is_interrupted {
        tracing::warn!("Scan interrupted");
    }
}
