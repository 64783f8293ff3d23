use std::sync::Arc;
use std::time::Duration;

use crossterm::event::Event;
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::config::settings::Settings;
use crate::core::client::HttpScanControl;
use crate::core::events::{self, Notice};
use crate::core::transport::SseConnector;
use crate::core::watcher::ScanWatcher;
use crate::export::json::{default_export_path, export_json};
use crate::ui::app_state::AppState;
use crate::ui::input::{self, InputAction};
use crate::ui::renderer;

pub struct App {
    state: AppState,
    settings: Settings,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: AppState::new(settings.server_url.clone(), settings.max_completed_display),
            settings,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        let connector = Arc::new(SseConnector::from_settings(&self.settings));
        let control = Arc::new(HttpScanControl::from_settings(&self.settings)?);
        let (notice_tx, notice_rx) = events::create_notice_channel();
        let watcher = Arc::new(ScanWatcher::new(connector, control).with_notices(notice_tx));

        // Initialize terminal
        terminal::enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        watcher.start_watching();

        // Run main event loop
        let result = self.event_loop(&mut terminal, &watcher, notice_rx).await;

        watcher.stop_watching();

        // Restore terminal
        terminal::disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
        watcher: &Arc<ScanWatcher>,
        mut notice_rx: events::NoticeReceiver,
    ) -> anyhow::Result<()> {
        // Spawn a dedicated blocking thread for terminal input.
        let (input_tx, mut input_rx) = mpsc::unbounded_channel::<Event>();
        let _input_thread = tokio::task::spawn_blocking(move || loop {
            match input::poll_event(Duration::from_millis(50)) {
                Ok(Some(event)) => {
                    if input_tx.send(event).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(_) => break,
            }
        });

        // Trigger outcomes come back here as status messages.
        let (message_tx, mut message_rx) = mpsc::unbounded_channel::<String>();
        let mut progress_rx = watcher.subscribe();
        let mut tick_interval = tokio::time::interval(self.settings.tick_rate());

        loop {
            self.state.watching = watcher.is_watching();

            // Render
            terminal.draw(|frame| {
                renderer::render(frame, &self.state);
            })?;

            tokio::select! {
                // Terminal input events
                input_event = input_rx.recv() => {
                    match input_event {
                        Some(Event::Key(key)) => {
                            let action = input::handle_key_event(key, &mut self.state);
                            match action {
                                InputAction::Quit => return Ok(()),
                                InputAction::None => {}
                                action => self.handle_action(action, watcher, &message_tx),
                            }
                        }
                        Some(Event::Resize(_, _)) => {
                            // Terminal resized; next loop iteration will re-render
                        }
                        Some(_) => {}
                        None => return Ok(()),
                    }
                }
                // Reducer changes
                changed = progress_rx.changed() => {
                    if changed.is_ok() {
                        let progress = progress_rx.borrow_and_update().clone();
                        self.state.set_progress(progress);
                    }
                }
                Some(notice) = notice_rx.recv() => {
                    match notice {
                        Notice::StreamFailed(message) => {
                            self.state.set_message(format!("Event stream failed: {} (press 'w' to reconnect)", message));
                        }
                    }
                }
                Some(message) = message_rx.recv() => {
                    self.state.set_message(message);
                }
                // Periodic tick keeps the watching indicator fresh
                _ = tick_interval.tick() => {}
            }

            if self.state.should_quit {
                return Ok(());
            }
        }
    }

    fn handle_action(
        &mut self,
        action: InputAction,
        watcher: &Arc<ScanWatcher>,
        message_tx: &mpsc::UnboundedSender<String>,
    ) {
        match action {
            InputAction::Scan => {
                let watcher = Arc::clone(watcher);
                let message_tx = message_tx.clone();
                tokio::spawn(async move {
                    let message = match watcher.scan().await {
                        Ok(()) => "Scan requested".to_string(),
                        Err(e) => format!("Scan request failed: {}", e),
                    };
                    let _ = message_tx.send(message);
                });
            }
            InputAction::Interrupt => {
                let watcher = Arc::clone(watcher);
                let message_tx = message_tx.clone();
                tokio::spawn(async move {
                    let message = match watcher.interrupt().await {
                        Ok(()) => "Interrupt requested".to_string(),
                        Err(e) => format!("Interrupt request failed: {}", e),
                    };
                    let _ = message_tx.send(message);
                });
            }
            InputAction::ToggleWatch => {
                if watcher.is_watching() {
                    watcher.stop_watching();
                    self.state.set_message("Stopped watching");
                } else {
                    watcher.start_watching();
                    self.state.set_message("Watching scan progress");
                }
            }
            InputAction::Export => self.handle_export(),
            InputAction::None | InputAction::Quit => {}
        }
    }

    fn handle_export(&mut self) {
        let path = default_export_path();
        match export_json(&self.state.progress, &path) {
            Ok(()) => {
                tracing::info!("Exported to: {}", path.display());
                self.state.set_message(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                self.state.set_message(format!("Export failed: {}", e));
            }
        }
    }
}
