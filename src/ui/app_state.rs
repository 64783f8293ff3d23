use crate::core::progress::ProgressState;
use crate::models::progress::CompletedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Idle,
    Running,
    Interrupting,
    Interrupted,
    Failed,
}

impl Activity {
    pub fn label(&self) -> &'static str {
        match self {
            Activity::Idle => "Idle",
            Activity::Running => "Running",
            Activity::Interrupting => "Interrupting",
            Activity::Interrupted => "Interrupted",
            Activity::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Normal,
    Help,
}

pub struct AppState {
    pub view_mode: ViewMode,
    pub server_url: String,
    pub progress: ProgressState,
    pub watching: bool,
    pub selected_index: usize,
    pub list_offset: usize,
    /// Keep the newest completed file selected as files arrive.
    pub follow_tail: bool,
    pub max_completed_display: usize,
    pub status_message: Option<String>,
    pub should_quit: bool,
    pub pending_g: bool,
}

impl AppState {
    pub fn new(server_url: String, max_completed_display: usize) -> Self {
        Self {
            view_mode: ViewMode::Normal,
            server_url,
            progress: ProgressState::default(),
            watching: false,
            selected_index: 0,
            list_offset: 0,
            follow_tail: true,
            max_completed_display: max_completed_display.max(1),
            status_message: None,
            should_quit: false,
            pending_g: false,
        }
    }

    pub fn set_progress(&mut self, progress: ProgressState) {
        let shrunk = progress.completed_files.len() < self.progress.completed_files.len();
        self.progress = progress;
        if shrunk {
            // New session
            self.selected_index = 0;
            self.list_offset = 0;
            self.follow_tail = true;
        }
        if self.follow_tail {
            self.selected_index = self.visible_completed().len().saturating_sub(1);
        }
    }

    /// Completed files shown in the list: the newest `max_completed_display`.
    pub fn visible_completed(&self) -> &[CompletedFile] {
        let files = &self.progress.completed_files;
        &files[self.hidden_completed()..]
    }

    pub fn hidden_completed(&self) -> usize {
        self.progress
            .completed_files
            .len()
            .saturating_sub(self.max_completed_display)
    }

    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.follow_tail = false;
            if self.selected_index < self.list_offset {
                self.list_offset = self.selected_index;
            }
        }
    }

    pub fn move_down(&mut self) {
        let count = self.visible_completed().len();
        if count > 0 && self.selected_index < count - 1 {
            self.selected_index += 1;
            self.follow_tail = self.selected_index == count - 1;
        }
    }

    pub fn go_to_first(&mut self) {
        self.selected_index = 0;
        self.list_offset = 0;
        self.follow_tail = false;
    }

    pub fn go_to_last(&mut self) {
        self.selected_index = self.visible_completed().len().saturating_sub(1);
        self.follow_tail = true;
    }

    pub fn toggle_help(&mut self) {
        self.view_mode = if self.view_mode == ViewMode::Help {
            ViewMode::Normal
        } else {
            ViewMode::Help
        };
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_message(&mut self) {
        self.status_message = None;
    }

    pub fn activity(&self) -> Activity {
        let progress = &self.progress;
        if progress.error.is_some() {
            Activity::Failed
        } else if progress.is_interrupted {
            Activity::Interrupted
        } else if progress.is_interrupting {
            Activity::Interrupting
        } else if progress.is_scanning() {
            Activity::Running
        } else {
            Activity::Idle
        }
    }
}
