use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

use crate::ui::app_state::{AppState, ViewMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    Scan,
    Interrupt,
    ToggleWatch,
    Export,
}

pub fn handle_key_event(key: KeyEvent, state: &mut AppState) -> InputAction {
    // Handle Ctrl+C globally
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return InputAction::Quit;
    }

    match state.view_mode {
        ViewMode::Normal => handle_normal_mode(key, state),
        ViewMode::Help => handle_help_mode(key, state),
    }
}

fn handle_normal_mode(key: KeyEvent, state: &mut AppState) -> InputAction {
    // Handle 'g' prefix for 'gg'
    if state.pending_g {
        state.pending_g = false;
        if key.code == KeyCode::Char('g') {
            state.go_to_first();
            return InputAction::None;
        }
        // If not 'g', fall through to normal handling
    }

    match key.code {
        KeyCode::Char('q') => {
            state.should_quit = true;
            InputAction::Quit
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.move_down();
            InputAction::None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.move_up();
            InputAction::None
        }
        KeyCode::Char('g') => {
            state.pending_g = true;
            InputAction::None
        }
        KeyCode::Char('G') | KeyCode::End => {
            state.go_to_last();
            InputAction::None
        }
        KeyCode::Char('?') => {
            state.toggle_help();
            InputAction::None
        }
        KeyCode::Esc => {
            state.clear_message();
            InputAction::None
        }
        KeyCode::Char('s') => InputAction::Scan,
        KeyCode::Char('i') => InputAction::Interrupt,
        KeyCode::Char('w') => InputAction::ToggleWatch,
        KeyCode::Char('x') => InputAction::Export,
        _ => InputAction::None,
    }
}

fn handle_help_mode(key: KeyEvent, state: &mut AppState) -> InputAction {
    match key.code {
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
            state.toggle_help();
            InputAction::None
        }
        _ => InputAction::None,
    }
}

pub fn poll_event(timeout: Duration) -> anyhow::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}
