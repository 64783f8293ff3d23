use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::models::progress::Phase;
use crate::ui::app_state::{Activity, AppState, ViewMode};
use crate::ui::widgets::file_list::{FileList, FileListState};
use crate::ui::widgets::help_panel::HelpPanel;
use crate::ui::widgets::progress_bar::{format_number, FileProgress};
use crate::ui::widgets::status_bar::StatusBar;

pub fn render(frame: &mut Frame, state: &AppState) {
    render_progress(frame, state);
    if state.view_mode == ViewMode::Help {
        frame.render_widget(HelpPanel, centered_rect(60, 70, frame.area()));
    }
}

fn render_progress(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let error_height = if state.progress.error.is_some() { 4 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // title
            Constraint::Length(3),            // phase summary
            Constraint::Length(5),            // current file
            Constraint::Length(error_height), // failure
            Constraint::Min(5),               // completed files
            Constraint::Length(1),            // status bar
            Constraint::Length(1),            // key hints
        ])
        .split(area);

    // Title
    let title = Paragraph::new(Line::from(vec![
        Span::styled(" ScanWatch ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!(" - {} ", state.server_url),
            Style::default().fg(Color::White),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
    frame.render_widget(title, chunks[0]);

    render_summary(frame, chunks[1], state);

    let file_progress = FileProgress::new(state.progress.handling_file.as_ref()).block(
        Block::default()
            .title(" Current file ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(file_progress, chunks[2]);

    if let Some(error) = &state.progress.error {
        let failure = Paragraph::new(Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        )))
        .block(
            Block::default()
                .title(" Scan failed ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: false });
        frame.render_widget(failure, chunks[3]);
    }

    let file_list = FileList::new(state.visible_completed())
        .hidden(state.hidden_completed())
        .block(
            Block::default()
                .title(" Completed files ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    let mut list_state = FileListState {
        selected: state.selected_index,
        offset: state.list_offset,
    };
    frame.render_stateful_widget(file_list, chunks[4], &mut list_state);

    let status = StatusBar {
        watching: state.watching,
        completed: state.progress.completed_files.len(),
        scan_count: state.progress.scan_count,
        message: state.status_message.as_deref(),
    };
    frame.render_widget(status, chunks[5]);

    // Key hints
    let hints = Paragraph::new(Line::from(vec![
        Span::styled(" s", Style::default().fg(Color::Yellow)),
        Span::styled(": Scan  ", Style::default().fg(Color::DarkGray)),
        Span::styled("i", Style::default().fg(Color::Yellow)),
        Span::styled(": Interrupt  ", Style::default().fg(Color::DarkGray)),
        Span::styled("w", Style::default().fg(Color::Yellow)),
        Span::styled(": Watch  ", Style::default().fg(Color::DarkGray)),
        Span::styled("x", Style::default().fg(Color::Yellow)),
        Span::styled(": Export  ", Style::default().fg(Color::DarkGray)),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::styled(": Help  ", Style::default().fg(Color::DarkGray)),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::styled(": Quit", Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(hints, chunks[6]);
}

fn render_summary(frame: &mut Frame, area: Rect, state: &AppState) {
    let progress = &state.progress;

    let mut spans = Vec::new();
    for phase in [Phase::Scanning, Phase::HandlingFiles, Phase::Completed] {
        let style = if phase == progress.phase {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else if phase < progress.phase {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        if !spans.is_empty() {
            spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(phase.label(), style));
    }

    if progress.phase >= Phase::HandlingFiles {
        spans.push(Span::styled(
            format!("   {} files to handle", format_number(progress.scan_count as usize)),
            Style::default().fg(Color::White),
        ));
    }

    let activity = state.activity();
    let activity_style = match activity {
        Activity::Failed | Activity::Interrupted => Style::default().fg(Color::Red),
        Activity::Interrupting => Style::default().fg(Color::Yellow),
        Activity::Running => Style::default().fg(Color::Green),
        Activity::Idle => Style::default().fg(Color::DarkGray),
    };
    spans.push(Span::styled("   ", Style::default()));
    spans.push(Span::styled(
        format!("[{}]", activity.label()),
        activity_style.add_modifier(Modifier::BOLD),
    ));

    let summary = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" Phase ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(summary, area);
}

/// Helper to create a centered rectangle within a given area
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
