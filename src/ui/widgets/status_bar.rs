use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

use super::progress_bar::format_number;

pub struct StatusBar<'a> {
    pub watching: bool,
    pub completed: usize,
    pub scan_count: u64,
    pub message: Option<&'a str>,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 10 {
            return;
        }

        // If there is a temporary message, show it
        if let Some(msg) = self.message {
            let line = Line::from(Span::styled(
                format!(" {}", msg),
                Style::default().fg(Color::Green),
            ));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let mut spans = Vec::new();

        // Left: connection
        if self.watching {
            spans.push(Span::styled(" * watching ", Style::default().fg(Color::Green)));
        } else {
            spans.push(Span::styled(
                " o not watching (press 'w') ",
                Style::default().fg(Color::Red),
            ));
        }
        spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));

        // Right: file counts
        spans.push(Span::styled(
            format!(
                "Handled: {} / {} files",
                format_number(self.completed),
                format_number(self.scan_count as usize)
            ),
            Style::default().fg(Color::White),
        ));

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
