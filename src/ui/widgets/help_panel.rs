use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

pub struct HelpPanel;

impl Widget for HelpPanel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let help_text = vec![
            Line::from(Span::styled(
                " ScanWatch - Keyboard Shortcuts ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "  Scan",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            help_line("    s           ", "Start a scan"),
            help_line("    i           ", "Interrupt the running scan"),
            help_line("    w           ", "Start / stop watching progress"),
            help_line("    x           ", "Export progress as JSON"),
            Line::from(""),
            Line::from(Span::styled(
                "  Completed files",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            help_line("    j / Down    ", "Move down"),
            help_line("    k / Up      ", "Move up"),
            help_line("    gg          ", "Go to first file"),
            help_line("    G           ", "Go to last file and follow"),
            Line::from(""),
            help_line("    ?           ", "Toggle this help"),
            help_line("    q / Ctrl+C  ", "Quit"),
            Line::from(""),
            Line::from(Span::styled(
                "  Press ? or Esc to close",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let help = Paragraph::new(help_text)
            .block(
                Block::default()
                    .title(" Help ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .style(Style::default().bg(Color::Black));
        help.render(area, buf);
    }
}

fn help_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(key, Style::default().fg(Color::Green)),
        Span::raw(desc),
    ])
}
