use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::models::progress::{FileOperation, HandlingFile, PageProgress};

/// Current file with its parse and index page progress.
pub struct FileProgress<'a> {
    pub file: Option<&'a HandlingFile>,
    pub block: Option<Block<'a>>,
}

impl<'a> FileProgress<'a> {
    pub fn new(file: Option<&'a HandlingFile>) -> Self {
        Self { file, block: None }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for FileProgress<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        if inner.height < 1 || inner.width < 20 {
            return;
        }

        let Some(file) = self.file else {
            let idle = Line::from(Span::styled(
                " No file in progress",
                Style::default().fg(Color::DarkGray),
            ));
            buf.set_line(inner.x, inner.y, &idle, inner.width);
            return;
        };

        // Line 1: operation + path
        let path = file.path.to_string_lossy();
        let path_display = truncate_path(&path, (inner.width as usize).saturating_sub(12));
        let path_line = Line::from(vec![
            Span::styled(
                format!(" {:<7}", file.operation.label()),
                operation_style(file.operation).add_modifier(Modifier::BOLD),
            ),
            Span::styled(path_display, Style::default().fg(Color::White)),
        ]);
        buf.set_line(inner.x, inner.y, &path_line, inner.width);

        // Lines 2-3: page gauges
        let gauges = [("Parse", file.parse_progress), ("Index", file.index_progress)];
        for (row, (label, pages)) in gauges.iter().enumerate() {
            let y = inner.y + 1 + row as u16;
            if y >= inner.y + inner.height {
                break;
            }
            let line = gauge_line(label, *pages, inner.width as usize);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

fn gauge_line(label: &str, pages: Option<PageProgress>, width: usize) -> Line<'static> {
    let Some(pages) = pages else {
        return Line::from(vec![
            Span::styled(format!(" {:<7}", label), Style::default().fg(Color::DarkGray)),
            Span::styled("waiting", Style::default().fg(Color::DarkGray)),
        ]);
    };

    let counter = format!(" {}/{}", format_number(pages.index as usize), format_number(pages.total as usize));
    let bar_width = width.saturating_sub(8 + counter.len() + 2).max(4);
    let filled = ((bar_width as f64) * pages.ratio()).round() as usize;
    let filled = filled.min(bar_width);

    Line::from(vec![
        Span::styled(format!(" {:<7}", label), Style::default().fg(Color::DarkGray)),
        Span::styled("[", Style::default().fg(Color::DarkGray)),
        Span::styled("#".repeat(filled), Style::default().fg(Color::Cyan)),
        Span::styled("-".repeat(bar_width - filled), Style::default().fg(Color::DarkGray)),
        Span::styled("]", Style::default().fg(Color::DarkGray)),
        Span::styled(counter, Style::default().fg(Color::White)),
    ])
}

pub fn operation_style(operation: FileOperation) -> Style {
    let fg = match operation {
        FileOperation::Create => Color::Green,
        FileOperation::Update => Color::Yellow,
        FileOperation::Remove => Color::Red,
    };
    Style::default().fg(fg)
}

pub fn truncate_path(path: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthStr;
    if path.width() <= max_width {
        return path.to_string();
    }
    if max_width < 6 {
        return "...".to_string();
    }
    // Show start and end of path
    let keep = max_width - 3; // for "..."
    let tail_len = keep / 2;
    let head_len = keep - tail_len;

    // Find char boundary for head
    let mut w = 0;
    let head_end = path
        .char_indices()
        .find(|&(_, c)| {
            w += unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
            w > head_len
        })
        .map(|(i, _)| i)
        .unwrap_or(path.len());

    // Find char boundary for tail
    w = 0;
    let tail_start = path
        .char_indices()
        .rev()
        .find(|&(_, c)| {
            w += unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
            w > tail_len
        })
        .map(|(i, _)| i + path[i..].chars().next().map(|c| c.len_utf8()).unwrap_or(0))
        .unwrap_or(0);

    format!("{}...{}", &path[..head_end], &path[tail_start..])
}

pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
