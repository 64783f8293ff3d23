use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::progress_bar::{format_number, operation_style};
use crate::models::progress::CompletedFile;

pub struct FileListState {
    pub selected: usize,
    pub offset: usize,
}

/// Files handled so far in the session, oldest first.
pub struct FileList<'a> {
    items: &'a [CompletedFile],
    /// Files dropped from the front of `items` for display.
    hidden: usize,
    block: Option<Block<'a>>,
}

impl<'a> FileList<'a> {
    pub fn new(items: &'a [CompletedFile]) -> Self {
        Self {
            items,
            hidden: 0,
            block: None,
        }
    }

    pub fn hidden(mut self, hidden: usize) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }
}

impl StatefulWidget for FileList<'_> {
    type State = FileListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        // Render block border and get inner area
        let inner = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if inner.height < 2 || inner.width < 10 {
            return;
        }

        // Available rows for items (reserve 1 for footer)
        let list_height = (inner.height as usize).saturating_sub(1);
        if list_height == 0 {
            return;
        }

        if self.items.is_empty() {
            let empty = Line::from(Span::styled(
                "  Nothing handled yet",
                Style::default().fg(Color::DarkGray),
            ));
            buf.set_line(inner.x, inner.y, &empty, inner.width);
        } else {
            state.selected = state.selected.min(self.items.len() - 1);

            // Adjust offset to ensure selected item is visible
            if state.selected < state.offset {
                state.offset = state.selected;
            }
            if state.selected >= state.offset + list_height {
                state.offset = state.selected - list_height + 1;
            }

            let end = (state.offset + list_height).min(self.items.len());
            for (i, item) in self.items[state.offset..end].iter().enumerate() {
                let row_y = inner.y + i as u16;
                let idx = state.offset + i;
                let is_selected = idx == state.selected;

                let number = format!("{:>5} ", self.hidden + idx + 1);
                let operation = format!("{:<7}", item.operation.label());
                let path = item.path.to_string_lossy().to_string();

                let name_max =
                    (inner.width as usize).saturating_sub(number.len() + operation.len() + 1);
                let display_path = if path.width() > name_max {
                    let target = name_max.saturating_sub(3);
                    let mut w = 0;
                    let boundary = path
                        .char_indices()
                        .rev()
                        .find(|&(_, c)| {
                            w += unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
                            w > target
                        })
                        .map(|(i, c)| i + c.len_utf8())
                        .unwrap_or(0);
                    format!("...{}", &path[boundary..])
                } else {
                    path
                };

                let line = if is_selected {
                    let style = Style::default()
                        .bg(Color::DarkGray)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD);
                    Line::from(Span::styled(
                        format!("{}{}{}", number, operation, display_path),
                        style,
                    ))
                } else {
                    Line::from(vec![
                        Span::styled(number, Style::default().fg(Color::DarkGray)),
                        Span::styled(operation, operation_style(item.operation)),
                        Span::styled(display_path, Style::default().fg(Color::White)),
                    ])
                };
                buf.set_line(inner.x, row_y, &line, inner.width);
            }
        }

        // Footer: Total info
        let footer_y = inner.y + inner.height - 1;
        let total = self.hidden + self.items.len();
        let total_str = if self.hidden > 0 {
            format!(
                " Total: {} files ({} older not shown)",
                format_number(total),
                format_number(self.hidden)
            )
        } else {
            format!(" Total: {} files", format_number(total))
        };
        let footer = Line::from(Span::styled(total_str, Style::default().fg(Color::DarkGray)));
        buf.set_line(inner.x, footer_y, &footer, inner.width);
    }
}
