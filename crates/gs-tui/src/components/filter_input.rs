//! Filter input overlay.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use crate::theme::Theme;

const CURSOR: &str = "▌";

/// A text input shown while typing a filter.
pub struct FilterInput<'a> {
    text: &'a str,
    theme: &'a Theme,
}

impl<'a> FilterInput<'a> {
    /// Creates a new filter input widget.
    #[must_use]
    pub const fn new(text: &'a str, theme: &'a Theme) -> Self {
        Self { text, theme }
    }
}

impl Widget for &FilterInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let cursor = Span::styled(CURSOR, self.theme.accent_style());
        let content = if self.text.is_empty() {
            Line::from(vec![
                Span::styled(
                    "name, path or branch...",
                    self.theme.dimmed_style().add_modifier(Modifier::ITALIC),
                ),
                cursor,
            ])
        } else {
            Line::from(vec![Span::styled(self.text, self.theme.base_style()), cursor])
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.focused_border_style)
            .title(Span::styled(
                " Filter (Esc to cancel, Enter to confirm) ",
                self.theme.accent_style().add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(self.theme.overlay_bg));

        Paragraph::new(content).block(block).render(area, buf);
    }
}
