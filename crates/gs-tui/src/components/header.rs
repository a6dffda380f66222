//! Header bar component.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::theme::Theme;

/// Title, number of scanned roots, and the help hint.
pub struct HeaderBar<'a> {
    root_count: usize,
    theme: &'a Theme,
}

impl<'a> HeaderBar<'a> {
    /// Creates a new header bar.
    #[must_use]
    pub const fn new(root_count: usize, theme: &'a Theme) -> Self {
        Self { root_count, theme }
    }

    fn roots_label(&self) -> String {
        match self.root_count {
            1 => "1 root".to_owned(),
            n => format!("{n} roots"),
        }
    }
}

impl Widget for &HeaderBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let separator = Span::styled(" │ ", self.theme.dimmed_style());
        let line = Line::from(vec![
            Span::styled("git-scope", self.theme.accent_style().add_modifier(Modifier::BOLD)),
            separator.clone(),
            Span::styled(self.roots_label(), self.theme.base_style()),
            separator,
            Span::styled("? for help", self.theme.dimmed_style()),
        ]);

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(self.theme.border_style);

        Paragraph::new(line).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roots_label() {
        let theme = Theme::dark();
        assert_eq!(HeaderBar::new(1, &theme).roots_label(), "1 root");
        assert_eq!(HeaderBar::new(3, &theme).roots_label(), "3 roots");
    }

    #[test]
    fn test_render_title() {
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 40, 2);
        let mut buf = Buffer::empty(area);
        (&HeaderBar::new(2, &theme)).render(area, &mut buf);

        let first_row: String = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_owned())
            .collect();
        assert!(first_row.starts_with("git-scope │ 2 roots"));
    }
}
