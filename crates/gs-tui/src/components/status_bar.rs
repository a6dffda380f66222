//! Status bar component.
//!
//! Displays the mode, sort order, transient messages, filter state, and
//! the shown/total repository count.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::app::{App, AppMode};
use crate::theme::Theme;

/// The status bar component.
pub struct StatusBar<'a> {
    app: &'a App,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    /// Creates a new status bar.
    #[must_use]
    pub const fn new(app: &'a App, theme: &'a Theme) -> Self {
        Self { app, theme }
    }

    fn build_line(&self) -> Line<'a> {
        let separator = || Span::styled(" │ ", self.theme.dimmed_style());
        let mut spans = Vec::new();

        let mode_text = match self.app.mode {
            AppMode::Normal => "NORMAL",
            AppMode::Filtering => "FILTER",
            AppMode::Help => "HELP",
        };
        spans.push(Span::styled(
            format!(" {mode_text} "),
            Style::default()
                .fg(self.theme.overlay_bg)
                .bg(self.theme.accent)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));

        spans.push(Span::styled(
            format!("Sort: {}", self.app.sort.label()),
            self.theme.dimmed_style(),
        ));
        spans.push(separator());

        if let Some(ref status) = self.app.status {
            let style = if status.is_error {
                self.theme.error_style()
            } else {
                self.theme.base_style()
            };
            spans.push(Span::styled(status.text.clone(), style));
            spans.push(separator());
        }

        if self.app.filter.is_active() {
            spans.push(Span::styled("Filter: ", self.theme.dimmed_style()));
            if !self.app.filter.text.is_empty() {
                spans.push(Span::styled(
                    format!("\"{}\" ", self.app.filter.text),
                    self.theme.accent_style(),
                ));
            }
            if self.app.filter.dirty_only {
                spans.push(Span::styled("dirty only ", self.theme.indicator_style(true)));
            }
            spans.push(separator());
        }

        if self.app.unprobed > 0 {
            spans.push(Span::styled(
                format!("{} unprobed", self.app.unprobed),
                self.theme.error_style(),
            ));
            spans.push(separator());
        }

        spans.push(Span::styled(
            format!("{}/{}", self.app.visible_count(), self.app.repos().len()),
            self.theme.dimmed_style(),
        ));

        Line::from(spans)
    }
}

impl Widget for &StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.build_line())
            .style(self.theme.status_bar_style)
            .render(area, buf);
    }
}
