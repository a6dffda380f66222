//! Statistics panel component.
//!
//! Shows repository counts once a scan has completed and a progress gauge
//! while one is running. Previous counts stay visible during a rescan.

use gs_core::FleetSummary;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Widget};

use crate::app::ScanState;
use crate::theme::Theme;

/// The statistics panel component.
pub struct StatsPanel<'a> {
    summary: FleetSummary,
    scan_state: &'a ScanState,
    theme: &'a Theme,
}

impl<'a> StatsPanel<'a> {
    /// Creates a new stats panel.
    #[must_use]
    pub const fn new(summary: FleetSummary, scan_state: &'a ScanState, theme: &'a Theme) -> Self {
        Self {
            summary,
            scan_state,
            theme,
        }
    }

    fn summary_line(&self) -> Line<'static> {
        if self.summary.is_empty() {
            return Line::from(Span::styled("No repositories found", self.theme.dimmed_style()));
        }

        let label = self.theme.dimmed_style();
        let bold = Modifier::BOLD;
        Line::from(vec![
            Span::styled("Repos: ", label),
            Span::styled(self.summary.total.to_string(), self.theme.base_style().add_modifier(bold)),
            Span::styled(" │ ", label),
            Span::styled("Dirty: ", label),
            Span::styled(
                self.summary.dirty.to_string(),
                self.theme.indicator_style(true).add_modifier(bold),
            ),
            Span::styled(" │ ", label),
            Span::styled("Clean: ", label),
            Span::styled(
                self.summary.clean.to_string(),
                self.theme.indicator_style(false).add_modifier(bold),
            ),
        ])
    }

    fn render_progress(&self, discovered: Option<usize>, finished: usize, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(30), Constraint::Length(30)])
            .split(area);

        let progress = match discovered {
            Some(total) => format!("{finished}/{total} repositories"),
            None => "walking directories".to_owned(),
        };
        let line = Line::from(vec![
            Span::styled(
                "Scanning... ",
                Style::default().fg(self.theme.dirty_fg).add_modifier(Modifier::BOLD),
            ),
            Span::styled(progress, self.theme.base_style()),
        ]);
        Paragraph::new(line).render(chunks[0], buf);

        let ratio = match discovered {
            #[allow(clippy::cast_precision_loss)]
            Some(total) if total > 0 => (finished as f64 / total as f64).clamp(0.0, 1.0),
            _ => 0.0,
        };
        Gauge::default()
            .gauge_style(Style::default().fg(self.theme.accent).bg(self.theme.overlay_bg))
            .ratio(ratio)
            .render(chunks[1], buf);
    }
}

impl Widget for &StatsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(self.theme.border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        match self.scan_state {
            ScanState::Scanning {
                discovered,
                finished,
            } => self.render_progress(*discovered, *finished, inner, buf),
            ScanState::Failed(message) => {
                let line = Line::from(vec![
                    Span::styled("Scan failed: ", self.theme.error_style().add_modifier(Modifier::BOLD)),
                    Span::styled(message.clone(), self.theme.error_style()),
                ]);
                Paragraph::new(line).render(inner, buf);
            }
            ScanState::NotStarted => {
                Paragraph::new(Span::styled("Starting scan...", self.theme.dimmed_style()))
                    .render(inner, buf);
            }
            ScanState::Complete => Paragraph::new(self.summary_line()).render(inner, buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(panel: &StatsPanel<'_>) -> String {
        let area = Rect::new(0, 0, 70, 2);
        let mut buf = Buffer::empty(area);
        panel.render(area, &mut buf);
        (0..area.width).map(|x| buf[(x, 0)].symbol().to_owned()).collect()
    }

    #[test]
    fn test_counts() {
        let theme = Theme::dark();
        let summary = FleetSummary {
            total: 5,
            dirty: 2,
            clean: 3,
        };
        let text = render(&StatsPanel::new(summary, &ScanState::Complete, &theme));
        assert!(text.starts_with("Repos: 5 │ Dirty: 2 │ Clean: 3"));
    }

    #[test]
    fn test_empty_differs_from_failed() {
        let theme = Theme::dark();
        let empty = render(&StatsPanel::new(FleetSummary::default(), &ScanState::Complete, &theme));
        assert!(empty.starts_with("No repositories found"));

        let failed_state = ScanState::Failed("git not found".to_owned());
        let failed = render(&StatsPanel::new(FleetSummary::default(), &failed_state, &theme));
        assert!(failed.starts_with("Scan failed: git not found"));
    }

    #[test]
    fn test_scanning_progress() {
        let theme = Theme::dark();
        let state = ScanState::Scanning {
            discovered: Some(4),
            finished: 1,
        };
        let text = render(&StatsPanel::new(FleetSummary::default(), &state, &theme));
        assert!(text.starts_with("Scanning... 1/4 repositories"));
    }
}
