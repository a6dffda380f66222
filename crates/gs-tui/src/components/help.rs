//! Help overlay listing key bindings.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Clear, Row, Table, Widget};

use crate::theme::Theme;

struct KeyBinding {
    key: &'static str,
    description: &'static str,
    mode: &'static str,
}

const KEY_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "j / ↓",
        description: "Next repository",
        mode: "Normal",
    },
    KeyBinding {
        key: "k / ↑",
        description: "Previous repository",
        mode: "Normal",
    },
    KeyBinding {
        key: "g / Home",
        description: "First repository",
        mode: "Normal",
    },
    KeyBinding {
        key: "G / End",
        description: "Last repository",
        mode: "Normal",
    },
    KeyBinding {
        key: "PgDn / PgUp",
        description: "Page down / up",
        mode: "Normal",
    },
    KeyBinding {
        key: "/",
        description: "Filter by name, path, branch",
        mode: "Normal",
    },
    KeyBinding {
        key: "f",
        description: "Toggle dirty only",
        mode: "Normal",
    },
    KeyBinding {
        key: "s",
        description: "Cycle sort mode",
        mode: "Normal",
    },
    KeyBinding {
        key: "1-4",
        description: "Sort: dirty, name, branch, recent",
        mode: "Normal",
    },
    KeyBinding {
        key: "Esc",
        description: "Clear filter / Exit mode",
        mode: "Any",
    },
    KeyBinding {
        key: "Enter",
        description: "Open in editor / Confirm filter",
        mode: "Normal/Filter",
    },
    KeyBinding {
        key: "e",
        description: "Show configured editor",
        mode: "Normal",
    },
    KeyBinding {
        key: "r",
        description: "Rescan",
        mode: "Normal",
    },
    KeyBinding {
        key: "?",
        description: "Toggle help",
        mode: "Normal",
    },
    KeyBinding {
        key: "q / Ctrl+c",
        description: "Quit",
        mode: "Any",
    },
];

/// A help panel overlay widget.
pub struct HelpPanel<'a> {
    theme: &'a Theme,
}

impl<'a> HelpPanel<'a> {
    /// Creates a new help panel.
    #[must_use]
    pub const fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    fn build_rows(&self) -> Vec<Row<'static>> {
        KEY_BINDINGS
            .iter()
            .map(|binding| {
                Row::new(vec![
                    Cell::from(Span::styled(
                        binding.key,
                        Style::default()
                            .fg(self.theme.dirty_fg)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Cell::from(Span::styled(binding.description, self.theme.base_style())),
                    Cell::from(Span::styled(binding.mode, self.theme.dimmed_style())),
                ])
            })
            .collect()
    }
}

impl Widget for &HelpPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let title_style = self.theme.accent_style().add_modifier(Modifier::BOLD);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.focused_border_style)
            .title(Span::styled(" Help - Key Bindings ", title_style))
            .style(Style::default().bg(self.theme.overlay_bg));

        let column_style = title_style.add_modifier(Modifier::UNDERLINED);
        let header = Row::new(["Key", "Action", "Mode"].map(|t| Cell::from(Span::styled(t, column_style))))
            .height(1)
            .bottom_margin(1);

        let widths = [
            Constraint::Length(13),
            Constraint::Min(30),
            Constraint::Length(14),
        ];

        Table::new(self.build_rows(), widths)
            .block(block)
            .header(header)
            .render(area, buf);
    }
}
