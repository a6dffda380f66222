//! Repository table component.

use gs_core::Repo;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::text::Span;
use ratatui::widgets::{
    Block, Borders, Cell, HighlightSpacing, Row, StatefulWidget, Table, TableState,
};

use crate::app::RepoListState;
use crate::format;
use crate::theme::Theme;

const NAME_WIDTH: u16 = 20;
const PATH_WIDTH: u16 = 30;
const BRANCH_WIDTH: u16 = 15;

const DIRTY_INDICATOR: &str = "●";
const CLEAN_INDICATOR: &str = "○";

/// A stateful table of repositories in display order.
pub struct RepoTable<'a> {
    repos: Vec<&'a Repo>,
    total: usize,
    filtered: bool,
    theme: &'a Theme,
}

impl<'a> RepoTable<'a> {
    /// Creates a table over the visible repositories.
    ///
    /// `total` is the number of repositories before filtering.
    #[must_use]
    pub fn new(repos: impl IntoIterator<Item = &'a Repo>, total: usize, filtered: bool, theme: &'a Theme) -> Self {
        Self {
            repos: repos.into_iter().collect(),
            total,
            filtered,
            theme,
        }
    }

    fn header(&self) -> Row<'static> {
        Row::new(
            [
                "", "Repository", "Path", "Branch", "Staged", "Modified", "Untracked", "Last Commit",
            ]
            .map(|title| Cell::from(Span::styled(title, self.theme.header_style))),
        )
        .height(1)
    }

    fn build_row(&self, repo: &Repo) -> Row<'static> {
        let status = &repo.status;
        let dirty = repo.is_dirty();
        let indicator = if dirty { DIRTY_INDICATOR } else { CLEAN_INDICATOR };

        let count_cell = |n: u32, color| {
            let style = if n == 0 {
                self.theme.dimmed_style()
            } else {
                self.theme.base_style().fg(color)
            };
            Cell::from(Span::styled(format::count(n), style))
        };

        Row::new(vec![
            Cell::from(Span::styled(indicator, self.theme.indicator_style(dirty))),
            Cell::from(Span::styled(
                format::truncate_end(&repo.name, NAME_WIDTH.into()),
                self.theme.base_style(),
            )),
            Cell::from(Span::styled(
                format::truncate_start(repo.path.as_str(), PATH_WIDTH.into()),
                self.theme.dimmed_style(),
            )),
            Cell::from(Span::styled(
                format::truncate_end(&status.branch, BRANCH_WIDTH.into()),
                self.theme.accent_style(),
            )),
            count_cell(status.staged, self.theme.staged_fg),
            count_cell(status.unstaged, self.theme.unstaged_fg),
            count_cell(status.untracked, self.theme.untracked_fg),
            Cell::from(Span::styled(
                format::last_commit(status.last_commit),
                self.theme.dimmed_style(),
            )),
        ])
    }

    fn title(&self) -> String {
        if self.filtered {
            format!(" Repositories ({}/{}) ", self.repos.len(), self.total)
        } else {
            format!(" Repositories ({}) ", self.total)
        }
    }
}

impl StatefulWidget for &RepoTable<'_> {
    type State = RepoListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        // Borders and header row.
        state.visible_height = usize::from(area.height.saturating_sub(3));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style)
            .title(Span::styled(self.title(), self.theme.header_style));

        let rows: Vec<Row<'_>> = self.repos.iter().map(|repo| self.build_row(repo)).collect();
        let widths = [
            Constraint::Length(1),
            Constraint::Length(NAME_WIDTH),
            Constraint::Min(PATH_WIDTH),
            Constraint::Length(BRANCH_WIDTH),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(12),
        ];

        let table = Table::new(rows, widths)
            .block(block)
            .header(self.header())
            .row_highlight_style(self.theme.highlight_style)
            .highlight_spacing(HighlightSpacing::Always)
            .highlight_symbol("▸ ");

        let mut table_state = TableState::default();
        table_state.select(state.selected);
        *table_state.offset_mut() = state.scroll_offset;

        StatefulWidget::render(table, area, buf, &mut table_state);
        state.scroll_offset = table_state.offset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gs_core::RepoStatus;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol().to_owned()).collect()
    }

    #[test]
    fn test_render_rows() {
        let theme = Theme::dark();
        let mut dirty = RepoStatus::new("main");
        dirty.staged = 2;
        let repos = [
            Repo::new("/code/api".into(), dirty),
            Repo::new("/code/web".into(), RepoStatus::new("develop")),
        ];
        let table = RepoTable::new(&repos, 2, false, &theme);

        let area = Rect::new(0, 0, 130, 6);
        let mut buf = Buffer::empty(area);
        let mut state = RepoListState::new();
        state.selected = Some(0);
        StatefulWidget::render(&table, area, &mut buf, &mut state);

        assert_eq!(state.visible_height, 3);
        assert!(row_text(&buf, 0).contains("Repositories (2)"));
        assert!(row_text(&buf, 1).contains("Last Commit"));

        let first = row_text(&buf, 2);
        assert!(first.contains('▸'));
        assert!(first.contains('●'));
        assert!(first.contains("api"));
        assert!(first.contains("N/A"));

        let second = row_text(&buf, 3);
        assert!(second.contains('○'));
        assert!(second.contains("develop"));
        assert!(second.contains('—'));
    }

    #[test]
    fn test_filtered_title() {
        let theme = Theme::dark();
        let repos = [Repo::new("/code/api".into(), RepoStatus::new("main"))];
        assert_eq!(RepoTable::new(&repos, 4, true, &theme).title(), " Repositories (1/4) ");
    }
}
