//! Main UI layout and rendering orchestration.
//!
//! # Layout Structure
//!
//! ```text
//! +--------------------------------------------------------------------+
//! | git-scope │ 2 roots │ ? for help                                   |
//! +--------------------------------------------------------------------+
//! | Repos: 12 │ Dirty: 3 │ Clean: 9          (or scan progress gauge)  |
//! +--------------------------------------------------------------------+
//! |   Repository  Path           Branch  Staged Modified Untracked ... |
//! | ▸ ● api       …/code/api     main    2      —        —         ... |
//! |   ○ web       …/code/web     develop —      —        —         ... |
//! +--------------------------------------------------------------------+
//!  NORMAL  Sort: Dirty First │ 12 repositories │ 12/12
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::{App, AppMode};
use crate::components::{FilterInput, HeaderBar, HelpPanel, RepoTable, StatsPanel, StatusBar};
use crate::theme::Theme;

/// Renders the whole interface.
///
/// Takes the app mutably so the table can record its visible height for
/// page navigation.
pub fn render(app: &mut App, frame: &mut Frame, theme: &Theme) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Length(2), // Stats
            Constraint::Min(5),    // Table
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let header = HeaderBar::new(app.scanner.options().roots.len(), theme);
    frame.render_widget(&header, chunks[0]);

    let stats = StatsPanel::new(app.summary(), &app.scan_state, theme);
    frame.render_widget(&stats, chunks[1]);

    let mut list_state = app.list_state.clone();
    {
        let table = RepoTable::new(
            app.visible_repos(),
            app.repos().len(),
            app.filter.is_active(),
            theme,
        );
        frame.render_stateful_widget(&table, chunks[2], &mut list_state);
    }
    app.list_state = list_state;

    let status_bar = StatusBar::new(app, theme);
    frame.render_widget(&status_bar, chunks[3]);

    match app.mode {
        AppMode::Filtering => {
            let input = FilterInput::new(&app.filter.text, theme);
            frame.render_widget(&input, centered_rect(50, 3, area));
        }
        AppMode::Help => {
            let help = HelpPanel::new(theme);
            frame.render_widget(&help, centered_percent(60, 70, area));
        }
        AppMode::Normal => {}
    }
}

/// A rectangle `percent_x` wide and `height` rows tall, centered in `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    horizontal_center(percent_x, vertical[1])
}

/// A rectangle with percentage width and height, centered in `area`.
fn centered_percent(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    horizontal_center(percent_x, vertical[1])
}

fn horizontal_center(percent_x: u16, area: Rect) -> Rect {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area)[1]
}
