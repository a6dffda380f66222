//! Application state and lifecycle management.
//!
//! # Architecture
//!
//! ```text
//! App
//!  ├── config: Config            # Editor, roots, theme settings
//!  ├── scanner: Scanner          # Shared by every background scan
//!  ├── repos: Vec<Repo>          # Last completed scan, ordered by path
//!  ├── view: Vec<usize>          # Filtered + sorted indices into repos
//!  ├── generation: u64           # Tag of the scan whose results we accept
//!  ├── scan_state: ScanState
//!  ├── mode: AppMode
//!  ├── list_state: RepoListState
//!  ├── filter: FilterState
//!  └── status: Option<StatusMessage>
//! ```
//!
//! The app never runs scans or editors itself. It records a request
//! ([`App::take_scan_request`], [`App::take_editor_request`]) and the event
//! loop in `lib.rs` carries it out.

use std::time::{Duration, Instant};

use camino::{Utf8Path, Utf8PathBuf};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gs_core::{Config, FleetSummary, Repo};
use gs_scanner::{ScanReport, ScanUpdate, Scanner};
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::sort::SortMode;

/// How long a status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(5);

/// The current mode of the application UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Normal browsing mode.
    #[default]
    Normal,

    /// Filter input mode (typing a filter).
    Filtering,

    /// Help panel is displayed.
    Help,
}

/// Progress of the current scan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanState {
    /// No scan has been started yet.
    #[default]
    NotStarted,

    /// A scan is running.
    Scanning {
        /// Repositories found by the walk, once known.
        discovered: Option<usize>,
        /// Probes finished so far.
        finished: usize,
    },

    /// The last scan completed.
    Complete,

    /// The last scan could not run at all.
    Failed(String),
}

impl ScanState {
    /// Returns `true` while a scan is running.
    #[must_use]
    pub const fn is_scanning(&self) -> bool {
        matches!(self, Self::Scanning { .. })
    }
}

/// Selection and scroll state for the repository table.
#[derive(Debug, Clone, Default)]
pub struct RepoListState {
    /// Currently selected row (if any).
    pub selected: Option<usize>,

    /// First visible row.
    pub scroll_offset: usize,

    /// Height of the visible area (for page navigation).
    pub visible_height: usize,
}

impl RepoListState {
    /// Creates a new list state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves selection to the next row, wrapping to the top.
    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < len => i + 1,
            Some(_) | None => 0,
        });
        self.ensure_visible();
    }

    /// Moves selection to the previous row, wrapping to the bottom.
    pub fn select_previous(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        });
        self.ensure_visible();
    }

    /// Moves selection to the first row.
    pub fn select_first(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
        } else {
            self.selected = Some(0);
            self.scroll_offset = 0;
        }
    }

    /// Moves selection to the last row.
    pub fn select_last(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
        } else {
            self.selected = Some(len - 1);
            self.ensure_visible();
        }
    }

    /// Moves selection down by one page.
    pub fn page_down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let page = self.visible_height.max(1);
        self.selected = Some(self.selected.map_or(0, |i| (i + page).min(len - 1)));
        self.ensure_visible();
    }

    /// Moves selection up by one page.
    pub fn page_up(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let page = self.visible_height.max(1);
        self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(page)));
        self.ensure_visible();
    }

    /// Selects `index`, clamped to the list, or nothing if the list is empty.
    pub fn reset(&mut self, index: usize, len: usize) {
        if len == 0 {
            self.selected = None;
            self.scroll_offset = 0;
        } else {
            self.selected = Some(index.min(len - 1));
            self.scroll_offset = self.scroll_offset.min(len - 1);
            self.ensure_visible();
        }
    }

    fn ensure_visible(&mut self) {
        let Some(selected) = self.selected else {
            return;
        };
        let height = self.visible_height.max(1);
        if selected < self.scroll_offset {
            self.scroll_offset = selected;
        } else if selected >= self.scroll_offset + height {
            self.scroll_offset = selected + 1 - height;
        }
    }
}

/// Which repositories are shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Case-insensitive substring over name, path, and branch.
    pub text: String,

    /// Show only repositories with changes.
    pub dirty_only: bool,
}

impl FilterState {
    /// Returns `true` if any filter is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.text.is_empty() || self.dirty_only
    }

    /// Clears all filters.
    pub fn clear(&mut self) {
        self.text.clear();
        self.dirty_only = false;
    }

    /// Returns `true` if `repo` passes the filter.
    #[must_use]
    pub fn matches(&self, repo: &Repo) -> bool {
        if self.dirty_only && !repo.is_dirty() {
            return false;
        }
        if self.text.is_empty() {
            return true;
        }
        let needle = self.text.to_lowercase();
        repo.name.to_lowercase().contains(&needle)
            || repo.path.as_str().to_lowercase().contains(&needle)
            || repo.status.branch.to_lowercase().contains(&needle)
    }
}

/// Status message to display in the status bar.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    /// The message text.
    pub text: String,

    /// When the message was created.
    pub timestamp: Instant,

    /// Whether this is an error message.
    pub is_error: bool,
}

impl StatusMessage {
    /// Creates a new info message.
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Instant::now(),
            is_error: false,
        }
    }

    /// Creates a new error message.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Instant::now(),
            is_error: true,
        }
    }

    /// Returns `true` once the message has been shown long enough.
    ///
    /// Errors stay until replaced.
    #[must_use]
    pub fn should_hide(&self) -> bool {
        !self.is_error && self.timestamp.elapsed() > STATUS_TTL
    }
}

/// The main application state.
pub struct App {
    /// The configuration.
    pub config: Config,

    /// The repository scanner.
    pub scanner: Scanner,

    /// Repositories from the last completed scan, ordered by path.
    repos: Vec<Repo>,

    /// Indices into `repos` after filtering and sorting.
    view: Vec<usize>,

    /// Generation of the most recently started scan.
    generation: u64,

    /// Progress of the current scan.
    pub scan_state: ScanState,

    /// Repositories the last scan found but could not probe.
    pub unprobed: usize,

    /// Warnings from the last scan (skipped roots and directories).
    pub warnings: usize,

    /// Current UI mode.
    pub mode: AppMode,

    /// Table selection state.
    pub list_state: RepoListState,

    /// Current filter configuration.
    pub filter: FilterState,

    /// Current sort mode.
    pub sort: SortMode,

    /// Status message to display.
    pub status: Option<StatusMessage>,

    /// Set when a new scan should be started.
    scan_requested: bool,

    /// Repository to open in the editor.
    editor_request: Option<Utf8PathBuf>,

    /// Whether the application should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates a new application with the given configuration and scanner.
    ///
    /// The first scan is requested immediately.
    #[must_use]
    pub fn new(config: Config, scanner: Scanner) -> Self {
        Self {
            config,
            scanner,
            repos: Vec::new(),
            view: Vec::new(),
            generation: 0,
            scan_state: ScanState::NotStarted,
            unprobed: 0,
            warnings: 0,
            mode: AppMode::Normal,
            list_state: RepoListState::new(),
            filter: FilterState::default(),
            sort: SortMode::default(),
            status: None,
            scan_requested: true,
            editor_request: None,
            should_quit: false,
        }
    }

    /// Handles a key event and returns the resulting action.
    #[must_use]
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.mode {
            AppMode::Normal => self.handle_normal_key(key),
            AppMode::Filtering => self.handle_filter_key(key),
            AppMode::Help => Self::handle_help_key(key),
        }
    }

    fn handle_normal_key(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('?') => Action::ToggleHelp,
            KeyCode::Char('j') | KeyCode::Down => Action::NextItem,
            KeyCode::Char('k') | KeyCode::Up => Action::PreviousItem,
            KeyCode::Char('g') | KeyCode::Home => Action::FirstItem,
            KeyCode::Char('G') | KeyCode::End => Action::LastItem,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::Char('/') => Action::EnterFilterMode,
            KeyCode::Char('f') => Action::ToggleDirtyOnly,
            KeyCode::Char('s') => Action::CycleSort,
            KeyCode::Char(c @ '1'..='4') => SortMode::from_shortcut(c).map_or(Action::None, Action::SetSort),
            KeyCode::Char('r') => Action::Rescan,
            KeyCode::Char('e') => Action::ShowEditor,
            KeyCode::Enter => Action::OpenInEditor,
            KeyCode::Esc if self.filter.is_active() => Action::ClearFilter,
            _ => Action::None,
        }
    }

    fn handle_filter_key(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::CancelFilter,
            KeyCode::Enter => Action::ConfirmFilter,
            KeyCode::Backspace => {
                let mut text = self.filter.text.clone();
                text.pop();
                Action::SetFilter(text)
            }
            KeyCode::Char(c) => {
                let mut text = self.filter.text.clone();
                text.push(c);
                Action::SetFilter(text)
            }
            _ => Action::None,
        }
    }

    fn handle_help_key(key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q' | '?') => Action::HideHelp,
            _ => Action::None,
        }
    }

    /// Updates the application state based on an action.
    pub fn update(&mut self, action: Action) {
        let len = self.view.len();
        match action {
            Action::Quit => self.should_quit = true,

            Action::NextItem => self.list_state.select_next(len),
            Action::PreviousItem => self.list_state.select_previous(len),
            Action::FirstItem => self.list_state.select_first(len),
            Action::LastItem => self.list_state.select_last(len),
            Action::PageDown => self.list_state.page_down(len),
            Action::PageUp => self.list_state.page_up(len),

            Action::EnterFilterMode => self.mode = AppMode::Filtering,
            Action::ConfirmFilter => self.mode = AppMode::Normal,
            Action::CancelFilter => {
                self.filter.text.clear();
                self.mode = AppMode::Normal;
                self.rebuild_view();
            }
            Action::SetFilter(text) => {
                self.filter.text = text;
                self.rebuild_view();
            }
            Action::ClearFilter => {
                self.filter.clear();
                self.mode = AppMode::Normal;
                self.rebuild_view();
            }
            Action::ToggleDirtyOnly => {
                self.filter.dirty_only = !self.filter.dirty_only;
                self.rebuild_view();
                let text = if self.filter.dirty_only {
                    "Showing dirty repositories only"
                } else {
                    "Showing all repositories"
                };
                self.status = Some(StatusMessage::info(text));
            }
            Action::CycleSort => self.set_sort(self.sort.next()),
            Action::SetSort(mode) => self.set_sort(mode),

            Action::Rescan => {
                self.scan_requested = true;
                self.status = Some(StatusMessage::info("Rescanning..."));
            }
            Action::OpenInEditor => {
                if let Some(repo) = self.selected_repo() {
                    let text = format!("Opening {} in {}...", repo.name, self.config.editor);
                    self.editor_request = Some(repo.path.clone());
                    self.status = Some(StatusMessage::info(text));
                }
            }
            Action::ShowEditor => {
                let text = format!(
                    "Editor: {} (change in {})",
                    self.config.editor,
                    Config::default_path()
                );
                self.status = Some(StatusMessage::info(text));
            }

            Action::ToggleHelp => {
                self.mode = if self.mode == AppMode::Help {
                    AppMode::Normal
                } else {
                    AppMode::Help
                };
            }
            Action::HideHelp => self.mode = AppMode::Normal,

            Action::ShowStatus(text) => self.status = Some(StatusMessage::info(text)),
            Action::ClearStatus => self.status = None,

            Action::Render | Action::Tick | Action::None => {}
        }
    }

    /// Handles a tick event (periodic update).
    pub fn tick(&mut self) {
        if self.status.as_ref().is_some_and(StatusMessage::should_hide) {
            self.status = None;
        }
    }

    fn set_sort(&mut self, mode: SortMode) {
        self.sort = mode;
        self.rebuild_view();
        self.status = Some(StatusMessage::info(format!("Sorted by: {}", mode.label())));
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    /// Returns `true` once if a scan was requested since the last call.
    pub fn take_scan_request(&mut self) -> bool {
        std::mem::take(&mut self.scan_requested)
    }

    /// Starts a new scan generation and returns its tag.
    ///
    /// Updates from older generations are ignored from now on.
    pub fn begin_scan(&mut self) -> u64 {
        self.generation += 1;
        self.scan_state = ScanState::Scanning {
            discovered: None,
            finished: 0,
        };
        info!(generation = self.generation, "Starting scan");
        self.generation
    }

    /// The generation of the most recently started scan.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Applies an update from the scan tagged `generation`.
    pub fn handle_scan_update(&mut self, generation: u64, update: ScanUpdate) {
        if generation != self.generation {
            debug!(generation, current = self.generation, "Discarding stale scan update");
            return;
        }

        match update {
            ScanUpdate::CandidatesDiscovered(count) => {
                if let ScanState::Scanning { discovered, .. } = &mut self.scan_state {
                    *discovered = Some(count);
                }
            }
            ScanUpdate::RepoProbed(_) => self.count_finished_probe(),
            ScanUpdate::ProbeFailed { path, message } => {
                debug!(%path, %message, "Repository could not be probed");
                self.count_finished_probe();
            }
            ScanUpdate::Complete(report) => self.apply_report(report),
        }
    }

    /// Records that the scan tagged `generation` could not run.
    pub fn handle_scan_failure(&mut self, generation: u64, message: String) {
        if generation != self.generation {
            debug!(generation, "Discarding stale scan failure");
            return;
        }
        warn!(generation, error = %message, "Scan failed");
        self.status = Some(StatusMessage::error(format!("Scan failed: {message}")));
        self.scan_state = ScanState::Failed(message);
    }

    fn count_finished_probe(&mut self) {
        if let ScanState::Scanning { finished, .. } = &mut self.scan_state {
            *finished += 1;
        }
    }

    fn apply_report(&mut self, report: ScanReport) {
        let headline = report.headline();
        self.unprobed = report.failures.len();
        self.warnings = report.warnings.len();
        self.repos = report.repos;
        self.scan_state = ScanState::Complete;
        self.rebuild_view();

        info!(
            generation = self.generation,
            repos = self.repos.len(),
            unprobed = self.unprobed,
            "Scan applied"
        );
        self.status = Some(if self.unprobed > 0 {
            StatusMessage::error(headline)
        } else {
            StatusMessage::info(headline)
        });
    }

    // =========================================================================
    // Editor
    // =========================================================================

    /// Takes the repository path waiting to be opened, if any.
    pub fn take_editor_request(&mut self) -> Option<Utf8PathBuf> {
        self.editor_request.take()
    }

    /// Records the result of running the editor and requests a rescan.
    pub fn editor_closed(&mut self, path: &Utf8Path, result: Result<(), String>) {
        match result {
            Ok(()) => {
                debug!(%path, "Editor closed");
                self.status = None;
            }
            Err(e) => {
                warn!(%path, error = %e, "Editor failed");
                self.status = Some(StatusMessage::error(format!("Error: {e}")));
            }
        }
        self.scan_requested = true;
    }

    // =========================================================================
    // View
    // =========================================================================

    /// Recomputes the visible rows, keeping the selected repository selected
    /// when it is still shown.
    fn rebuild_view(&mut self) {
        let selected_path = self.selected_repo().map(|r| r.path.clone());

        let mut view: Vec<usize> = self
            .repos
            .iter()
            .enumerate()
            .filter(|(_, repo)| self.filter.matches(repo))
            .map(|(i, _)| i)
            .collect();
        self.sort.sort_indices(&self.repos, &mut view);
        self.view = view;

        let index = selected_path
            .and_then(|path| self.view.iter().position(|&i| self.repos[i].path == path))
            .unwrap_or(0);
        self.list_state.reset(index, self.view.len());
    }

    /// Returns the currently selected repository, if any.
    #[must_use]
    pub fn selected_repo(&self) -> Option<&Repo> {
        self.list_state
            .selected
            .and_then(|row| self.view.get(row))
            .and_then(|&i| self.repos.get(i))
    }

    /// Visible repositories in display order.
    pub fn visible_repos(&self) -> impl Iterator<Item = &Repo> {
        self.view.iter().filter_map(|&i| self.repos.get(i))
    }

    /// All repositories from the last scan, ordered by path.
    #[must_use]
    pub fn repos(&self) -> &[Repo] {
        &self.repos
    }

    /// Number of visible rows.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.view.len()
    }

    /// Dirty and clean totals over all repositories.
    #[must_use]
    pub fn summary(&self) -> FleetSummary {
        FleetSummary::from_repos(&self.repos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gs_core::RepoStatus;
    use gs_scanner::ScanOptions;

    fn repo(path: &str, branch: &str, unstaged: u32) -> Repo {
        let mut status = RepoStatus::new(branch);
        status.unstaged = unstaged;
        Repo::new(path.into(), status)
    }

    fn report(repos: Vec<Repo>) -> ScanReport {
        ScanReport {
            repos,
            ..ScanReport::default()
        }
    }

    fn app() -> App {
        let config = Config::default();
        let scanner = Scanner::new(ScanOptions::new(["/nonexistent"])).unwrap();
        App::new(config, scanner)
    }

    fn loaded_app() -> App {
        let mut app = app();
        let generation = app.begin_scan();
        app.handle_scan_update(
            generation,
            ScanUpdate::Complete(report(vec![
                repo("/code/api", "main", 0),
                repo("/code/cli", "develop", 3),
                repo("/code/web", "feature/login", 1),
            ])),
        );
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn names(app: &App) -> Vec<&str> {
        app.visible_repos().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_app_mode_default() {
        assert_eq!(AppMode::default(), AppMode::Normal);
    }

    #[test]
    fn test_first_scan_requested() {
        let mut app = app();
        assert!(app.take_scan_request());
        assert!(!app.take_scan_request());
        assert_eq!(app.scan_state, ScanState::NotStarted);
    }

    #[test]
    fn test_complete_applies_default_sort() {
        let app = loaded_app();
        assert_eq!(app.scan_state, ScanState::Complete);
        assert_eq!(names(&app), ["cli", "web", "api"]);
        assert_eq!(app.selected_repo().map(|r| r.name.as_str()), Some("cli"));
        assert_eq!(app.summary().dirty, 2);
    }

    #[test]
    fn test_stale_generation_discarded() {
        let mut app = loaded_app();
        let old = app.generation();
        let new = app.begin_scan();
        assert_eq!(new, old + 1);

        app.handle_scan_update(old, ScanUpdate::Complete(report(Vec::new())));
        assert_eq!(app.repos().len(), 3);
        assert!(app.scan_state.is_scanning());

        app.handle_scan_failure(old, "late failure".to_owned());
        assert!(app.scan_state.is_scanning());

        app.handle_scan_update(new, ScanUpdate::Complete(report(vec![repo("/code/api", "main", 0)])));
        assert_eq!(app.repos().len(), 1);
        assert_eq!(app.scan_state, ScanState::Complete);
    }

    #[test]
    fn test_scan_progress() {
        let mut app = app();
        let generation = app.begin_scan();
        app.handle_scan_update(generation, ScanUpdate::CandidatesDiscovered(2));
        app.handle_scan_update(
            generation,
            ScanUpdate::RepoProbed(Box::new(repo("/code/api", "main", 0))),
        );
        app.handle_scan_update(
            generation,
            ScanUpdate::ProbeFailed {
                path: "/code/broken".into(),
                message: "git status failed".to_owned(),
            },
        );
        assert_eq!(
            app.scan_state,
            ScanState::Scanning {
                discovered: Some(2),
                finished: 2
            }
        );
    }

    #[test]
    fn test_scan_failure_is_distinct_from_empty() {
        let mut app = app();
        let generation = app.begin_scan();
        app.handle_scan_failure(generation, "no usable roots".to_owned());
        assert_eq!(app.scan_state, ScanState::Failed("no usable roots".to_owned()));
        assert!(app.status.as_ref().is_some_and(|s| s.is_error));

        let generation = app.begin_scan();
        app.handle_scan_update(generation, ScanUpdate::Complete(report(Vec::new())));
        assert_eq!(app.scan_state, ScanState::Complete);
        assert!(app.repos().is_empty());
        assert_eq!(
            app.status.as_ref().map(|s| s.text.as_str()),
            Some("no repositories found")
        );
    }

    #[test]
    fn test_unprobed_reported() {
        let mut app = app();
        let generation = app.begin_scan();
        let mut partial = report(vec![repo("/code/api", "main", 0)]);
        partial.failures.push(gs_scanner::ProbeError::Parse {
            path: "/code/broken".into(),
            reason: "bad header".to_owned(),
        });
        app.handle_scan_update(generation, ScanUpdate::Complete(partial));

        assert_eq!(app.unprobed, 1);
        let status = app.status.as_ref().unwrap();
        assert!(status.is_error);
        assert_eq!(status.text, "2 repositories, 1 could not be probed");
    }

    #[test]
    fn test_sort_keys() {
        let mut app = loaded_app();
        let action = app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(action, Action::SetSort(SortMode::Name));
        app.update(action);
        assert_eq!(names(&app), ["api", "cli", "web"]);

        let action = app.handle_key(key(KeyCode::Char('s')));
        app.update(action);
        assert_eq!(app.sort, SortMode::Branch);
        assert_eq!(names(&app), ["cli", "web", "api"]);
        assert_eq!(
            app.status.as_ref().map(|s| s.text.as_str()),
            Some("Sorted by: Branch")
        );
    }

    #[test]
    fn test_selection_follows_repo_across_sorts() {
        let mut app = loaded_app();
        app.update(Action::LastItem);
        assert_eq!(app.selected_repo().map(|r| r.name.as_str()), Some("api"));

        app.update(Action::SetSort(SortMode::Name));
        assert_eq!(app.list_state.selected, Some(0));
        assert_eq!(app.selected_repo().map(|r| r.name.as_str()), Some("api"));
    }

    #[test]
    fn test_filter_typing() {
        let mut app = loaded_app();
        let action = app.handle_key(key(KeyCode::Char('/')));
        app.update(action);
        assert_eq!(app.mode, AppMode::Filtering);

        for c in "feat".chars() {
            let action = app.handle_key(key(KeyCode::Char(c)));
            app.update(action);
        }
        // Matches the branch of "web".
        assert_eq!(names(&app), ["web"]);

        let action = app.handle_key(key(KeyCode::Enter));
        app.update(action);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.filter.text, "feat");

        let action = app.handle_key(key(KeyCode::Esc));
        assert_eq!(action, Action::ClearFilter);
        app.update(action);
        assert_eq!(app.visible_count(), 3);
    }

    #[test]
    fn test_filter_cancel_clears_text() {
        let mut app = loaded_app();
        app.update(Action::EnterFilterMode);
        app.update(Action::SetFilter("zzz".to_owned()));
        assert_eq!(app.visible_count(), 0);
        assert!(app.selected_repo().is_none());

        let action = app.handle_key(key(KeyCode::Esc));
        app.update(action);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.visible_count(), 3);
    }

    #[test]
    fn test_dirty_only_toggle() {
        let mut app = loaded_app();
        let action = app.handle_key(key(KeyCode::Char('f')));
        app.update(action);
        assert_eq!(names(&app), ["cli", "web"]);

        app.update(Action::ToggleDirtyOnly);
        assert_eq!(app.visible_count(), 3);
    }

    #[test]
    fn test_filter_matches_path_and_is_case_insensitive() {
        let filter = FilterState {
            text: "CODE/CL".to_owned(),
            dirty_only: false,
        };
        assert!(filter.matches(&repo("/code/cli", "main", 0)));
        assert!(!filter.matches(&repo("/code/api", "main", 0)));
    }

    #[test]
    fn test_navigation_keys() {
        let mut app = loaded_app();
        app.list_state.visible_height = 10;

        for (code, expected) in [
            (KeyCode::Char('j'), 1),
            (KeyCode::Down, 2),
            (KeyCode::Char('j'), 0),
            (KeyCode::Char('k'), 2),
            (KeyCode::Char('g'), 0),
            (KeyCode::Char('G'), 2),
            (KeyCode::Home, 0),
            (KeyCode::End, 2),
            (KeyCode::PageUp, 0),
            (KeyCode::PageDown, 2),
        ] {
            let action = app.handle_key(key(code));
            app.update(action);
            assert_eq!(app.list_state.selected, Some(expected), "{code:?}");
        }
    }

    #[test]
    fn test_enter_requests_editor() {
        let mut app = loaded_app();
        let action = app.handle_key(key(KeyCode::Enter));
        assert_eq!(action, Action::OpenInEditor);
        app.update(action);
        assert_eq!(app.take_editor_request(), Some(Utf8PathBuf::from("/code/cli")));
        assert!(app.take_editor_request().is_none());

        app.take_scan_request();
        app.editor_closed(Utf8Path::new("/code/cli"), Err("exit status: 1".to_owned()));
        assert!(app.take_scan_request());
        assert!(app.status.as_ref().is_some_and(|s| s.is_error));
    }

    #[test]
    fn test_enter_without_selection_does_nothing() {
        let mut app = app();
        app.update(Action::OpenInEditor);
        assert!(app.take_editor_request().is_none());
    }

    #[test]
    fn test_show_editor() {
        let mut app = loaded_app();
        let action = app.handle_key(key(KeyCode::Char('e')));
        app.update(action);
        let text = app.status.as_ref().map(|s| s.text.clone()).unwrap();
        assert!(text.starts_with("Editor: code"));
    }

    #[test]
    fn test_rescan_key() {
        let mut app = loaded_app();
        app.take_scan_request();
        let action = app.handle_key(key(KeyCode::Char('r')));
        app.update(action);
        assert!(app.take_scan_request());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = loaded_app();
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), Action::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        app.update(Action::EnterFilterMode);
        assert_eq!(app.handle_key(ctrl_c), Action::Quit);
        app.update(Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_mode() {
        let mut app = loaded_app();
        let action = app.handle_key(key(KeyCode::Char('?')));
        app.update(action);
        assert_eq!(app.mode, AppMode::Help);
        // Navigation keys do nothing while help is shown.
        assert_eq!(app.handle_key(key(KeyCode::Char('j'))), Action::None);
        let action = app.handle_key(key(KeyCode::Esc));
        app.update(action);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_list_state_empty() {
        let mut state = RepoListState::new();
        state.select_next(0);
        assert!(state.selected.is_none());
        state.page_down(0);
        assert!(state.selected.is_none());
        state.reset(3, 0);
        assert!(state.selected.is_none());
    }

    #[test]
    fn test_list_state_scrolls() {
        let mut state = RepoListState::new();
        state.visible_height = 3;
        state.select_last(10);
        assert_eq!(state.selected, Some(9));
        assert_eq!(state.scroll_offset, 7);
        state.select_first(10);
        assert_eq!(state.scroll_offset, 0);
        state.page_down(10);
        assert_eq!(state.selected, Some(3));
        assert_eq!(state.scroll_offset, 1);
    }

    #[test]
    fn test_status_message() {
        let msg = StatusMessage::info("Test message");
        assert!(!msg.is_error);
        assert!(!msg.should_hide());

        let err = StatusMessage::error("Error!");
        assert!(err.is_error);
        assert!(!err.should_hide());
    }
}
