//! Interactive repository dashboard built on Ratatui.
//!
//! The dashboard shows every repository found under the configured roots in
//! a sortable, filterable table. Scans run in the background and stream
//! their progress into the same event loop that handles the keyboard, so the
//! interface stays responsive while a large tree is being walked.
//!
//! # Architecture
//!
//! ```text
//! crates/gs-tui/src/
//!   lib.rs            # run() and the event loop
//!   app.rs            # Application state: repos, view, selection, scan generation
//!   event.rs          # Event types (Key, Scan, ScanFailed, Tick, Render)
//!   action.rs         # User actions produced by key bindings
//!   tui.rs            # Terminal wrapper with async event streaming
//!   editor.rs         # Open-in-editor subprocess
//!   sort.rs           # Presentation sort modes
//!   format.rs         # Cell formatting (counts, dates, truncation)
//!   ui.rs             # Layout
//!   theme.rs          # Colors
//!   error.rs          # TuiError
//!   components/       # Header, stats, table, status bar, help, filter input
//! ```
//!
//! # Rescans
//!
//! Every scan is tagged with a generation number. Starting a new scan drops
//! the channel of the previous one, which stops it, and any update still in
//! flight from an older generation is discarded by [`App`].
//!
//! # Usage
//!
//! ```ignore
//! use gs_core::Config;
//! use gs_scanner::{ScanOptions, Scanner};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gs_tui::TuiError> {
//!     let config = Config::default();
//!     let scanner = Scanner::new(ScanOptions::from_config(&config))?;
//!     gs_tui::run(config, scanner).await
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod action;
pub mod app;
pub mod components;
pub mod editor;
pub mod error;
pub mod event;
pub mod format;
pub mod sort;
pub mod theme;
pub mod tui;
pub mod ui;

use std::time::Duration;

use crossterm::event::MouseEventKind;
use gs_core::Config;
use gs_scanner::Scanner;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

pub use action::Action;
pub use app::{App, AppMode, FilterState, RepoListState, ScanState, StatusMessage};
pub use error::TuiError;
pub use event::Event;
pub use sort::SortMode;
pub use theme::Theme;
pub use tui::Tui;

/// Capacity of the channel between a scan and its forwarding task.
const SCAN_CHANNEL_CAPACITY: usize = 64;

/// Runs the dashboard until the user quits.
///
/// The first scan starts immediately. The terminal is restored before this
/// returns, including on error.
///
/// # Errors
///
/// Returns an error if the terminal cannot be initialized or restored.
/// Scan and editor failures are shown in the interface instead.
pub async fn run(config: Config, scanner: Scanner) -> Result<(), TuiError> {
    let tick_rate = Duration::from_millis(config.tui.tick_rate_ms);
    let mut tui = Tui::new(tick_rate)?.with_frame_rate(config.tui.frame_rate);
    let theme = Theme::from_scheme(config.tui.color_scheme);
    let mut app = App::new(config, scanner);

    tui.enter()?;
    info!("Entering main event loop");
    let result = run_event_loop(&mut tui, &mut app, &theme).await;
    tui.exit()?;

    result
}

async fn run_event_loop(tui: &mut Tui, app: &mut App, theme: &Theme) -> Result<(), TuiError> {
    let mut scan_task: Option<JoinHandle<()>> = None;

    let result = loop {
        if app.take_scan_request() {
            if let Some(previous) = scan_task.take() {
                previous.abort();
            }
            let generation = app.begin_scan();
            scan_task = Some(spawn_scan(app.scanner.clone(), generation, tui.event_sender()));
        }

        if let Err(e) = tui.draw(|frame| ui::render(app, frame, theme)) {
            break Err(e);
        }

        let Some(event) = tui.next_event().await else {
            break Err(TuiError::ChannelClosed);
        };

        let action = match event {
            Event::Key(key) => app.handle_key(key),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => Action::NextItem,
                MouseEventKind::ScrollUp => Action::PreviousItem,
                _ => Action::None,
            },
            Event::Scan { generation, update } => {
                app.handle_scan_update(generation, update);
                Action::Render
            }
            Event::ScanFailed {
                generation,
                message,
            } => {
                app.handle_scan_failure(generation, message);
                Action::Render
            }
            Event::Tick => {
                app.tick();
                Action::None
            }
            Event::Resize { .. } | Event::Render => Action::Render,
            Event::FocusGained | Event::FocusLost => Action::None,
        };
        app.update(action);

        if let Some(path) = app.take_editor_request() {
            match editor::run_editor(&app.config.editor, &path, tui) {
                Ok(()) => app.editor_closed(&path, Ok(())),
                Err(e) if e.is_recoverable() => app.editor_closed(&path, Err(e.to_string())),
                Err(e) => break Err(e),
            }
        }

        if app.should_quit {
            info!("Quit requested");
            break Ok(());
        }
    };

    if let Some(task) = scan_task {
        task.abort();
    }
    result
}

/// Runs a scan on the blocking pool and forwards its updates as events.
///
/// Aborting the returned task drops the update channel, which stops the
/// scan at its next send.
fn spawn_scan(scanner: Scanner, generation: u64, events: mpsc::Sender<Event>) -> JoinHandle<()> {
    let (tx, mut rx) = mpsc::channel(SCAN_CHANNEL_CAPACITY);
    let worker = tokio::task::spawn_blocking(move || scanner.scan_streaming(tx));

    tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            if events.send(Event::Scan { generation, update }).await.is_err() {
                debug!(generation, "Event channel closed; dropping scan");
                return;
            }
        }

        let message = match worker.await {
            Ok(Ok(())) => return,
            Ok(Err(e)) => e.to_string(),
            Err(e) => {
                error!(generation, error = %e, "Scan task failed");
                format!("scan task failed: {e}")
            }
        };
        if events
            .send(Event::ScanFailed {
                generation,
                message,
            })
            .await
            .is_err()
        {
            debug!(generation, "Event channel closed before scan failure was reported");
        }
    })
}
