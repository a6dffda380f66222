//! Terminal wrapper with async event streaming.
//!
//! [`Tui`] owns the Ratatui terminal and a background task that merges
//! crossterm input with tick and render timers into one [`Event`] channel.
//! Scan results are injected into the same channel through
//! [`Tui::event_sender`].
//!
//! ```text
//!  crossterm EventStream ─┐
//!  tick interval ─────────┼──► mpsc::Sender<Event> ──► Tui::next_event()
//!  render interval ───────┘          ▲
//!                                    │
//!  scan forwarder ───────────────────┘
//! ```
//!
//! The terminal can be left and re-entered (for example around an external
//! editor). Each [`Tui::enter`] starts a fresh input task.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::ExecutableCommand;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    EventStream, KeyEventKind,
};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures_util::StreamExt;
use ratatui::Terminal;
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

use crate::error::TuiError;
use crate::event::Event;

/// Default channel capacity for events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Terminal wrapper with async event streaming.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,

    event_rx: mpsc::Receiver<Event>,

    /// Kept so the channel stays open between enter/exit cycles.
    event_tx: mpsc::Sender<Event>,

    task: Option<JoinHandle<()>>,

    /// Cancels the current input task. Replaced on every enter.
    cancellation_token: CancellationToken,

    tick_rate: Duration,

    frame_rate: u32,

    /// Whether the terminal is currently in raw mode.
    active: bool,
}

impl Tui {
    /// Creates a new TUI that emits a tick every `tick_rate`.
    ///
    /// The terminal is not entered yet; call [`enter()`](Self::enter).
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn new(tick_rate: Duration) -> Result<Self, TuiError> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        debug!(tick_rate_ms = tick_rate.as_millis(), "Created TUI");

        Ok(Self {
            terminal,
            event_rx,
            event_tx,
            task: None,
            cancellation_token: CancellationToken::new(),
            tick_rate: tick_rate.max(Duration::from_millis(10)),
            frame_rate: 30,
            active: false,
        })
    }

    /// Sets the render rate in frames per second.
    #[must_use]
    pub fn with_frame_rate(mut self, fps: u32) -> Self {
        self.frame_rate = fps.max(1);
        self
    }

    /// Returns a sender for injecting application events.
    #[must_use]
    pub fn event_sender(&self) -> mpsc::Sender<Event> {
        self.event_tx.clone()
    }

    /// Enters raw mode and the alternate screen, and starts reading input.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal mode cannot be changed.
    pub fn enter(&mut self) -> Result<(), TuiError> {
        if self.active {
            return Ok(());
        }
        debug!("Entering terminal");

        enable_raw_mode()?;
        io::stdout().execute(EnterAlternateScreen)?;
        io::stdout().execute(EnableMouseCapture)?;
        io::stdout().execute(EnableBracketedPaste)?;
        self.active = true;

        self.terminal.hide_cursor()?;
        self.terminal.clear()?;

        self.start_event_loop();
        Ok(())
    }

    /// Restores the terminal. Safe to call more than once.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal mode cannot be restored.
    pub fn exit(&mut self) -> Result<(), TuiError> {
        self.stop_event_loop();
        if !self.active {
            return Ok(());
        }
        debug!("Exiting terminal");
        self.active = false;

        self.terminal.show_cursor()?;
        io::stdout().execute(DisableBracketedPaste)?;
        io::stdout().execute(DisableMouseCapture)?;
        io::stdout().execute(LeaveAlternateScreen)?;
        disable_raw_mode()?;
        Ok(())
    }

    /// Draws a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails.
    pub fn draw<F>(&mut self, f: F) -> Result<(), TuiError>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }

    /// Waits for the next event. Returns `None` if the channel is closed.
    pub async fn next_event(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }

    fn start_event_loop(&mut self) {
        self.stop_event_loop();
        self.cancellation_token = CancellationToken::new();

        let tick_delay = self.tick_rate;
        let render_delay = Duration::from_secs(1) / self.frame_rate;
        let event_tx = self.event_tx.clone();
        let token = self.cancellation_token.clone();

        debug!(
            tick_delay_ms = tick_delay.as_millis(),
            render_delay_ms = render_delay.as_millis(),
            "Starting event loop"
        );

        let task = tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_delay);
            let mut render_interval = tokio::time::interval(render_delay);
            tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            render_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                let event = tokio::select! {
                    () = token.cancelled() => break,
                    _ = tick_interval.tick() => Some(Event::Tick),
                    _ = render_interval.tick() => Some(Event::Render),
                    event = reader.next() => match event {
                        Some(Ok(ref event)) => convert_crossterm_event(event),
                        Some(Err(e)) => {
                            warn!(error = %e, "Error reading terminal event");
                            None
                        }
                        None => break,
                    },
                };

                if let Some(event) = event {
                    trace!(?event, "Sending event");
                    if event_tx.send(event).await.is_err() {
                        break;
                    }
                }
            }

            debug!("Event loop ended");
        });

        self.task = Some(task);
    }

    fn stop_event_loop(&mut self) {
        self.cancellation_token.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(e) = self.exit() {
            error!(error = %e, "Failed to restore terminal on drop");
        }
    }
}

/// Converts a crossterm event to an application event.
///
/// Key releases and pastes are dropped.
fn convert_crossterm_event(event: &crossterm::event::Event) -> Option<Event> {
    use crossterm::event::Event as CrosstermEvent;

    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(*key)),
        CrosstermEvent::Key(_) | CrosstermEvent::Paste(_) => None,
        CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(*mouse)),
        CrosstermEvent::Resize(width, height) => Some(Event::Resize {
            width: *width,
            height: *height,
        }),
        CrosstermEvent::FocusGained => Some(Event::FocusGained),
        CrosstermEvent::FocusLost => Some(Event::FocusLost),
    }
}
