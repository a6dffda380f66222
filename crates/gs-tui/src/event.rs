//! Event types for the dashboard event loop.
//!
//! Events come from three places:
//!
//! - **Terminal**: key presses, mouse events, window resizing
//! - **Scanner**: streaming updates from a background scan, tagged with the
//!   generation of the scan that produced them
//! - **Timer**: periodic tick and render events

use crossterm::event::{KeyEvent, MouseEvent};
use gs_scanner::ScanUpdate;

/// Events processed by the dashboard.
#[derive(Debug)]
#[non_exhaustive]
pub enum Event {
    /// A key press event from the terminal.
    Key(KeyEvent),

    /// A mouse event from the terminal.
    Mouse(MouseEvent),

    /// Terminal window was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    /// Progress from a background scan.
    Scan {
        /// Generation of the scan that sent this update.
        generation: u64,
        /// The update itself.
        update: ScanUpdate,
    },

    /// A background scan could not run at all.
    ScanFailed {
        /// Generation of the failed scan.
        generation: u64,
        /// Rendered error.
        message: String,
    },

    /// Periodic tick for expiring status messages.
    Tick,

    /// Signal to render a new frame.
    Render,

    /// Focus gained by the terminal window.
    FocusGained,

    /// Focus lost by the terminal window.
    FocusLost,
}

impl Event {
    /// Returns `true` if this is a key event.
    #[inline]
    #[must_use]
    pub const fn is_key(&self) -> bool {
        matches!(self, Self::Key(_))
    }

    /// Returns `true` if this event came from a background scan.
    #[inline]
    #[must_use]
    pub const fn is_scan(&self) -> bool {
        matches!(self, Self::Scan { .. } | Self::ScanFailed { .. })
    }

    /// Generation of the scan this event belongs to, if any.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> Option<u64> {
        match self {
            Self::Scan { generation, .. } | Self::ScanFailed { generation, .. } => Some(*generation),
            _ => None,
        }
    }

    /// Returns the key event if this is a Key variant.
    #[inline]
    #[must_use]
    pub const fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Self::Key(key) => Some(key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_event_is_key() {
        let key_event = Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        assert!(key_event.is_key());
        assert!(!Event::Tick.is_key());
    }

    #[test]
    fn test_scan_event_generation() {
        let event = Event::Scan {
            generation: 7,
            update: ScanUpdate::CandidatesDiscovered(3),
        };
        assert!(event.is_scan());
        assert_eq!(event.generation(), Some(7));

        let failed = Event::ScanFailed {
            generation: 8,
            message: "no usable roots".to_owned(),
        };
        assert!(failed.is_scan());
        assert_eq!(failed.generation(), Some(8));

        assert_eq!(Event::Render.generation(), None);
    }

    #[test]
    fn test_event_as_key() {
        let event = Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(event.as_key().map(|k| k.code), Some(KeyCode::Enter));
        assert!(Event::Tick.as_key().is_none());
    }
}
