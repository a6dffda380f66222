//! User actions for the dashboard.
//!
//! ```text
//! Key Event → App::handle_key → Action → App::update
//! ```

use crate::sort::SortMode;

/// User-initiated actions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Action {
    // =========================================================================
    // Navigation
    // =========================================================================
    /// Move selection to the next row.
    NextItem,

    /// Move selection to the previous row.
    PreviousItem,

    /// Move selection to the first row.
    FirstItem,

    /// Move selection to the last row.
    LastItem,

    /// Move selection down by one page.
    PageDown,

    /// Move selection up by one page.
    PageUp,

    // =========================================================================
    // Filtering and Sorting
    // =========================================================================
    /// Enter filter mode (start typing filter).
    EnterFilterMode,

    /// Leave filter mode, keeping the current text.
    ConfirmFilter,

    /// Leave filter mode and clear the text.
    CancelFilter,

    /// Update the filter text.
    SetFilter(String),

    /// Clear every filter.
    ClearFilter,

    /// Show only dirty repositories, or all of them again.
    ToggleDirtyOnly,

    /// Switch to the next sort mode.
    CycleSort,

    /// Switch to a specific sort mode.
    SetSort(SortMode),

    // =========================================================================
    // Repository Operations
    // =========================================================================
    /// Start a new background scan.
    Rescan,

    /// Open the selected repository in the configured editor.
    OpenInEditor,

    /// Show which editor is configured.
    ShowEditor,

    // =========================================================================
    // UI State
    // =========================================================================
    /// Toggle the help panel.
    ToggleHelp,

    /// Hide the help panel.
    HideHelp,

    /// Show a status message.
    ShowStatus(String),

    /// Clear the status message.
    ClearStatus,

    // =========================================================================
    // Application Control
    // =========================================================================
    /// Quit the application.
    Quit,

    /// Render the UI.
    Render,

    /// Tick (periodic update).
    Tick,

    /// No operation.
    #[default]
    None,
}

impl Action {
    /// Returns `true` if this action requires a re-render.
    #[must_use]
    pub const fn needs_render(&self) -> bool {
        !matches!(self, Self::None | Self::Tick)
    }

    /// Returns `true` if this is a navigation action.
    #[must_use]
    pub const fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::NextItem
                | Self::PreviousItem
                | Self::FirstItem
                | Self::LastItem
                | Self::PageDown
                | Self::PageUp
        )
    }

    /// Returns `true` if this action changes which rows are shown or their
    /// order.
    #[must_use]
    pub const fn changes_view(&self) -> bool {
        matches!(
            self,
            Self::SetFilter(_)
                | Self::CancelFilter
                | Self::ClearFilter
                | Self::ToggleDirtyOnly
                | Self::CycleSort
                | Self::SetSort(_)
        )
    }
}
