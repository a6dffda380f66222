//! Theme and styling for the dashboard.
//!
//! ```
//! use gs_tui::Theme;
//!
//! let theme = Theme::dark();
//! let style = theme.indicator_style(true);
//! ```

use gs_core::ColorScheme;
use ratatui::style::{Color, Modifier, Style};

/// Colors and styles used throughout the interface.
///
/// Use [`Theme::dark()`] or [`Theme::light()`] for the predefined themes, or
/// [`Theme::from_scheme()`] to pick one from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    // =========================================================================
    // Repository State
    // =========================================================================
    /// Indicator color for repositories with changes.
    pub dirty_fg: Color,

    /// Indicator color for clean repositories.
    pub clean_fg: Color,

    /// Staged count color.
    pub staged_fg: Color,

    /// Modified count color.
    pub unstaged_fg: Color,

    /// Untracked count color.
    pub untracked_fg: Color,

    // =========================================================================
    // Base Colors
    // =========================================================================
    /// Primary foreground color.
    pub fg: Color,

    /// Dimmed/secondary text color.
    pub dimmed_fg: Color,

    /// Accent color for titles and highlights.
    pub accent: Color,

    /// Error color.
    pub error_fg: Color,

    // =========================================================================
    // Component Styles
    // =========================================================================
    /// Style for borders.
    pub border_style: Style,

    /// Style for the border of an active overlay.
    pub focused_border_style: Style,

    /// Style for the selected table row.
    pub highlight_style: Style,

    /// Style for titles and the table header.
    pub header_style: Style,

    /// Style for the status bar.
    pub status_bar_style: Style,

    /// Background of overlays.
    pub overlay_bg: Color,
}

impl Theme {
    /// Creates a dark theme (light text on dark background).
    #[must_use]
    pub fn dark() -> Self {
        let purple = Color::Rgb(124, 58, 237);
        Self {
            dirty_fg: Color::Rgb(245, 158, 11), // Amber
            clean_fg: Color::Rgb(16, 185, 129), // Green
            staged_fg: Color::Rgb(16, 185, 129),
            unstaged_fg: Color::Rgb(245, 158, 11),
            untracked_fg: Color::Rgb(156, 163, 175),

            fg: Color::Rgb(249, 250, 251),
            dimmed_fg: Color::Rgb(156, 163, 175),
            accent: purple,
            error_fg: Color::Rgb(239, 68, 68),

            border_style: Style::default().fg(Color::Rgb(55, 65, 81)),
            focused_border_style: Style::default().fg(purple),
            highlight_style: Style::default()
                .fg(Color::White)
                .bg(purple)
                .add_modifier(Modifier::BOLD),
            header_style: Style::default()
                .fg(Color::Rgb(249, 250, 251))
                .bg(Color::Rgb(55, 65, 81))
                .add_modifier(Modifier::BOLD),
            status_bar_style: Style::default()
                .fg(Color::Rgb(209, 213, 219))
                .bg(Color::Rgb(31, 41, 55)),
            overlay_bg: Color::Rgb(31, 41, 55),
        }
    }

    /// Creates a light theme (dark text on light background).
    #[must_use]
    pub fn light() -> Self {
        let purple = Color::Rgb(91, 33, 182);
        Self {
            dirty_fg: Color::Rgb(180, 83, 9),
            clean_fg: Color::Rgb(4, 120, 87),
            staged_fg: Color::Rgb(4, 120, 87),
            unstaged_fg: Color::Rgb(180, 83, 9),
            untracked_fg: Color::Rgb(75, 85, 99),

            fg: Color::Rgb(17, 24, 39),
            dimmed_fg: Color::Rgb(107, 114, 128),
            accent: purple,
            error_fg: Color::Rgb(185, 28, 28),

            border_style: Style::default().fg(Color::Rgb(209, 213, 219)),
            focused_border_style: Style::default().fg(purple),
            highlight_style: Style::default()
                .fg(Color::White)
                .bg(purple)
                .add_modifier(Modifier::BOLD),
            header_style: Style::default()
                .fg(Color::Rgb(17, 24, 39))
                .bg(Color::Rgb(229, 231, 235))
                .add_modifier(Modifier::BOLD),
            status_bar_style: Style::default()
                .fg(Color::Rgb(55, 65, 81))
                .bg(Color::Rgb(229, 231, 235)),
            overlay_bg: Color::Rgb(243, 244, 246),
        }
    }

    /// Creates a theme from a [`ColorScheme`] configuration.
    ///
    /// [`ColorScheme::Auto`] uses the dark theme.
    #[must_use]
    pub fn from_scheme(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style of the `●`/`○` indicator.
    #[must_use]
    pub fn indicator_style(&self, dirty: bool) -> Style {
        Style::default().fg(if dirty { self.dirty_fg } else { self.clean_fg })
    }

    /// Returns a style with the base foreground color.
    #[must_use]
    pub fn base_style(&self) -> Style {
        Style::default().fg(self.fg)
    }

    /// Returns a style for dimmed/secondary text.
    #[must_use]
    pub fn dimmed_style(&self) -> Style {
        Style::default().fg(self.dimmed_fg)
    }

    /// Returns a style for accent text.
    #[must_use]
    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Returns a style for error text.
    #[must_use]
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error_fg)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
