//! UI components for the dashboard.
//!
//! # Component Types
//!
//! - **Widgets** (`Widget` trait): stateless rendering - `HeaderBar`, `StatsPanel`, `StatusBar`
//! - **Stateful Widgets** (`StatefulWidget` trait): selection/scroll state - `RepoTable`
//! - **Overlays**: modal overlays - `HelpPanel`, `FilterInput`

mod filter_input;
mod header;
mod help;
mod repo_table;
mod stats_panel;
mod status_bar;

pub use filter_input::FilterInput;
pub use header::HeaderBar;
pub use help::HelpPanel;
pub use repo_table::RepoTable;
pub use stats_panel::StatsPanel;
pub use status_bar::StatusBar;
