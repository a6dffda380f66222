//! Domain types for discovered repositories.
//!
//! - [`Repo`] - A discovered repository, keyed by its canonical path
//! - [`RepoStatus`] - Working-tree state of one repository
//! - [`FleetSummary`] - Dirty/clean totals over a set of repositories

mod repo;
mod status;
mod summary;

pub use repo::Repo;
pub use status::RepoStatus;
pub use summary::FleetSummary;
