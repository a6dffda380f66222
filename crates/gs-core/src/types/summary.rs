//! Aggregate counts over a set of repositories.

use serde::Serialize;

use super::Repo;

/// Dirty and clean totals for a list of repositories.
///
/// # Examples
///
/// ```
/// use gs_core::{FleetSummary, Repo, RepoStatus};
///
/// let mut dirty = RepoStatus::new("main");
/// dirty.unstaged = 1;
/// let repos = vec![
///     Repo::new("/r/a".into(), RepoStatus::new("main")),
///     Repo::new("/r/b".into(), dirty),
/// ];
///
/// let summary = FleetSummary::from_repos(&repos);
/// assert_eq!((summary.total, summary.dirty, summary.clean), (2, 1, 1));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FleetSummary {
    /// Number of repositories.
    pub total: usize,
    /// Repositories with at least one change.
    pub dirty: usize,
    /// Repositories with no changes.
    pub clean: usize,
}

impl FleetSummary {
    /// Counts dirty and clean repositories.
    #[must_use]
    pub fn from_repos(repos: &[Repo]) -> Self {
        let dirty = repos.iter().filter(|r| r.is_dirty()).count();
        Self {
            total: repos.len(),
            dirty,
            clean: repos.len() - dirty,
        }
    }

    /// Returns `true` if no repositories were counted.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RepoStatus;

    #[test]
    fn test_empty_summary() {
        let summary = FleetSummary::from_repos(&[]);
        assert!(summary.is_empty());
        assert_eq!(summary, FleetSummary::default());
    }

    #[test]
    fn test_counts_add_up() {
        let mut staged = RepoStatus::new("main");
        staged.staged = 4;
        let repos = vec![
            Repo::new("/r/a".into(), RepoStatus::new("main")),
            Repo::new("/r/b".into(), staged),
            Repo::new("/r/c".into(), RepoStatus::new("dev")),
        ];

        let summary = FleetSummary::from_repos(&repos);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.dirty, 1);
        assert_eq!(summary.clean, 2);
    }
}
