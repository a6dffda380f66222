//! Working-tree status of a single repository.

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Branch, change counts, and last commit time of one repository.
///
/// The dirty flag is not stored: [`is_dirty`](Self::is_dirty) is derived from
/// the three counts every time it is asked for, and the serialized form
/// carries it as a computed `isDirty` field.
///
/// # Examples
///
/// ```
/// use gs_core::RepoStatus;
///
/// let mut status = RepoStatus::new("main");
/// assert!(!status.is_dirty());
///
/// status.untracked = 3;
/// assert!(status.is_dirty());
/// assert!(!status.has_commits());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoStatus {
    /// Current branch name, or a `detached@<sha>` label when HEAD is detached.
    pub branch: String,

    /// Paths whose index entry differs from HEAD.
    pub staged: u32,

    /// Paths whose working-tree content differs from the index.
    pub unstaged: u32,

    /// Paths not tracked by the repository (and not ignored).
    pub untracked: u32,

    /// Committer time of the commit at HEAD.
    ///
    /// `None` means the repository has no commits yet.
    pub last_commit: Option<DateTime<Utc>>,
}

impl RepoStatus {
    /// Creates a clean status on `branch` with no commit time.
    #[must_use]
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            ..Self::default()
        }
    }

    /// Returns `true` if any path is staged, unstaged, or untracked.
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.total_changes() > 0
    }

    /// Sum of the three change counts.
    #[inline]
    #[must_use]
    pub fn total_changes(&self) -> u64 {
        u64::from(self.staged) + u64::from(self.unstaged) + u64::from(self.untracked)
    }

    /// Returns `true` if HEAD points at a commit.
    #[inline]
    #[must_use]
    pub const fn has_commits(&self) -> bool {
        self.last_commit.is_some()
    }
}

impl Serialize for RepoStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RepoStatus", 6)?;
        state.serialize_field("branch", &self.branch)?;
        state.serialize_field("staged", &self.staged)?;
        state.serialize_field("unstaged", &self.unstaged)?;
        state.serialize_field("untracked", &self.untracked)?;
        state.serialize_field("isDirty", &self.is_dirty())?;
        state.serialize_field("lastCommit", &self.last_commit)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_is_clean() {
        let status = RepoStatus::new("main");
        assert_eq!(status.branch, "main");
        assert_eq!(status.total_changes(), 0);
        assert!(!status.is_dirty());
        assert!(!status.has_commits());
    }

    #[test]
    fn test_dirty_follows_each_count() {
        for (staged, unstaged, untracked) in [(1, 0, 0), (0, 1, 0), (0, 0, 1)] {
            let status = RepoStatus {
                staged,
                unstaged,
                untracked,
                ..RepoStatus::new("main")
            };
            assert!(status.is_dirty());
        }
    }

    #[test]
    fn test_total_changes_does_not_overflow() {
        let status = RepoStatus {
            staged: u32::MAX,
            unstaged: u32::MAX,
            untracked: u32::MAX,
            ..RepoStatus::default()
        };
        assert_eq!(status.total_changes(), 3 * u64::from(u32::MAX));
    }

    #[test]
    fn test_serialize_includes_computed_dirty_flag() {
        let status = RepoStatus {
            staged: 2,
            unstaged: 1,
            untracked: 3,
            last_commit: Utc.timestamp_opt(1_704_207_845, 0).single(),
            ..RepoStatus::new("main")
        };
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["isDirty"], serde_json::json!(true));
        assert_eq!(value["lastCommit"], serde_json::json!("2024-01-02T15:04:05Z"));
    }

    #[test]
    fn test_no_commits_serializes_as_null() {
        let value = serde_json::to_value(RepoStatus::new("main")).unwrap();
        assert!(value["lastCommit"].is_null());
        assert_eq!(value["isDirty"], serde_json::json!(false));
    }

    #[test]
    fn test_deserialize_ignores_dirty_flag() {
        let json = r#"{"branch":"dev","staged":0,"unstaged":0,"untracked":0,"isDirty":true,"lastCommit":null}"#;
        let status: RepoStatus = serde_json::from_str(json).unwrap();
        assert!(!status.is_dirty());
        assert_eq!(status.branch, "dev");
    }
}
