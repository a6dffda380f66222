//! A discovered repository.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use super::RepoStatus;

/// A repository found during a scan.
///
/// `path` is the canonical (symlink-resolved) directory containing the `.git`
/// marker and is the repository's identity within a scan. `name` is derived
/// from the last path segment.
///
/// # Examples
///
/// ```
/// use gs_core::{Repo, RepoStatus};
/// use camino::Utf8PathBuf;
///
/// let repo = Repo::new(Utf8PathBuf::from("/home/me/code/api"), RepoStatus::new("main"));
/// assert_eq!(repo.name, "api");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Repo {
    /// Canonical path of the repository's working directory.
    pub path: Utf8PathBuf,

    /// Display name (final path segment).
    pub name: String,

    /// Working-tree status at probe time.
    pub status: RepoStatus,
}

impl Repo {
    /// Creates a repository record, deriving its name from `path`.
    #[must_use]
    pub fn new(path: Utf8PathBuf, status: RepoStatus) -> Self {
        let name = name_for(&path);
        Self { path, name, status }
    }

    /// Shorthand for `self.status.is_dirty()`.
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.status.is_dirty()
    }
}

/// Last path segment, or the whole path for a filesystem root.
fn name_for(path: &Utf8Path) -> String {
    path.file_name().unwrap_or(path.as_str()).to_owned()
}
