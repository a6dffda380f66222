//! Repository discovery under one root directory.
//!
//! [`RootWalker`] is a lazy iterator over candidate repository directories.
//! It walks depth-first with an explicit stack (no recursion), so deep or
//! pathological trees cannot exhaust the call stack.
//!
//! At each directory:
//!
//! 1. Directories already claimed in the [`VisitedSet`] are skipped. Every
//!    path on the stack is canonical, so a symlink back into a visited tree
//!    (or an overlapping root walked concurrently) is seen only once.
//! 2. A directory with a `.git` entry (directory, worktree file, or
//!    submodule pointer) is yielded and not descended into.
//! 3. Otherwise subdirectories not pruned by the [`IgnoreMatcher`] are
//!    pushed. Symlinks are resolved to their target first.
//!
//! Unreadable directories do not stop the walk. They are recorded as
//! [`ScanWarning`]s, available through [`RootWalker::take_warnings`].
//!
//! # Examples
//!
//! ```ignore
//! use std::sync::Arc;
//! use gs_scanner::{IgnoreMatcher, RootWalker};
//! use camino::Utf8Path;
//!
//! let matcher = Arc::new(IgnoreMatcher::new(["node_modules"])?);
//! let mut walker = RootWalker::new(Utf8Path::new("/home/me/code"), matcher)?;
//!
//! for repo in walker.by_ref() {
//!     println!("found {repo}");
//! }
//! for warning in walker.take_warnings() {
//!     eprintln!("{warning}");
//! }
//! ```

use std::fs;
use std::io;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use gs_core::{FxHashSet, fx_hash_set};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::ScanWarning;
use crate::matcher::IgnoreMatcher;
use crate::stats::ScanStats;

/// Name of the entry that marks a repository root.
pub const REPO_MARKER: &str = ".git";

/// Canonical directories claimed by walkers during one scan.
///
/// Shared between concurrent walkers so each directory is read at most once,
/// even when roots overlap.
#[derive(Debug, Default)]
pub struct VisitedSet {
    inner: Mutex<FxHashSet<Utf8PathBuf>>,
}

impl VisitedSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(fx_hash_set()),
        }
    }

    /// Marks `path` as visited. Returns `false` if it was already claimed.
    pub fn claim(&self, path: &Utf8Path) -> bool {
        let mut inner = self.inner.lock();
        if inner.contains(path) {
            return false;
        }
        inner.insert(path.to_owned())
    }

    /// Returns `true` if `path` has been claimed.
    #[must_use]
    pub fn contains(&self, path: &Utf8Path) -> bool {
        self.inner.lock().contains(path)
    }

    /// Number of claimed directories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if nothing has been claimed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Checks that `root` is an existing directory and returns its canonical
/// path.
///
/// # Errors
///
/// Returns the [`ScanWarning`] describing why the root is unusable.
pub fn resolve_root(root: &Utf8Path) -> Result<Utf8PathBuf, ScanWarning> {
    let meta = match fs::metadata(root) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ScanWarning::RootMissing {
                path: root.to_owned(),
            });
        }
        Err(e) => return Err(unreadable(root, &e)),
    };
    if !meta.is_dir() {
        return Err(ScanWarning::RootNotDirectory {
            path: root.to_owned(),
        });
    }
    root.canonicalize_utf8().map_err(|e| unreadable(root, &e))
}

/// Returns `true` if `dir` contains a repository marker.
#[must_use]
pub fn has_repo_marker(dir: &Utf8Path) -> bool {
    fs::symlink_metadata(dir.join(REPO_MARKER)).is_ok()
}

fn unreadable(path: &Utf8Path, error: &io::Error) -> ScanWarning {
    ScanWarning::Unreadable {
        path: path.to_owned(),
        reason: error.to_string(),
    }
}

/// Lazy depth-first search for repositories under one root.
#[derive(Debug)]
pub struct RootWalker {
    root: Utf8PathBuf,
    matcher: Arc<IgnoreMatcher>,
    visited: Arc<VisitedSet>,
    stats: Arc<ScanStats>,
    follow_symlinks: bool,
    stack: Vec<Utf8PathBuf>,
    warnings: Vec<ScanWarning>,
}

impl RootWalker {
    /// Creates a walker for `root`.
    ///
    /// The root is resolved to its canonical path. It is never pruned by the
    /// matcher, only its descendants are.
    ///
    /// # Errors
    ///
    /// Returns a root-level [`ScanWarning`] if `root` is missing, not a
    /// directory, or cannot be resolved.
    pub fn new(root: &Utf8Path, matcher: Arc<IgnoreMatcher>) -> Result<Self, ScanWarning> {
        let root = resolve_root(root)?;
        Ok(Self::from_canonical(root, matcher))
    }

    /// Creates a walker for an already-canonical root.
    pub(crate) fn from_canonical(root: Utf8PathBuf, matcher: Arc<IgnoreMatcher>) -> Self {
        Self {
            stack: vec![root.clone()],
            root,
            matcher,
            visited: Arc::new(VisitedSet::new()),
            stats: Arc::new(ScanStats::new()),
            follow_symlinks: true,
            warnings: Vec::new(),
        }
    }

    /// Shares a visited set with other walkers of the same scan.
    #[must_use]
    pub fn with_visited(mut self, visited: Arc<VisitedSet>) -> Self {
        self.visited = visited;
        self
    }

    /// Reports progress into shared scan statistics.
    #[must_use]
    pub fn with_stats(mut self, stats: Arc<ScanStats>) -> Self {
        self.stats = stats;
        self
    }

    /// Configures whether symlinked directories are followed.
    ///
    /// Symlinks are followed by default.
    #[must_use]
    pub const fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// The canonical root being walked.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Warnings recorded so far.
    #[must_use]
    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    /// Removes and returns the warnings recorded so far.
    pub fn take_warnings(&mut self) -> Vec<ScanWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Pushes the subdirectories of `dir` that survive pruning.
    fn push_children(&mut self, dir: &Utf8Path) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(%dir, error = %e, "Skipping unreadable directory");
                self.warnings.push(unreadable(dir, &e));
                return;
            }
        };

        let mut children = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.warnings.push(unreadable(dir, &e));
                    continue;
                }
            };
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if !file_type.is_dir() && !file_type.is_symlink() {
                continue;
            }

            let path = match Utf8PathBuf::from_path_buf(entry.path()) {
                Ok(path) => path,
                Err(raw) => {
                    self.warnings.push(ScanWarning::NonUtf8Path {
                        path: raw.to_string_lossy().into_owned(),
                    });
                    continue;
                }
            };

            if self.matcher.should_prune_dir(&path) {
                trace!(%path, "Pruned");
                self.stats.increment_pruned();
                continue;
            }

            if file_type.is_dir() {
                children.push(path);
            } else if self.follow_symlinks {
                if let Some(target) = self.resolve_link(&path) {
                    children.push(target);
                }
            }
        }

        children.sort_unstable();
        children.dedup();
        // Reversed so the smallest path is popped first.
        self.stack.extend(children.into_iter().rev());
    }

    /// Resolves a symlink to a canonical directory, or `None` if it should
    /// not be followed.
    fn resolve_link(&mut self, link: &Utf8Path) -> Option<Utf8PathBuf> {
        match link.canonicalize_utf8() {
            Ok(target) if target.is_dir() => {
                if self.matcher.should_prune_dir(&target) {
                    self.stats.increment_pruned();
                    return None;
                }
                trace!(%link, %target, "Following symlink");
                Some(target)
            }
            Ok(_) => None,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.warnings.push(ScanWarning::BrokenSymlink {
                    path: link.to_owned(),
                });
                None
            }
            Err(e) => {
                self.warnings.push(unreadable(link, &e));
                None
            }
        }
    }
}

impl Iterator for RootWalker {
    type Item = Utf8PathBuf;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(dir) = self.stack.pop() {
            if !self.visited.claim(&dir) {
                trace!(%dir, "Already visited");
                continue;
            }
            self.stats.increment_visited();

            if has_repo_marker(&dir) {
                self.stats.increment_candidates();
                return Some(dir);
            }

            self.push_children(&dir);
        }
        None
    }
}
