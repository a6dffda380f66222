//! Directory pruning predicate.
//!
//! [`IgnoreMatcher`] decides whether the walker should skip a directory and
//! everything beneath it. Patterns come in three shapes:
//!
//! | Pattern          | Matches                                  |
//! |------------------|------------------------------------------|
//! | `node_modules`   | any directory named exactly that         |
//! | `*.bak`, `tmp?`  | base names matching the glob             |
//! | `Documents/Old`  | any path containing that fragment        |
//!
//! Matching is case-sensitive. An empty pattern list never prunes.
//!
//! # Examples
//!
//! ```
//! use gs_scanner::IgnoreMatcher;
//!
//! let matcher = IgnoreMatcher::new(["node_modules", "*.cache", "Library/Caches"])?;
//!
//! assert!(matcher.should_prune("node_modules"));
//! assert!(matcher.should_prune("pip.cache"));
//! assert!(matcher.should_prune("/home/me/Library/Caches/tool"));
//! assert!(!matcher.should_prune("Node_Modules"));
//! assert!(!matcher.should_prune("/home/me/code/app"));
//! # Ok::<(), gs_scanner::ScanError>(())
//! ```

use camino::Utf8Path;
use gs_core::{FxHashSet, fx_hash_set};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use smallvec::SmallVec;

use crate::error::ScanError;

const GLOB_CHARS: &[char] = &['*', '?', '['];

/// Pure predicate over directory names and paths.
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    /// Literal directory names.
    names: FxHashSet<String>,
    /// Compiled glob patterns, matched against base names.
    globs: Option<Gitignore>,
    /// Number of glob patterns compiled into `globs`.
    glob_count: usize,
    /// Literal fragments containing `/`, matched as substrings of full paths.
    fragments: SmallVec<[String; 4]>,
}

impl IgnoreMatcher {
    /// Builds a matcher from a list of patterns.
    ///
    /// Blank patterns are ignored and a trailing `/` is stripped.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidPattern`] if a glob pattern does not
    /// compile.
    pub fn new<I, S>(patterns: I) -> Result<Self, ScanError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = fx_hash_set();
        let mut fragments = SmallVec::new();
        let mut builder = GitignoreBuilder::new("");
        builder.case_insensitive(false).map_err(|source| ScanError::InvalidPattern {
            pattern: String::new(),
            source,
        })?;
        let mut glob_count = 0usize;

        for raw in patterns {
            let pattern = raw.as_ref().trim();
            let pattern = pattern.strip_suffix('/').unwrap_or(pattern);
            if pattern.is_empty() {
                continue;
            }

            if pattern.contains(GLOB_CHARS) {
                builder
                    .add_line(None, pattern)
                    .map_err(|source| ScanError::InvalidPattern {
                        pattern: pattern.to_owned(),
                        source,
                    })?;
                glob_count += 1;
            } else if pattern.contains('/') {
                fragments.push(pattern.to_owned());
            } else {
                names.insert(pattern.to_owned());
            }
        }

        let globs = if glob_count > 0 {
            Some(builder.build().map_err(|source| ScanError::InvalidPattern {
                pattern: String::new(),
                source,
            })?)
        } else {
            None
        };

        Ok(Self {
            names,
            globs,
            glob_count,
            fragments,
        })
    }

    /// A matcher that never prunes.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` if the directory named (or located at) `name_or_path`
    /// must be skipped along with its subtree.
    ///
    /// A bare name is checked against literal names and globs. Input
    /// containing `/` is additionally checked against path fragments, and its
    /// last segment is used as the name.
    #[must_use]
    pub fn should_prune(&self, name_or_path: &str) -> bool {
        let trimmed = name_or_path.trim_end_matches('/');
        let name = trimmed.rsplit('/').next().unwrap_or(trimmed);

        if !name.is_empty() && self.matches_name(name) {
            return true;
        }

        trimmed.contains('/') && self.fragments.iter().any(|f| trimmed.contains(f.as_str()))
    }

    /// [`should_prune`](Self::should_prune) for a directory path.
    #[must_use]
    pub fn should_prune_dir(&self, path: &Utf8Path) -> bool {
        self.should_prune(path.as_str())
    }

    /// Number of patterns held by the matcher.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len() + self.fragments.len() + self.glob_count
    }

    /// Returns `true` if the matcher never prunes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn matches_name(&self, name: &str) -> bool {
        if self.names.contains(name) {
            return true;
        }
        self.globs
            .as_ref()
            .is_some_and(|globs| globs.matched(name, true).is_ignore())
    }
}
