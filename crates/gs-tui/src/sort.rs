//! Row ordering for the repository table.
//!
//! Sorting is presentation only: the scanner always returns repositories
//! ordered by path, and the table reorders a list of indices into that slice.

use std::cmp::Ordering;

use gs_core::Repo;

/// How the repository table is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Dirty repositories first, then by name.
    #[default]
    DirtyFirst,
    /// By name.
    Name,
    /// By branch, then by name.
    Branch,
    /// Newest commit first; repositories without commits last.
    Recent,
}

impl SortMode {
    /// All modes in cycle order.
    pub const ALL: [Self; 4] = [Self::DirtyFirst, Self::Name, Self::Branch, Self::Recent];

    /// The mode after this one, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::DirtyFirst => Self::Name,
            Self::Name => Self::Branch,
            Self::Branch => Self::Recent,
            Self::Recent => Self::DirtyFirst,
        }
    }

    /// Selects a mode by its `1`-`4` shortcut.
    #[must_use]
    pub const fn from_shortcut(key: char) -> Option<Self> {
        match key {
            '1' => Some(Self::DirtyFirst),
            '2' => Some(Self::Name),
            '3' => Some(Self::Branch),
            '4' => Some(Self::Recent),
            _ => None,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DirtyFirst => "Dirty First",
            Self::Name => "Name",
            Self::Branch => "Branch",
            Self::Recent => "Recent",
        }
    }

    /// Compares two repositories under this mode.
    ///
    /// Ties fall back to name and then path, so the order is total.
    #[must_use]
    pub fn compare(self, a: &Repo, b: &Repo) -> Ordering {
        let primary = match self {
            Self::DirtyFirst => b.is_dirty().cmp(&a.is_dirty()),
            Self::Name => Ordering::Equal,
            Self::Branch => a.status.branch.cmp(&b.status.branch),
            Self::Recent => match (a.status.last_commit, b.status.last_commit) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        };
        primary
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.path.cmp(&b.path))
    }

    /// Sorts `indices` into `repos` under this mode.
    pub fn sort_indices(self, repos: &[Repo], indices: &mut [usize]) {
        indices.sort_by(|&a, &b| self.compare(&repos[a], &repos[b]));
    }
}
