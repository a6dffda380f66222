//! Parsing of `git status --porcelain=v1 --branch` output.
//!
//! Kept free of process handling so it can be tested against canned output.
//!
//! Each entry line starts with two status characters `XY`: `X` is the index
//! relative to HEAD, `Y` is the working tree relative to the index.
//!
//! | `XY`            | counted as                    |
//! |-----------------|-------------------------------|
//! | `??`            | untracked                     |
//! | `!!`            | ignored, not counted          |
//! | `DD AU UD UA DU AA UU` | unmerged, unstaged     |
//! | `X` not blank   | staged                        |
//! | `Y` not blank   | unstaged                      |
//!
//! A path with both index and working-tree changes (`MM`) adds one to each
//! of staged and unstaged, never two to either.

use chrono::{DateTime, Utc};

/// Where HEAD points, from the `## ` header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchHead {
    /// On a branch with at least one commit.
    Branch(String),
    /// On a branch that has no commits yet.
    Unborn(String),
    /// HEAD is detached from any branch.
    Detached,
}

impl BranchHead {
    /// Returns `true` for an unborn branch.
    #[must_use]
    pub const fn is_unborn(&self) -> bool {
        matches!(self, Self::Unborn(_))
    }
}

/// Parsed porcelain status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PorcelainStatus {
    /// Branch header.
    pub head: BranchHead,
    /// Paths with index changes.
    pub staged: u32,
    /// Paths with working-tree changes or merge conflicts.
    pub unstaged: u32,
    /// Untracked paths.
    pub untracked: u32,
}

/// Parses the full output of `git status --porcelain=v1 --branch`.
///
/// # Errors
///
/// Returns a description of the problem when the branch header is missing or
/// a line is not in porcelain form.
pub fn parse_status(output: &str) -> Result<PorcelainStatus, String> {
    let mut head = None;
    let mut staged = 0u32;
    let mut unstaged = 0u32;
    let mut untracked = 0u32;

    for line in output.lines() {
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix("## ") {
            head = Some(parse_branch_header(header)?);
            continue;
        }

        let bytes = line.as_bytes();
        if bytes.len() < 4 || bytes[2] != b' ' {
            return Err(format!("malformed status line {line:?}"));
        }
        let (x, y) = (bytes[0], bytes[1]);

        match (x, y) {
            (b'?', b'?') => untracked = untracked.saturating_add(1),
            (b'!', b'!') => {}
            _ if is_unmerged(x, y) => unstaged = unstaged.saturating_add(1),
            _ => {
                if x != b' ' {
                    staged = staged.saturating_add(1);
                }
                if y != b' ' {
                    unstaged = unstaged.saturating_add(1);
                }
            }
        }
    }

    let head = head.ok_or_else(|| "missing branch header".to_owned())?;
    Ok(PorcelainStatus {
        head,
        staged,
        unstaged,
        untracked,
    })
}

const fn is_unmerged(x: u8, y: u8) -> bool {
    matches!(
        (x, y),
        (b'D', b'D') | (b'A', b'U') | (b'U', b'D') | (b'U', b'A') | (b'D', b'U') | (b'A', b'A') | (b'U', b'U')
    )
}

/// Parses the text after `## `.
///
/// Handles `main`, `main...origin/main [ahead 1]`, `HEAD (no branch)`,
/// `No commits yet on main`, and the older `Initial commit on main`.
pub fn parse_branch_header(header: &str) -> Result<BranchHead, String> {
    let header = header.trim();

    if header == "HEAD (no branch)" {
        return Ok(BranchHead::Detached);
    }
    for prefix in ["No commits yet on ", "Initial commit on "] {
        if let Some(name) = header.strip_prefix(prefix) {
            return Ok(BranchHead::Unborn(name.trim().to_owned()));
        }
    }

    // Drop " [ahead N, behind M]" and "...upstream".
    let local = header.split_once(" [").map_or(header, |(local, _)| local);
    let name = local.split_once("...").map_or(local, |(name, _)| name);
    if name.is_empty() {
        return Err(format!("unrecognized branch header {header:?}"));
    }
    Ok(BranchHead::Branch(name.to_owned()))
}

/// Parses `git log -1 --format=%ct` output.
///
/// Empty output means there is no commit.
pub fn parse_commit_time(output: &str) -> Result<Option<DateTime<Utc>>, String> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let secs: i64 = trimmed
        .parse()
        .map_err(|_| format!("invalid commit timestamp {trimmed:?}"))?;
    DateTime::from_timestamp(secs, 0)
        .map(Some)
        .ok_or_else(|| format!("commit timestamp out of range: {secs}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_repo() {
        let status = parse_status("## main...origin/main\n").unwrap();
        assert_eq!(status.head, BranchHead::Branch("main".to_owned()));
        assert_eq!((status.staged, status.unstaged, status.untracked), (0, 0, 0));
    }

    #[test]
    fn test_counts_mixed_entries() {
        let output = "\
## main
M  src/lib.rs
A  src/new.rs
 M README.md
?? notes.txt
?? scratch/
?? .env
";
        let status = parse_status(output).unwrap();
        assert_eq!(status.staged, 2);
        assert_eq!(status.unstaged, 1);
        assert_eq!(status.untracked, 3);
    }

    #[test]
    fn test_path_in_both_index_and_worktree() {
        let status = parse_status("## dev\nMM both.rs\nAM added_then_edited.rs\n").unwrap();
        assert_eq!(status.staged, 2);
        assert_eq!(status.unstaged, 2);
    }

    #[test]
    fn test_rename_and_delete() {
        let output = "## main\nR  old.rs -> new.rs\n D gone.rs\nD  removed.rs\n";
        let status = parse_status(output).unwrap();
        assert_eq!(status.staged, 2);
        assert_eq!(status.unstaged, 1);
    }

    #[test]
    fn test_unmerged_counts_once_as_unstaged() {
        let output = "## main\nUU conflict.rs\nAA both_added.rs\nDU deleted_by_us.rs\n";
        let status = parse_status(output).unwrap();
        assert_eq!(status.staged, 0);
        assert_eq!(status.unstaged, 3);
    }

    #[test]
    fn test_ignored_entries_not_counted() {
        let status = parse_status("## main\n!! target/\n").unwrap();
        assert_eq!((status.staged, status.unstaged, status.untracked), (0, 0, 0));
    }

    #[test]
    fn test_quoted_path() {
        let status = parse_status("## main\n?? \"with\\nnewline.txt\"\n").unwrap();
        assert_eq!(status.untracked, 1);
    }

    #[test]
    fn test_missing_header_is_error() {
        assert!(parse_status(" M file.rs\n").is_err());
    }

    #[test]
    fn test_malformed_line_is_error() {
        assert!(parse_status("## main\nXY\n").is_err());
        assert!(parse_status("## main\nMMM file\n").is_err());
    }

    #[test]
    fn test_header_with_tracking_info() {
        assert_eq!(
            parse_branch_header("feature/x...origin/feature/x [ahead 2, behind 1]").unwrap(),
            BranchHead::Branch("feature/x".to_owned())
        );
        assert_eq!(
            parse_branch_header("main...origin/main [gone]").unwrap(),
            BranchHead::Branch("main".to_owned())
        );
        assert_eq!(
            parse_branch_header("local-only").unwrap(),
            BranchHead::Branch("local-only".to_owned())
        );
    }

    #[test]
    fn test_header_detached() {
        let head = parse_branch_header("HEAD (no branch)").unwrap();
        assert_eq!(head, BranchHead::Detached);
        assert!(!head.is_unborn());
    }

    #[test]
    fn test_header_unborn() {
        let head = parse_branch_header("No commits yet on main").unwrap();
        assert_eq!(head, BranchHead::Unborn("main".to_owned()));
        assert!(head.is_unborn());
        assert_eq!(
            parse_branch_header("Initial commit on trunk").unwrap(),
            BranchHead::Unborn("trunk".to_owned())
        );
    }

    #[test]
    fn test_header_empty_is_error() {
        assert!(parse_branch_header("...origin/main").is_err());
    }

    #[test]
    fn test_commit_time() {
        let time = parse_commit_time("1704207845\n").unwrap().unwrap();
        assert_eq!(time.to_rfc3339(), "2024-01-02T15:04:05+00:00");
    }

    #[test]
    fn test_commit_time_empty_is_none() {
        assert_eq!(parse_commit_time("\n").unwrap(), None);
    }

    #[test]
    fn test_commit_time_garbage_is_error() {
        assert!(parse_commit_time("yesterday").is_err());
    }
}
