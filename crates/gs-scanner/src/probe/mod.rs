//! Repository status probing.
//!
//! The coordinator only sees the [`StatusProbe`] trait. [`GitProber`] is the
//! real implementation; tests substitute their own.
//!
//! `GitProber` runs up to three read-only git commands per repository:
//!
//! 1. `git status --porcelain=v1 --branch --untracked-files=normal`
//! 2. `git rev-parse --short HEAD`, only when HEAD is detached
//! 3. `git log -1 --format=%ct`, skipped for unborn branches

mod command;
pub mod porcelain;

use std::process::Stdio;
use std::time::Duration;

use camino::Utf8Path;
use gs_core::RepoStatus;
use tracing::debug;

use crate::error::{ProbeError, ScanError};
use porcelain::BranchHead;

pub use command::git_command;

/// Default upper bound on a single git invocation.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Prefix of the branch label used for a detached HEAD.
pub const DETACHED_PREFIX: &str = "detached@";

/// Determines the status of one repository.
///
/// Implementations must be safe to call from several worker threads at once.
pub trait StatusProbe: Send + Sync {
    /// Checks once per scan that the probe can run at all.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`ScanError`] (such as [`ScanError::GitNotFound`])
    /// that aborts the scan before any repository is probed.
    fn check_available(&self) -> Result<(), ScanError> {
        Ok(())
    }

    /// Probes the repository at `repo`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProbeError`] scoped to this repository.
    fn probe(&self, repo: &Utf8Path) -> Result<RepoStatus, ProbeError>;
}

/// [`StatusProbe`] backed by the git command-line tool.
#[derive(Debug, Clone)]
pub struct GitProber {
    program: String,
    timeout: Option<Duration>,
}

impl Default for GitProber {
    fn default() -> Self {
        Self {
            program: "git".to_owned(),
            timeout: Some(DEFAULT_PROBE_TIMEOUT),
        }
    }
}

impl GitProber {
    /// Creates a prober that runs `git` from `PATH` with the default timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a different git executable.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Sets the per-command timeout. `None` waits indefinitely.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The per-command timeout.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn git(&self, repo: &Utf8Path, name: &'static str, args: &[&str]) -> Result<String, ProbeError> {
        command::run_git(&self.program, repo, name, args, self.timeout)
    }

    fn detached_label(&self, repo: &Utf8Path) -> String {
        match self.git(repo, "rev-parse", &["rev-parse", "--short", "HEAD"]) {
            Ok(sha) if !sha.trim().is_empty() => format!("{DETACHED_PREFIX}{}", sha.trim()),
            Ok(_) => "detached".to_owned(),
            Err(e) => {
                debug!(%repo, error = %e, "Could not resolve detached HEAD");
                "detached".to_owned()
            }
        }
    }
}

impl StatusProbe for GitProber {
    fn check_available(&self) -> Result<(), ScanError> {
        std::process::Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|_| ())
            .map_err(|source| ScanError::GitNotFound {
                program: self.program.clone(),
                source,
            })
    }

    fn probe(&self, repo: &Utf8Path) -> Result<RepoStatus, ProbeError> {
        let output = self.git(
            repo,
            "status",
            &["status", "--porcelain=v1", "--branch", "--untracked-files=normal"],
        )?;
        let parsed = porcelain::parse_status(&output).map_err(|reason| ProbeError::Parse {
            path: repo.to_owned(),
            reason,
        })?;

        let unborn = parsed.head.is_unborn();
        let branch = match parsed.head {
            BranchHead::Branch(name) | BranchHead::Unborn(name) => name,
            BranchHead::Detached => self.detached_label(repo),
        };

        let last_commit = if unborn {
            None
        } else {
            let output = self.git(repo, "log", &["log", "-1", "--format=%ct"])?;
            porcelain::parse_commit_time(&output).map_err(|reason| ProbeError::Parse {
                path: repo.to_owned(),
                reason,
            })?
        };

        Ok(RepoStatus {
            branch,
            staged: parsed.staged,
            unstaged: parsed.unstaged,
            untracked: parsed.untracked,
            last_commit,
        })
    }
}
