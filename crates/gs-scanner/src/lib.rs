//! Repository discovery and status probing for git-scope.
//!
//! This crate finds every git repository under a set of root directories and
//! reports the working-tree status of each one.
//!
//! # Overview
//!
//! The main entry point is [`Scanner`], which combines:
//!
//! - [`IgnoreMatcher`]: decides which directories to prune
//! - [`RootWalker`]: lazy, iterative discovery of `.git` markers under a root
//! - [`StatusProbe`] / [`GitProber`]: branch, change counts, and last commit
//! - [`ScanStats`]: atomic progress counters
//!
//! # Example
//!
//! ```ignore
//! use gs_scanner::{ScanOptions, Scanner};
//!
//! let options = ScanOptions::new(["/home/me/code"]).with_ignore(["node_modules"]);
//! let report = Scanner::new(options)?.scan()?;
//!
//! for repo in &report.repos {
//!     println!("{} {} dirty={}", repo.name, repo.status.branch, repo.is_dirty());
//! }
//! println!("{}", report.headline());
//! ```
//!
//! # Streaming API
//!
//! The TUI receives results while the scan runs:
//!
//! ```ignore
//! use gs_scanner::{ScanUpdate, Scanner};
//! use tokio::sync::mpsc;
//!
//! let (tx, mut rx) = mpsc::channel(256);
//! let scanner = scanner.clone();
//! tokio::task::spawn_blocking(move || scanner.scan_streaming(tx));
//!
//! while let Some(update) = rx.recv().await {
//!     match update {
//!         ScanUpdate::CandidatesDiscovered(n) => println!("probing {n} repositories"),
//!         ScanUpdate::RepoProbed(repo) => println!("{}", repo.path),
//!         ScanUpdate::ProbeFailed { path, message } => eprintln!("{path}: {message}"),
//!         ScanUpdate::Complete(report) => println!("{}", report.headline()),
//!     }
//! }
//! ```
//!
//! Dropping the receiver abandons the scan: no new probes are started and
//! in-flight ones finish without being reported.
//!
//! # Architecture
//!
//! ```text
//! Scanner::scan
//!     │
//!     ├── resolve roots (missing / non-directory roots become warnings)
//!     ├── StatusProbe::check_available (fatal if git is missing)
//!     │
//!     ├── rayon pool (max_concurrency threads)
//!     │     ├── RootWalker per root ── shared VisitedSet (parking_lot mutex)
//!     │     └── StatusProbe::probe per unique candidate
//!     │
//!     └── ScanReport { repos sorted by path, failures, warnings, stats }
//! ```
//!
//! Every scan is independent: nothing is cached between calls.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod error;
mod matcher;
mod probe;
mod stats;
mod walker;

pub use error::{ProbeError, ScanError, ScanWarning};
pub use matcher::IgnoreMatcher;
pub use probe::porcelain;
pub use probe::{DEFAULT_PROBE_TIMEOUT, DETACHED_PREFIX, GitProber, StatusProbe, git_command};
pub use stats::{ScanStats, StatsSnapshot};
pub use walker::{REPO_MARKER, RootWalker, VisitedSet, has_repo_marker, resolve_root};

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use gs_core::{Config, FleetSummary, Repo};
use rayon::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Default size of the probe worker pool.
pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

/// Update sent during a streaming scan.
#[derive(Debug)]
pub enum ScanUpdate {
    /// Number of unique repositories about to be probed.
    ///
    /// Sent once, after all roots have been walked.
    CandidatesDiscovered(usize),

    /// A repository was probed successfully.
    ///
    /// Boxed to keep the enum small on the channel.
    RepoProbed(Box<Repo>),

    /// A repository could not be probed.
    ProbeFailed {
        /// The repository path.
        path: Utf8PathBuf,
        /// Rendered [`ProbeError`].
        message: String,
    },

    /// The scan finished. Carries the same report [`Scanner::scan`] returns.
    Complete(ScanReport),
}

/// Inputs of a scan.
///
/// # Examples
///
/// ```
/// use gs_scanner::ScanOptions;
///
/// let options = ScanOptions::new(["/srv/git", "/home/me/code"])
///     .with_ignore(["node_modules", "target"])
///     .with_max_concurrency(4);
/// assert_eq!(options.roots.len(), 2);
/// assert_eq!(options.max_concurrency, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Absolute directories to search.
    pub roots: Vec<Utf8PathBuf>,
    /// Prune patterns for [`IgnoreMatcher`].
    pub ignore: Vec<String>,
    /// Maximum number of repositories probed at once.
    pub max_concurrency: usize,
    /// Whether the walker follows symlinked directories.
    pub follow_symlinks: bool,
    /// Upper bound on each git invocation.
    pub probe_timeout: Option<Duration>,
}

impl ScanOptions {
    /// Creates options for `roots` with no ignore patterns.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            ignore: Vec::new(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            follow_symlinks: true,
            probe_timeout: Some(DEFAULT_PROBE_TIMEOUT),
        }
    }

    /// Builds options from loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            roots: config.roots.clone(),
            ignore: config.ignore.clone(),
            max_concurrency: config.scan.max_concurrency.max(1),
            follow_symlinks: config.scan.follow_symlinks,
            probe_timeout: config.scan.probe_timeout(),
        }
    }

    /// Replaces the roots.
    #[must_use]
    pub fn with_roots<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        self.roots = roots.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the ignore patterns.
    #[must_use]
    pub fn with_ignore<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the probe pool size.
    #[must_use]
    pub const fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max;
        self
    }

    /// Configures whether symlinked directories are followed.
    #[must_use]
    pub const fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Sets the per-command probe timeout.
    #[must_use]
    pub const fn with_probe_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.probe_timeout = timeout;
        self
    }
}

/// Result of one scan.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Successfully probed repositories, sorted by canonical path.
    pub repos: Vec<Repo>,
    /// Repositories that were found but could not be probed, sorted by path.
    pub failures: Vec<ProbeError>,
    /// Skipped roots and directories.
    pub warnings: Vec<ScanWarning>,
    /// Counters from the walk and probe phases.
    pub stats: StatsSnapshot,
}

impl ScanReport {
    /// Dirty and clean totals over [`repos`](Self::repos).
    #[must_use]
    pub fn summary(&self) -> FleetSummary {
        FleetSummary::from_repos(&self.repos)
    }

    /// Returns `true` if some repositories could not be probed.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    /// One-line description that separates "nothing found" from partial
    /// results.
    ///
    /// ```
    /// use gs_scanner::ScanReport;
    ///
    /// assert_eq!(ScanReport::default().headline(), "no repositories found");
    /// ```
    #[must_use]
    pub fn headline(&self) -> String {
        let found = self.repos.len() + self.failures.len();
        let noun = if found == 1 { "repository" } else { "repositories" };
        match (found, self.failures.len()) {
            (0, _) => "no repositories found".to_owned(),
            (n, 0) => format!("{n} {noun}"),
            (n, m) => format!("{n} {noun}, {m} could not be probed"),
        }
    }
}

/// Scans root directories for repositories.
///
/// Cloning is cheap; clones share the compiled matcher and prober.
#[derive(Debug)]
pub struct Scanner<P = GitProber> {
    options: ScanOptions,
    matcher: Arc<IgnoreMatcher>,
    prober: Arc<P>,
}

impl<P> Clone for Scanner<P> {
    fn clone(&self) -> Self {
        Self {
            options: self.options.clone(),
            matcher: Arc::clone(&self.matcher),
            prober: Arc::clone(&self.prober),
        }
    }
}

impl Scanner<GitProber> {
    /// Creates a scanner that probes with the git command-line tool.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidPattern`] for a bad ignore pattern or
    /// [`ScanError::Config`] for a zero pool size.
    pub fn new(options: ScanOptions) -> Result<Self, ScanError> {
        let prober = GitProber::new().with_timeout(options.probe_timeout);
        Self::with_prober(options, prober)
    }
}

impl<P: StatusProbe> Scanner<P> {
    /// Creates a scanner with a custom [`StatusProbe`].
    ///
    /// # Errors
    ///
    /// Same as [`Scanner::new`].
    pub fn with_prober(options: ScanOptions, prober: P) -> Result<Self, ScanError> {
        if options.max_concurrency == 0 {
            return Err(ScanError::config("max_concurrency must be at least 1"));
        }
        let matcher = IgnoreMatcher::new(&options.ignore)?;
        Ok(Self {
            options,
            matcher: Arc::new(matcher),
            prober: Arc::new(prober),
        })
    }

    /// The options this scanner was built with.
    #[inline]
    #[must_use]
    pub const fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Runs a full scan and returns the report.
    ///
    /// # Errors
    ///
    /// Fails only when the scan as a whole cannot run: no usable roots, git
    /// missing, or the worker pool cannot start. Per-repository problems are
    /// reported in [`ScanReport::failures`] and [`ScanReport::warnings`].
    pub fn scan(&self) -> Result<ScanReport, ScanError> {
        self.run(None)
    }

    /// Runs a full scan, sending progress on `tx`.
    ///
    /// Updates arrive in this order:
    /// 1. [`ScanUpdate::CandidatesDiscovered`], once
    /// 2. [`ScanUpdate::RepoProbed`] or [`ScanUpdate::ProbeFailed`] per
    ///    repository, in completion order
    /// 3. [`ScanUpdate::Complete`], once
    ///
    /// If the receiver is dropped the scan stops starting new probes and
    /// returns `Ok(())`.
    ///
    /// # Errors
    ///
    /// Same as [`scan`](Self::scan). Nothing is sent when the scan fails.
    #[allow(clippy::needless_pass_by_value)] // Sender is borrowed by rayon workers
    pub fn scan_streaming(&self, tx: mpsc::Sender<ScanUpdate>) -> Result<(), ScanError> {
        let report = self.run(Some(&tx))?;
        if tx.blocking_send(ScanUpdate::Complete(report)).is_err() {
            debug!("Scan receiver dropped before completion");
        }
        Ok(())
    }

    fn run(&self, tx: Option<&mpsc::Sender<ScanUpdate>>) -> Result<ScanReport, ScanError> {
        info!(roots = self.options.roots.len(), "Starting scan");

        let (roots, mut warnings) = self.resolve_roots()?;
        self.prober.check_available()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.max_concurrency)
            .thread_name(|i| format!("gs-scan-{i}"))
            .build()?;

        let stats = Arc::new(ScanStats::new());
        let (candidates, walk_warnings) = pool.install(|| self.walk_roots(&roots, &stats));
        warnings.extend(walk_warnings);

        info!(count = candidates.len(), "Collected repositories");

        let cancelled = AtomicBool::new(false);
        if let Some(tx) = tx {
            if tx
                .blocking_send(ScanUpdate::CandidatesDiscovered(candidates.len()))
                .is_err()
            {
                cancelled.store(true, Ordering::Relaxed);
            }
        }

        let results: Vec<Option<Result<Repo, ProbeError>>> = pool.install(|| {
            candidates
                .into_par_iter()
                .map(|path| self.probe_one(path, &stats, tx, &cancelled))
                .collect()
        });

        if cancelled.load(Ordering::Relaxed) {
            debug!("Scan abandoned by receiver");
        }

        let mut repos = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for result in results.into_iter().flatten() {
            match result {
                Ok(repo) => repos.push(repo),
                Err(e) => failures.push(e),
            }
        }

        let report = ScanReport {
            repos,
            failures,
            warnings,
            stats: stats.snapshot(),
        };
        info!(
            repos = report.repos.len(),
            failed = report.failures.len(),
            warnings = report.warnings.len(),
            visited = report.stats.directories_visited,
            "Scan completed"
        );
        Ok(report)
    }

    /// Canonicalizes roots, turning unusable ones into warnings.
    fn resolve_roots(&self) -> Result<(Vec<Utf8PathBuf>, Vec<ScanWarning>), ScanError> {
        let mut roots = Vec::with_capacity(self.options.roots.len());
        let mut warnings = Vec::new();

        for root in &self.options.roots {
            match resolve_root(root) {
                Ok(canonical) => roots.push(canonical),
                Err(warning) => {
                    warn!(%warning, "Skipping root");
                    warnings.push(warning);
                }
            }
        }

        if roots.is_empty() {
            return Err(ScanError::NoUsableRoots {
                skipped: warnings.len(),
            });
        }
        roots.sort_unstable();
        roots.dedup();
        Ok((roots, warnings))
    }

    /// Walks every root in parallel and merges candidates by canonical path.
    fn walk_roots(
        &self,
        roots: &[Utf8PathBuf],
        stats: &Arc<ScanStats>,
    ) -> (Vec<Utf8PathBuf>, Vec<ScanWarning>) {
        let visited = Arc::new(VisitedSet::new());

        let walked: Vec<(Vec<Utf8PathBuf>, Vec<ScanWarning>)> = roots
            .par_iter()
            .map(|root| {
                debug!(%root, "Walking root");
                let mut walker = RootWalker::from_canonical(root.clone(), Arc::clone(&self.matcher))
                    .with_visited(Arc::clone(&visited))
                    .with_stats(Arc::clone(stats))
                    .with_follow_symlinks(self.options.follow_symlinks);
                let found: Vec<_> = walker.by_ref().collect();
                (found, walker.take_warnings())
            })
            .collect();

        let mut unique = BTreeSet::new();
        let mut warnings = Vec::new();
        for (found, walk_warnings) in walked {
            unique.extend(found);
            for warning in &walk_warnings {
                debug!(%warning, "Walk warning");
            }
            warnings.extend(walk_warnings);
        }
        (unique.into_iter().collect(), warnings)
    }

    fn probe_one(
        &self,
        path: Utf8PathBuf,
        stats: &ScanStats,
        tx: Option<&mpsc::Sender<ScanUpdate>>,
        cancelled: &AtomicBool,
    ) -> Option<Result<Repo, ProbeError>> {
        if cancelled.load(Ordering::Relaxed) {
            return None;
        }

        let (result, update) = match self.prober.probe(&path) {
            Ok(status) => {
                stats.increment_probed();
                let repo = Repo::new(path, status);
                debug!(path = %repo.path, branch = %repo.status.branch, dirty = repo.is_dirty(), "Probed repository");
                let update = tx.map(|_| ScanUpdate::RepoProbed(Box::new(repo.clone())));
                (Ok(repo), update)
            }
            Err(e) => {
                stats.increment_failed();
                warn!(%path, error = %e, "Failed to probe repository");
                let update = tx.map(|_| ScanUpdate::ProbeFailed {
                    path,
                    message: e.to_string(),
                });
                (Err(e), update)
            }
        };

        if let (Some(tx), Some(update)) = (tx, update) {
            if tx.blocking_send(update).is_err() {
                cancelled.store(true, Ordering::Relaxed);
            }
        }
        Some(result)
    }
}

/// Scans `roots` for repositories with default settings and returns them
/// sorted by path.
///
/// Warnings are logged. Repositories that could not be probed are left out.
///
/// # Errors
///
/// See [`Scanner::scan`].
pub fn scan_roots<R, S>(roots: &[R], ignore: &[S]) -> Result<Vec<Repo>, ScanError>
where
    R: AsRef<Utf8Path>,
    S: AsRef<str>,
{
    let options = ScanOptions::new(roots.iter().map(|r| r.as_ref().to_owned()))
        .with_ignore(ignore.iter().map(|s| s.as_ref().to_owned()));
    Scanner::new(options)?.scan().map(|report| report.repos)
}
