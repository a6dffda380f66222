//! Command-line entry point for git-scope.
//!
//! # Usage
//!
//! ```bash
//! # Dashboard over configured roots (or smart defaults)
//! git-scope
//!
//! # Dashboard over specific directories
//! git-scope ~/code ~/work
//!
//! # One-shot scan, JSON on stdout
//! git-scope scan .
//!
//! # Find every repository under the home directory
//! git-scope scan-all
//!
//! # Create ~/.config/git-scope/config.yml interactively
//! git-scope init
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod init;

use std::io::{self, Write};

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use gs_core::{Config, FULL_SCAN_IGNORE, FleetSummary, Repo, expand_paths, home_dir, smart_default_roots};
use gs_scanner::{ScanOptions, ScanReport, Scanner};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::init::{InitOutcome, Prompt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// A fast dashboard for the state of every git repository you work on.
#[derive(Parser)]
#[command(name = "git-scope", version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Command to execute (defaults to the dashboard).
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directories to show in the dashboard, overriding configured roots.
    dirs: Vec<String>,

    /// Path to the config file.
    #[arg(long, global = true, env = "GIT_SCOPE_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Disable colored log output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive dashboard.
    Tui {
        /// Directories to scan, overriding configured roots.
        dirs: Vec<String>,
    },

    /// Scan once and print repositories as JSON.
    Scan {
        /// Directories to scan, overriding configured roots.
        dirs: Vec<String>,
    },

    /// Scan everything under the home directory and print a summary.
    ScanAll,

    /// Create a config file interactively.
    Init,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Default log directives for a verbosity count.
///
/// The dashboard owns the terminal, so it stays silent unless asked.
fn log_directives(verbose: u8, interactive: bool) -> &'static str {
    match (verbose, interactive) {
        (0, true) => "off",
        (0, false) => "info",
        (1, _) => "debug,ignore=info",
        _ => "trace",
    }
}

/// Initializes the tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8, no_color: bool, interactive: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directives(verbose, interactive)));

    let use_ansi = !no_color && std::env::var_os("NO_COLOR").is_none();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(io::stderr),
        )
        .with(filter)
        .init();
}

fn config_path(cli: &Cli) -> Utf8PathBuf {
    cli.config.clone().unwrap_or_else(Config::default_path)
}

/// Loads the config and applies directory overrides.
///
/// Explicit directories win. Without them, a missing config file falls back
/// to the smart default roots.
fn load_config(cli: &Cli, dirs: &[String]) -> color_eyre::Result<Config> {
    let path = config_path(cli);
    let mut config = Config::load(&path).wrap_err_with(|| format!("failed to load config from {path}"))?;

    if !dirs.is_empty() {
        config.roots = expand_paths(dirs).wrap_err("invalid directory argument")?;
    } else if !Config::exists(&path) {
        config.roots = smart_default_roots().wrap_err("failed to detect default roots")?;
        debug!(roots = ?config.roots, "No config file, using detected roots");
    }

    Ok(config)
}

fn build_scanner(options: ScanOptions) -> color_eyre::Result<Scanner> {
    Scanner::new(options).wrap_err("failed to create scanner")
}

fn log_report(report: &ScanReport) {
    for warning in &report.warnings {
        warn!("{warning}");
    }
    for failure in &report.failures {
        warn!(path = %failure.path(), "{failure}");
    }
    info!(
        visited = report.stats.directories_visited,
        pruned = report.stats.directories_pruned,
        "{}",
        report.headline()
    );
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Runs the dashboard until the user quits or SIGTERM arrives.
async fn run_tui(config: Config) -> color_eyre::Result<()> {
    info!(roots = config.roots.len(), "Starting dashboard");
    let scanner = build_scanner(ScanOptions::from_config(&config))?;

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            result = gs_tui::run(config, scanner) => {
                result.wrap_err("dashboard error")?;
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        gs_tui::run(config, scanner).await.wrap_err("dashboard error")?;
    }

    Ok(())
}

/// Scans once and prints the repositories as pretty JSON.
fn run_scan(config: &Config) -> color_eyre::Result<()> {
    let scanner = build_scanner(ScanOptions::from_config(config))?;
    let report = scanner.scan().wrap_err("scan error")?;
    log_report(&report);

    let mut out = io::stdout().lock();
    write_json(&mut out, &report.repos)?;
    Ok(())
}

fn write_json(out: &mut impl Write, repos: &[Repo]) -> color_eyre::Result<()> {
    serde_json::to_writer_pretty(&mut *out, repos).wrap_err("failed to write JSON")?;
    writeln!(out)?;
    Ok(())
}

/// Scans the whole home directory with the extended ignore list.
fn run_scan_all(config: &Config) -> color_eyre::Result<()> {
    let home = home_dir()?;
    let mut out = io::stdout().lock();

    writeln!(out, "Full system scan: finding all git repositories...")?;
    writeln!(out, "Scanning from: {home}")?;
    writeln!(out, "This may take a while depending on your disk size.\n")?;
    out.flush()?;

    let report = build_scanner(scan_all_options(config, home))?
        .scan()
        .wrap_err("scan error")?;
    log_report(&report);

    write_scan_all_summary(&mut out, &report.repos)
}

/// Scan settings from `config`, rooted at `home` with the extended ignore list.
fn scan_all_options(config: &Config, home: Utf8PathBuf) -> ScanOptions {
    ScanOptions::from_config(config)
        .with_roots([home])
        .with_ignore(FULL_SCAN_IGNORE.iter().copied())
}

fn write_scan_all_summary(out: &mut impl Write, repos: &[Repo]) -> color_eyre::Result<()> {
    const RULE: &str = "═══════════════════════════════════════════════════";
    let summary = FleetSummary::from_repos(repos);

    writeln!(out, "{RULE}")?;
    writeln!(out, "                   SCAN COMPLETE")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "   Total repos found:   {}", summary.total)?;
    writeln!(out, "   ● Dirty:             {}", summary.dirty)?;
    writeln!(out, "   ○ Clean:             {}", summary.clean)?;
    writeln!(out, "{RULE}\n")?;

    if summary.dirty > 0 {
        writeln!(out, "Dirty repos that need attention:")?;
        for repo in repos.iter().filter(|r| r.is_dirty()) {
            writeln!(out, "   • {} ({}) - {}", repo.name, repo.status.branch, repo.path)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "To add these directories to your config, run: git-scope init")?;
    writeln!(out, "Or run: git-scope ~/path/to/folder to scan specific folders")?;
    Ok(())
}

fn run_init(cli: &Cli) -> color_eyre::Result<()> {
    let path = config_path(cli);
    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();

    let outcome = Prompt::new(stdin, stdout).run(&path, || {
        smart_default_roots().unwrap_or_default()
    })?;
    if let InitOutcome::Created(config) = outcome {
        info!(%path, roots = config.roots.len(), "Config created");
    }
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Tui { .. }));
    init_tracing(cli.verbose, cli.no_color, interactive);

    match &cli.command {
        None => run_tui(load_config(&cli, &cli.dirs)?).await,
        Some(Commands::Tui { dirs }) => run_tui(load_config(&cli, dirs)?).await,
        Some(Commands::Scan { dirs }) => run_scan(&load_config(&cli, dirs)?),
        Some(Commands::ScanAll) => run_scan_all(&load_config(&cli, &[])?),
        Some(Commands::Init) => run_init(&cli),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use gs_core::RepoStatus;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_dirs_launch_dashboard() {
        let cli = Cli::try_parse_from(["git-scope", "~/code", "~/work"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.dirs, ["~/code", "~/work"]);
    }

    #[test]
    fn test_scan_subcommand() {
        let cli = Cli::try_parse_from(["git-scope", "-vv", "scan", "."]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Commands::Scan { ref dirs }) if dirs == &["."]));
    }

    #[test]
    fn test_config_flag() {
        let cli = Cli::try_parse_from(["git-scope", "scan-all", "--config", "/tmp/gs.yml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::ScanAll)));
        assert_eq!(config_path(&cli), "/tmp/gs.yml");
    }

    #[test]
    fn test_log_directives() {
        assert_eq!(log_directives(0, true), "off");
        assert_eq!(log_directives(0, false), "info");
        assert_eq!(log_directives(1, true), "debug,ignore=info");
        assert_eq!(log_directives(4, false), "trace");
    }

    #[test]
    fn test_load_config_dirs_override() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let path = root.join("config.yml");
        Config::create(&path, vec!["/configured".into()], "vim").unwrap();

        let cli = Cli::try_parse_from(["git-scope", "--config", path.as_str()]).unwrap();
        let config = load_config(&cli, &[]).unwrap();
        assert_eq!(config.roots, [Utf8PathBuf::from("/configured")]);
        assert_eq!(config.editor, "vim");

        let config = load_config(&cli, &[root.to_string()]).unwrap();
        assert_eq!(config.roots, [root]);
    }

    #[test]
    fn test_write_json() {
        let mut dirty = RepoStatus::new("main");
        dirty.unstaged = 1;
        let repos = [Repo::new("/code/api".into(), dirty)];
        let mut out = Vec::new();
        write_json(&mut out, &repos).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("[\n  {"));
        assert!(text.ends_with("]\n"));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["name"], "api");
    }

    #[test]
    fn test_write_json_empty() {
        let mut out = Vec::new();
        write_json(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[]\n");
    }

    #[test]
    fn test_scan_all_options_follow_config() {
        let config = Config {
            roots: vec!["/configured".into()],
            scan: gs_core::ScanSettings {
                max_concurrency: 3,
                probe_timeout_secs: 0,
                follow_symlinks: false,
            },
            ..Config::default()
        };

        let options = scan_all_options(&config, "/home/me".into());
        assert_eq!(options.roots, [Utf8PathBuf::from("/home/me")]);
        assert_eq!(options.max_concurrency, 3);
        assert_eq!(options.probe_timeout, None);
        assert!(!options.follow_symlinks);
        assert!(options.ignore.iter().map(String::as_str).eq(FULL_SCAN_IGNORE.iter().copied()));
    }

    #[test]
    fn test_scan_all_summary() {
        let mut dirty = RepoStatus::new("feature");
        dirty.staged = 1;
        let repos = [
            Repo::new("/home/me/api".into(), RepoStatus::new("main")),
            Repo::new("/home/me/web".into(), dirty),
        ];
        let mut out = Vec::new();
        write_scan_all_summary(&mut out, &repos).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Total repos found:   2"));
        assert!(text.contains("● Dirty:             1"));
        assert!(text.contains("   • web (feature) - /home/me/web"));
        assert!(!text.contains("• api"));
    }
}
