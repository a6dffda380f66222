//! Build automation tasks for the git-scope workspace.
//!
//! Run with: `cargo xt <command>`
//!
//! # Available Commands
//!
//! - `check`: Run all checks (fmt, clippy, test)
//! - `fmt`: Format code with rustfmt
//! - `lint`: Run clippy with all targets
//! - `test`: Run all tests
//! - `bench`: Run the criterion benchmarks
//! - `build`: Build the release binary
//! - `doc`: Build documentation
//! - `clean`: Clean build artifacts

// xtask is a build tool - printing to stderr is expected
#![allow(clippy::print_stderr)]

use std::process::Command;

use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};

/// Build automation for git-scope
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for git-scope")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks (fmt --check, clippy, test)
    Check,
    /// Format code with rustfmt
    Fmt {
        /// Check formatting without modifying files
        #[arg(long)]
        check: bool,
    },
    /// Run clippy lints
    Lint {
        /// Automatically fix lint warnings
        #[arg(long)]
        fix: bool,
    },
    /// Run all tests
    Test {
        /// Run tests with release optimizations
        #[arg(long)]
        release: bool,
    },
    /// Run the scanner benchmarks
    Bench {
        /// Only run benchmarks whose name contains this filter
        filter: Option<String>,
    },
    /// Build the git-scope binary
    Build {
        /// Build in debug mode
        #[arg(long)]
        debug: bool,
    },
    /// Clean build artifacts
    Clean,
    /// Generate documentation
    Doc {
        /// Open in browser after building
        #[arg(long)]
        open: bool,
    },
}

/// Workspace root, one level above this crate.
fn workspace_root() -> Result<Utf8PathBuf> {
    let manifest_dir = Utf8Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .map(Utf8Path::to_path_buf)
        .context("xtask manifest has no parent directory")
}

/// Runs `cargo <args>` from the workspace root, failing on a non-zero exit.
fn cargo(args: &[&str]) -> Result<()> {
    let root = workspace_root()?;
    let program = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_owned());

    eprintln!("$ cargo {}", args.join(" "));
    let status = Command::new(&program)
        .args(args)
        .current_dir(root.as_std_path())
        .status()
        .with_context(|| format!("failed to run {program}"))?;

    if !status.success() {
        bail!("cargo {} failed with {status}", args.join(" "));
    }
    Ok(())
}

fn fmt(check: bool) -> Result<()> {
    if check {
        cargo(&["fmt", "--all", "--", "--check"])
    } else {
        cargo(&["fmt", "--all"])
    }
}

fn lint(fix: bool) -> Result<()> {
    let mut args = vec!["clippy", "--workspace", "--all-targets"];
    if fix {
        args.extend(["--fix", "--allow-dirty", "--allow-staged"]);
    }
    args.extend(["--", "-D", "warnings"]);
    cargo(&args)
}

fn test(release: bool) -> Result<()> {
    let mut args = vec!["test", "--workspace"];
    if release {
        args.push("--release");
    }
    cargo(&args)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            fmt(true)?;
            lint(false)?;
            test(false)
        }
        Commands::Fmt { check } => fmt(check),
        Commands::Lint { fix } => lint(fix),
        Commands::Test { release } => test(release),
        Commands::Bench { filter } => {
            let mut args = vec!["bench", "--package", "gs-scanner"];
            if let Some(filter) = filter.as_deref() {
                args.extend(["--", filter]);
            }
            cargo(&args)
        }
        Commands::Build { debug } => {
            let mut args = vec!["build", "--package", "gs-cli", "--bin", "git-scope"];
            if !debug {
                args.push("--release");
            }
            cargo(&args)
        }
        Commands::Clean => cargo(&["clean"]),
        Commands::Doc { open } => {
            let mut args = vec!["doc", "--workspace", "--no-deps"];
            if open {
                args.push("--open");
            }
            cargo(&args)
        }
    }
}
