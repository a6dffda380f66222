//! Interactive config creation (`git-scope init`).

use std::io::{BufRead, Write};

use camino::{Utf8Path, Utf8PathBuf};
use color_eyre::eyre::WrapErr;
use gs_core::{Config, DEFAULT_EDITOR};

/// What `init` ended up doing.
#[derive(Debug, PartialEq, Eq)]
pub enum InitOutcome {
    /// A config file was written.
    Created(Config),
    /// The user declined to overwrite an existing file.
    KeptExisting,
    /// No directories were entered or accepted.
    NoDirectories,
}

/// Line-oriented prompt over any reader and writer.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn say(&mut self, text: &str) -> color_eyre::Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Prints `question` without a newline and reads one trimmed line.
    ///
    /// End of input reads as an empty answer.
    fn ask(&mut self, question: &str) -> color_eyre::Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line).wrap_err("failed to read answer")?;
        Ok(line.trim().to_owned())
    }

    fn confirm(&mut self, question: &str, default_yes: bool) -> color_eyre::Result<bool> {
        let answer = self.ask(question)?.to_lowercase();
        Ok(match answer.as_str() {
            "" => default_yes,
            "y" | "yes" => true,
            _ => false,
        })
    }

    /// Runs the full dialogue and writes the config to `path`.
    ///
    /// `detect` supplies suggested directories when none are entered.
    pub fn run(
        &mut self,
        path: &Utf8Path,
        detect: impl FnOnce() -> Vec<Utf8PathBuf>,
    ) -> color_eyre::Result<InitOutcome> {
        self.say("git-scope init: set up your configuration\n")?;

        if Config::exists(path) {
            self.say(&format!("Config file already exists at: {path}"))?;
            if !self.confirm("Overwrite? [y/N]: ", false)? {
                self.say("Aborted.")?;
                return Ok(InitOutcome::KeptExisting);
            }
        }

        self.say("Enter directories to scan for git repos (one per line, empty line to finish).")?;
        self.say("Use ~/folder for home-relative paths, absolute paths, or . for the current directory.\n")?;

        let mut roots = Vec::new();
        loop {
            let line = self.ask("> ")?;
            if line.is_empty() {
                break;
            }
            roots.push(Utf8PathBuf::from(line));
        }

        if roots.is_empty() {
            let detected = detect();
            if detected.is_empty() {
                self.say("No directories configured. Run 'git-scope init' again to set up.")?;
                return Ok(InitOutcome::NoDirectories);
            }
            self.say("\nNo directories entered. Detected these on your system:")?;
            for dir in &detected {
                self.say(&format!("  - {dir}"))?;
            }
            if !self.confirm("\nUse these? [Y/n]: ", true)? {
                self.say("No directories configured. Run 'git-scope init' again to set up.")?;
                return Ok(InitOutcome::NoDirectories);
            }
            roots = detected;
        }

        let editor = self.ask(&format!("\nEditor command (default: {DEFAULT_EDITOR}): "))?;
        let config = Config::create(path, roots, &editor)
            .wrap_err_with(|| format!("failed to create config at {path}"))?;

        self.say(&format!("\nConfig created at {path}"))?;
        self.say("Directories to scan:")?;
        for root in &config.roots {
            self.say(&format!("  • {root}"))?;
        }
        self.say(&format!("Editor: {}", config.editor))?;
        self.say("\nRun 'git-scope' to launch the dashboard.")?;

        Ok(InitOutcome::Created(config))
    }
}
