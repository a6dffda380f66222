//! Opening a repository in the configured editor.

use std::process::Command;

use camino::Utf8Path;
use tracing::{debug, info};

use crate::error::TuiError;
use crate::tui::Tui;

/// A parsed editor command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommand {
    program: String,
    args: Vec<String>,
}

impl EditorCommand {
    /// Splits an editor setting such as `code -n` on whitespace.
    ///
    /// Returns `None` for a blank setting.
    #[must_use]
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace();
        let program = parts.next()?.to_owned();
        let args = parts.map(str::to_owned).collect();
        Some(Self { program, args })
    }

    /// The program to run.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Builds the command that opens `repo`, run from inside it.
    #[must_use]
    pub fn command_for(&self, repo: &Utf8Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(repo.as_std_path())
            .current_dir(repo.as_std_path());
        cmd
    }
}

/// Runs the editor on `repo`, leaving the terminal while it is active.
///
/// The terminal is restored even when the editor fails to start or exits
/// with an error.
///
/// # Errors
///
/// Returns [`TuiError::Editor`] if the editor setting is blank, the program
/// cannot be started, or it exits unsuccessfully. Terminal errors are
/// returned as [`TuiError::Terminal`].
pub fn run_editor(editor: &str, repo: &Utf8Path, tui: &mut Tui) -> Result<(), TuiError> {
    let command = EditorCommand::parse(editor)
        .ok_or_else(|| TuiError::editor("no editor configured"))?;

    info!(editor = command.program(), %repo, "Opening repository in editor");
    tui.exit()?;

    let result = command
        .command_for(repo)
        .status()
        .map_err(|e| TuiError::editor(format!("could not start {}: {e}", command.program())))
        .and_then(|status| {
            if status.success() {
                Ok(())
            } else {
                Err(TuiError::editor(format!(
                    "{} exited with {status}",
                    command.program()
                )))
            }
        });

    tui.enter()?;
    debug!(ok = result.is_ok(), "Editor returned");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_program_only() {
        let cmd = EditorCommand::parse("code").unwrap();
        assert_eq!(cmd.program(), "code");
        assert!(cmd.args.is_empty());
    }

    #[test]
    fn test_parse_with_args() {
        let cmd = EditorCommand::parse("  emacsclient  -t --alternate-editor= ").unwrap();
        assert_eq!(cmd.program(), "emacsclient");
        assert_eq!(cmd.args, ["-t", "--alternate-editor="]);
    }

    #[test]
    fn test_parse_blank() {
        assert!(EditorCommand::parse("").is_none());
        assert!(EditorCommand::parse("   ").is_none());
    }

    #[test]
    fn test_command_appends_repo_path() {
        let cmd = EditorCommand::parse("nvim -R").unwrap();
        let command = cmd.command_for(Utf8Path::new("/code/api"));
        let args: Vec<_> = command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(command.get_program(), "nvim");
        assert_eq!(args, ["-R", "/code/api"]);
        assert_eq!(
            command.get_current_dir(),
            Some(Utf8Path::new("/code/api").as_std_path())
        );
    }
}
