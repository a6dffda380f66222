//! Running git as a child process with an optional deadline.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::Duration;

use camino::Utf8Path;
use tracing::{trace, warn};
use wait_timeout::ChildExt;

use crate::error::ProbeError;

/// Builds a git command that runs against `repo`.
///
/// Optional locks are disabled so a probe never takes `index.lock` and never
/// refreshes the index on disk, and credential prompts are turned off.
///
/// Repository discovery is capped at `repo`'s parent: if the marker under
/// `repo` is broken, git fails instead of reporting an enclosing repository.
pub fn git_command(program: &str, repo: &Utf8Path) -> Command {
    let mut cmd = Command::new(program);
    if let Some(parent) = repo.parent().filter(|p| !p.as_str().is_empty()) {
        cmd.env("GIT_CEILING_DIRECTORIES", parent);
    }
    cmd.arg("-C")
        .arg(repo)
        .env("GIT_OPTIONAL_LOCKS", "0")
        .env("GIT_TERMINAL_PROMPT", "0")
        .env("LC_ALL", "C")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

enum Waited {
    Exited(ExitStatus),
    TimedOut,
}

/// Runs `git -C <repo> <args...>` and returns its standard output.
///
/// `name` identifies the subcommand in errors. When `timeout` elapses the
/// child is killed and reaped.
pub fn run_git(
    program: &str,
    repo: &Utf8Path,
    name: &'static str,
    args: &[&str],
    timeout: Option<Duration>,
) -> Result<String, ProbeError> {
    let mut cmd = git_command(program, repo);
    cmd.args(args);
    trace!(%repo, ?args, "Running git");
    run_command(cmd, repo, name, timeout)
}

/// Runs a prepared command (with piped stdout and stderr) on behalf of
/// `repo` and returns its standard output.
pub fn run_command(
    mut cmd: Command,
    repo: &Utf8Path,
    name: &'static str,
    timeout: Option<Duration>,
) -> Result<String, ProbeError> {
    let spawn_error = |source| ProbeError::Spawn {
        path: repo.to_owned(),
        source,
    };

    let mut child = cmd.spawn().map_err(spawn_error)?;
    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();

    // Pipes are drained on their own threads so a chatty child cannot block
    // on a full pipe while we wait on it.
    let (waited, stdout, stderr) = std::thread::scope(|scope| {
        let stdout = scope.spawn(move || drain(stdout_pipe));
        let stderr = scope.spawn(move || drain(stderr_pipe));
        let waited = wait(&mut child, timeout);
        (
            waited,
            stdout.join().unwrap_or_default(),
            stderr.join().unwrap_or_default(),
        )
    });

    match waited.map_err(spawn_error)? {
        Waited::TimedOut => Err(ProbeError::TimedOut {
            path: repo.to_owned(),
            command: name,
            after: timeout.unwrap_or_default(),
        }),
        Waited::Exited(status) if status.success() => {
            Ok(String::from_utf8_lossy(&stdout).into_owned())
        }
        Waited::Exited(status) => Err(ProbeError::GitFailed {
            path: repo.to_owned(),
            command: name,
            code: status.code(),
            stderr: String::from_utf8_lossy(&stderr).trim().to_owned(),
        }),
    }
}

fn wait(child: &mut Child, timeout: Option<Duration>) -> std::io::Result<Waited> {
    let Some(limit) = timeout else {
        return child.wait().map(Waited::Exited);
    };
    if let Some(status) = child.wait_timeout(limit)? {
        return Ok(Waited::Exited(status));
    }
    warn!(pid = child.id(), timeout_secs = limit.as_secs(), "git timed out, killing");
    // The child may have exited between the timeout and the kill.
    if let Err(e) = child.kill() {
        trace!(error = %e, "Kill after timeout failed");
    }
    child.wait()?;
    Ok(Waited::TimedOut)
}

fn drain<R: Read>(pipe: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        if let Err(e) = pipe.read_to_end(&mut buf) {
            trace!(error = %e, "Failed to read git output");
        }
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_command_args() {
        let cmd = git_command("git", Utf8Path::new("/r/a"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, vec!["-C", "/r/a"]);
        assert_eq!(cmd.get_program(), "git");
        assert!(
            cmd.get_envs()
                .any(|(k, v)| k == "GIT_OPTIONAL_LOCKS" && v.is_some_and(|v| v == "0"))
        );
    }

    #[test]
    fn test_git_command_caps_discovery_at_parent() {
        let cmd = git_command("git", Utf8Path::new("/home/me/code/child"));
        let ceiling = cmd
            .get_envs()
            .find(|(k, _)| *k == "GIT_CEILING_DIRECTORIES")
            .and_then(|(_, v)| v);
        assert_eq!(ceiling, Some(std::ffi::OsStr::new("/home/me/code")));
    }

    #[test]
    fn test_git_command_at_filesystem_root_has_no_ceiling() {
        let cmd = git_command("git", Utf8Path::new("/"));
        assert!(!cmd.get_envs().any(|(k, _)| k == "GIT_CEILING_DIRECTORIES"));
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let result = run_git(
            "definitely-not-a-real-git-binary",
            Utf8Path::new("/"),
            "status",
            &["status"],
            None,
        );
        assert!(matches!(result, Err(ProbeError::Spawn { .. })));
    }

    #[cfg(unix)]
    fn shell(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", script])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    #[cfg(unix)]
    #[test]
    fn test_success_returns_stdout() {
        let out = run_command(shell("echo '## main'"), Utf8Path::new("/"), "status", None).unwrap();
        assert_eq!(out, "## main\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_git_failed() {
        let result = run_command(shell("echo boom >&2; exit 3"), Utf8Path::new("/r"), "status", None);
        assert!(matches!(
            &result,
            Err(ProbeError::GitFailed { code: Some(3), stderr, path, .. })
                if stderr == "boom" && path.as_str() == "/r"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_child() {
        let result = run_command(
            shell("exec sleep 5"),
            Utf8Path::new("/"),
            "status",
            Some(Duration::from_millis(100)),
        );
        assert!(matches!(result, Err(ProbeError::TimedOut { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_large_output_does_not_deadlock() {
        let out = run_command(
            shell("i=0; while [ $i -lt 20000 ]; do echo '?? some/long/untracked/path.txt'; i=$((i+1)); done"),
            Utf8Path::new("/"),
            "status",
            Some(Duration::from_secs(20)),
        )
        .unwrap();
        assert_eq!(out.lines().count(), 20000);
    }
}
