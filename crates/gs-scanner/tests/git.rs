//! Probing real repositories. Skipped when git is not installed.

#![allow(missing_docs, clippy::unwrap_used)]

use std::fs;
use std::process::Command;

use camino::{Utf8Path, Utf8PathBuf};
use gs_scanner::{DETACHED_PREFIX, GitProber, ProbeError, ScanOptions, Scanner, StatusProbe};
use tempfile::TempDir;

fn git_available() -> bool {
    Command::new("git").arg("--version").output().is_ok_and(|o| o.status.success())
}

macro_rules! require_git {
    () => {
        if !git_available() {
            eprintln!("git not installed; skipping");
            return;
        }
    };
}

fn git(repo: &Utf8Path, args: &[&str]) {
    let status = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
        .args(["-c", "commit.gpgsign=false", "-c", "init.defaultBranch=main"])
        .args(args)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("HOME", repo)
        .output()
        .unwrap();
    assert!(
        status.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&status.stderr)
    );
}

fn temp_root() -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().canonicalize().unwrap()).unwrap();
    (dir, root)
}

fn init_repo(path: &Utf8Path) {
    fs::create_dir_all(path).unwrap();
    git(path, &["init", "-q", "-b", "main"]);
}

fn commit_file(repo: &Utf8Path, name: &str, contents: &str) {
    fs::write(repo.join(name), contents).unwrap();
    git(repo, &["add", name]);
    git(repo, &["commit", "-q", "-m", name]);
}

#[test]
fn test_clean_repo() {
    require_git!();
    let (_dir, root) = temp_root();
    let repo = root.join("clean");
    init_repo(&repo);
    commit_file(&repo, "README.md", "hello\n");

    let status = GitProber::new().probe(&repo).unwrap();
    assert_eq!(status.branch, "main");
    assert_eq!((status.staged, status.unstaged, status.untracked), (0, 0, 0));
    assert!(!status.is_dirty());
    assert!(status.last_commit.is_some());
}

#[test]
fn test_dirty_counts() {
    require_git!();
    let (_dir, root) = temp_root();
    let repo = root.join("dirty");
    init_repo(&repo);
    commit_file(&repo, "a.txt", "a\n");
    commit_file(&repo, "b.txt", "b\n");

    // Staged modification, unstaged modification, and an untracked file.
    fs::write(repo.join("a.txt"), "a2\n").unwrap();
    git(&repo, &["add", "a.txt"]);
    fs::write(repo.join("b.txt"), "b2\n").unwrap();
    fs::write(repo.join("new.txt"), "new\n").unwrap();

    let status = GitProber::new().probe(&repo).unwrap();
    assert_eq!(status.staged, 1);
    assert_eq!(status.unstaged, 1);
    assert_eq!(status.untracked, 1);
    assert!(status.is_dirty());
}

#[test]
fn test_unborn_branch() {
    require_git!();
    let (_dir, root) = temp_root();
    let repo = root.join("fresh");
    init_repo(&repo);
    fs::write(repo.join("draft.txt"), "draft\n").unwrap();

    let status = GitProber::new().probe(&repo).unwrap();
    assert_eq!(status.branch, "main");
    assert_eq!(status.untracked, 1);
    assert_eq!(status.last_commit, None);
}

#[test]
fn test_detached_head() {
    require_git!();
    let (_dir, root) = temp_root();
    let repo = root.join("detached");
    init_repo(&repo);
    commit_file(&repo, "one.txt", "1\n");
    commit_file(&repo, "two.txt", "2\n");
    git(&repo, &["checkout", "-q", "--detach", "HEAD~1"]);

    let status = GitProber::new().probe(&repo).unwrap();
    assert!(status.branch.starts_with(DETACHED_PREFIX), "{}", status.branch);
    assert!(status.last_commit.is_some());
}

#[test]
fn test_probe_does_not_touch_index() {
    require_git!();
    let (_dir, root) = temp_root();
    let repo = root.join("quiet");
    init_repo(&repo);
    commit_file(&repo, "file.txt", "x\n");
    fs::write(repo.join("file.txt"), "y\n").unwrap();

    let index = repo.join(".git/index");
    let before = fs::read(&index).unwrap();
    GitProber::new().probe(&repo).unwrap();
    assert_eq!(fs::read(&index).unwrap(), before);
    assert!(!repo.join(".git/index.lock").exists());
}

#[test]
fn test_not_a_repo_fails() {
    require_git!();
    let (_dir, root) = temp_root();
    let plain = root.join("plain");
    fs::create_dir_all(&plain).unwrap();
    // A bare marker directory is enough for discovery but not for git.
    fs::create_dir_all(plain.join(".git")).unwrap();

    let result = GitProber::new().probe(&plain);
    assert!(matches!(result, Err(ProbeError::GitFailed { .. })));
}

#[test]
fn test_corrupted_child_does_not_report_parent() {
    require_git!();
    let (_dir, root) = temp_root();
    init_repo(&root);
    commit_file(&root, "dotfile", "x\n");
    let child = root.join("child");
    init_repo(&child);
    commit_file(&child, "lib.rs", "\n");
    fs::remove_file(child.join(".git/HEAD")).unwrap();

    let result = GitProber::new().probe(&child);
    assert!(
        matches!(&result, Err(ProbeError::GitFailed { path, .. }) if *path == child),
        "{result:?}"
    );
    // The enclosing repository still probes normally.
    assert_eq!(GitProber::new().probe(&root).unwrap().branch, "main");
}

#[test]
fn test_missing_program_is_fatal() {
    let prober = GitProber::new().with_program("git-scope-no-such-git");
    assert!(prober.check_available().is_err());
}

#[test]
fn test_full_scan_over_real_repos() {
    require_git!();
    let (_dir, root) = temp_root();
    init_repo(&root.join("api"));
    commit_file(&root.join("api"), "main.rs", "fn main() {}\n");
    init_repo(&root.join("web"));
    commit_file(&root.join("web"), "index.html", "<html></html>\n");
    fs::write(root.join("web/index.html"), "<html>changed</html>\n").unwrap();
    init_repo(&root.join("web/node_modules/dep"));

    let options = ScanOptions::new([root.clone()]).with_ignore(["node_modules"]);
    let report = Scanner::new(options).unwrap().scan().unwrap();

    let names: Vec<_> = report.repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["api", "web"]);
    assert!(!report.repos[0].is_dirty());
    assert!(report.repos[1].is_dirty());
    assert_eq!(report.summary().dirty, 1);
}
