//! Expansion of user-supplied directory paths.
//!
//! Roots arrive from the config file and the command line as strings such as
//! `~/code`, `.` or `../work`. The scanner only accepts absolute paths, so
//! everything is resolved here first.

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::ConfigError;

/// Directories (relative to the home directory) that commonly hold checkouts.
///
/// Used when no config file exists and no directories were given.
const SMART_DEFAULT_DIRS: &[&str] = &[
    "code",
    "Code",
    "projects",
    "Projects",
    "dev",
    "Dev",
    "work",
    "Work",
    "repos",
    "Repos",
    "src",
    "Developer",
    "Documents/GitHub",
    "Desktop/projects",
];

/// Returns the current user's home directory as a UTF-8 path.
pub fn home_dir() -> Result<Utf8PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Utf8PathBuf::from_path_buf(home).map_err(|p| ConfigError::InvalidPath {
        path: Utf8PathBuf::from(p.to_string_lossy().into_owned()),
        reason: "home directory is not valid UTF-8".to_owned(),
    })
}

fn current_dir() -> Result<Utf8PathBuf, ConfigError> {
    let cwd = std::env::current_dir().map_err(|e| ConfigError::io(".", e))?;
    Utf8PathBuf::from_path_buf(cwd).map_err(|p| ConfigError::InvalidPath {
        path: Utf8PathBuf::from(p.to_string_lossy().into_owned()),
        reason: "current directory is not valid UTF-8".to_owned(),
    })
}

/// Expands `~` and relative paths against the real home and working
/// directories.
///
/// The home directory is only looked up when `raw` actually starts with `~`.
pub fn expand_path(raw: &str) -> Result<Utf8PathBuf, ConfigError> {
    let home = if raw == "~" || raw.starts_with("~/") {
        Some(home_dir()?)
    } else {
        None
    };
    let cwd = current_dir()?;
    expand_path_in(raw, home.as_deref(), &cwd)
}

/// Expands every entry of `raw`, stopping at the first failure.
pub fn expand_paths<I, S>(raw: I) -> Result<Vec<Utf8PathBuf>, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter().map(|p| expand_path(p.as_ref())).collect()
}

/// Pure form of [`expand_path`] with explicit home and working directories.
pub fn expand_path_in(
    raw: &str,
    home: Option<&Utf8Path>,
    cwd: &Utf8Path,
) -> Result<Utf8PathBuf, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidPath {
            path: Utf8PathBuf::from(raw),
            reason: "path is empty".to_owned(),
        });
    }

    let expanded = if trimmed == "~" {
        home.ok_or(ConfigError::NoHomeDir)?.to_owned()
    } else if let Some(rest) = trimmed.strip_prefix("~/") {
        home.ok_or(ConfigError::NoHomeDir)?.join(rest)
    } else if trimmed.starts_with('~') {
        // `~user/...` would need a passwd lookup
        return Err(ConfigError::InvalidPath {
            path: Utf8PathBuf::from(trimmed),
            reason: "only `~` and `~/` home prefixes are supported".to_owned(),
        });
    } else {
        Utf8PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(normalize(&expanded))
    } else {
        Ok(normalize(&cwd.join(expanded)))
    }
}

/// Lexically removes `.` and `..` components without touching the filesystem.
fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    use camino::Utf8Component;

    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_str()),
        }
    }
    out
}

/// Returns the existing well-known project directories under the home
/// directory, or the current directory when none exist.
pub fn smart_default_roots() -> Result<Vec<Utf8PathBuf>, ConfigError> {
    let cwd = current_dir()?;
    match home_dir() {
        Ok(home) => Ok(smart_default_roots_in(&home, &cwd)),
        Err(e) => {
            tracing::debug!(error = %e, "No home directory, defaulting to current directory");
            Ok(vec![cwd])
        }
    }
}

/// Pure form of [`smart_default_roots`].
pub fn smart_default_roots_in(home: &Utf8Path, cwd: &Utf8Path) -> Vec<Utf8PathBuf> {
    let found: Vec<Utf8PathBuf> = SMART_DEFAULT_DIRS
        .iter()
        .map(|dir| home.join(dir))
        .filter(|dir| dir.is_dir())
        .collect();

    if found.is_empty() {
        vec![cwd.to_owned()]
    } else {
        found
    }
}
