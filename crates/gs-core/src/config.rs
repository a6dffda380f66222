//! Configuration for git-scope.
//!
//! The configuration lives in a YAML file, by default
//! `~/.config/git-scope/config.yml`:
//!
//! ```yaml
//! roots:
//!   - ~/code
//!   - ~/work
//! ignore:
//!   - node_modules
//!   - target
//! editor: code
//! scan:
//!   max_concurrency: 16
//!   probe_timeout_secs: 30
//! ```
//!
//! Every key is optional. Missing keys take the values from [`Config::default`],
//! and a missing file yields the defaults with the current directory as the
//! only root.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::paths;

/// Editor command used when none is configured.
pub const DEFAULT_EDITOR: &str = "code";

/// Directory names pruned from every scan unless the config overrides them.
pub const DEFAULT_IGNORE: &[&str] = &[
    "node_modules",
    ".next",
    "dist",
    "build",
    "target",
    ".venv",
    "vendor",
];

/// Directory names pruned when scanning an entire home directory.
///
/// Covers build output, package manager caches, language toolchains, editor
/// extension stores, OS folders, and cloud-sync mounts, all of which contain
/// third-party checkouts the user did not create.
pub const FULL_SCAN_IGNORE: &[&str] = &[
    // build output
    "node_modules",
    ".next",
    "dist",
    "build",
    "target",
    ".output",
    // package managers
    ".npm",
    ".yarn",
    ".pnpm",
    ".bun",
    // toolchains
    ".cargo",
    ".rustup",
    ".go",
    ".venv",
    "vendor",
    ".pyenv",
    ".rbenv",
    ".nvm",
    // system
    ".Trash",
    "Library",
    ".cache",
    ".local",
    // editors
    ".vscode",
    ".vscode-server",
    ".gemini",
    ".cursor",
    ".zed",
    ".atom",
    ".sublime-text",
    ".idea",
    // config
    ".config",
    ".docker",
    ".kube",
    ".ssh",
    ".gnupg",
    // shell and editor plugins
    ".oh-my-zsh",
    ".tmux",
    ".vim",
    ".emacs.d",
    // cloud sync
    "Google Drive",
    "OneDrive",
    "Dropbox",
    "iCloud",
];

const CONFIG_HEADER: &str =
    "# git-scope configuration\n# Edit this file to customize scanning behavior\n\n";

/// Color scheme for the TUI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ColorScheme {
    /// Automatically detect based on terminal settings.
    #[default]
    Auto,
    /// Dark text on a light background.
    Light,
    /// Light text on a dark background.
    Dark,
}

/// Tuning for the scanner.
///
/// # Examples
///
/// ```
/// use gs_core::ScanSettings;
/// use std::time::Duration;
///
/// let settings = ScanSettings::default();
/// assert_eq!(settings.max_concurrency, 16);
/// assert_eq!(settings.probe_timeout(), Some(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Maximum number of repositories probed at the same time.
    pub max_concurrency: usize,

    /// Upper bound in seconds on each git invocation. `0` disables the bound.
    pub probe_timeout_secs: u64,

    /// Whether symlinked directories are followed during traversal.
    pub follow_symlinks: bool,
}

impl ScanSettings {
    /// The probe timeout, or `None` when disabled.
    #[must_use]
    pub const fn probe_timeout(&self) -> Option<Duration> {
        if self.probe_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.probe_timeout_secs))
        }
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_concurrency: 16,
            probe_timeout_secs: 30,
            follow_symlinks: true,
        }
    }
}

/// Configuration for the terminal user interface.
///
/// # Examples
///
/// ```
/// use gs_core::{TuiConfig, ColorScheme};
///
/// let config = TuiConfig::default();
/// assert_eq!(config.tick_rate_ms, 250);
/// assert_eq!(config.color_scheme, ColorScheme::Auto);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Interval between tick events, in milliseconds.
    pub tick_rate_ms: u64,

    /// Redraw rate in frames per second.
    pub frame_rate: u32,

    /// Color scheme for the interface.
    pub color_scheme: ColorScheme,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            frame_rate: 30,
            color_scheme: ColorScheme::Auto,
        }
    }
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use gs_core::Config;
///
/// let config = Config::from_yaml_str("roots: [/srv/git]\neditor: nvim\n").unwrap();
/// assert_eq!(config.editor, "nvim");
/// assert!(config.ignore.iter().any(|p| p == "node_modules"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directories to scan for repositories.
    pub roots: Vec<Utf8PathBuf>,

    /// Directory names (or glob patterns) pruned from traversal.
    pub ignore: Vec<String>,

    /// Command used to open a repository.
    pub editor: String,

    /// Scanner tuning.
    pub scan: ScanSettings,

    /// Terminal UI settings.
    pub tui: TuiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            ignore: DEFAULT_IGNORE.iter().map(|&s| s.to_owned()).collect(),
            editor: DEFAULT_EDITOR.to_owned(),
            scan: ScanSettings::default(),
            tui: TuiConfig::default(),
        }
    }
}

impl Config {
    /// Default location of the config file.
    ///
    /// `~/.config/git-scope/config.yml`, or `./config.yml` when the home
    /// directory is unknown.
    pub fn default_path() -> Utf8PathBuf {
        paths::home_dir().map_or_else(
            |_| Utf8PathBuf::from("config.yml"),
            |home| home.join(".config").join("git-scope").join("config.yml"),
        )
    }

    /// Returns `true` if a config file exists at `path`.
    pub fn exists(path: &Utf8Path) -> bool {
        path.is_file()
    }

    /// Parses configuration from YAML text without expanding paths.
    ///
    /// Blank input yields the defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(ConfigError::Parse)
    }

    /// Loads configuration from `path`.
    ///
    /// A missing file is not an error. Configured roots are expanded (`~`,
    /// relative paths) and an empty root list becomes the current directory.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(text) => {
                debug!(%path, "Loaded config file");
                Self::from_yaml_str(&text)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(%path, "No config file, using defaults");
                Self::default()
            }
            Err(e) => return Err(ConfigError::io(path, e)),
        };

        config.roots = paths::expand_paths(config.roots.iter().map(|p| p.as_str()))?;
        if config.roots.is_empty() {
            config.roots = paths::expand_paths(["."])?;
        }
        if config.editor.trim().is_empty() {
            config.editor = DEFAULT_EDITOR.to_owned();
        }

        Ok(config)
    }

    /// Writes a new config file at `path` with the given roots and editor.
    ///
    /// Parent directories are created as needed. Any existing file is
    /// replaced.
    pub fn create(
        path: &Utf8Path,
        roots: Vec<Utf8PathBuf>,
        editor: &str,
    ) -> Result<Self, ConfigError> {
        let editor = editor.trim();
        let config = Self {
            roots,
            editor: if editor.is_empty() {
                DEFAULT_EDITOR.to_owned()
            } else {
                editor.to_owned()
            },
            ..Self::default()
        };

        if let Some(dir) = path.parent().filter(|d| !d.as_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| ConfigError::io(dir, e))?;
        }

        let body = serde_yaml::to_string(&config).map_err(ConfigError::Serialize)?;
        std::fs::write(path, format!("{CONFIG_HEADER}{body}"))
            .map_err(|e| ConfigError::io(path, e))?;

        debug!(%path, roots = config.roots.len(), "Wrote config file");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert!(config.roots.is_empty());
        assert_eq!(config.editor, "code");
        assert_eq!(config.ignore.len(), DEFAULT_IGNORE.len());
        assert_eq!(config.scan, ScanSettings::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml_str("editor: hx\nscan:\n  max_concurrency: 4\n").unwrap();
        assert_eq!(config.editor, "hx");
        assert_eq!(config.scan.max_concurrency, 4);
        assert_eq!(config.scan.probe_timeout_secs, 30);
        assert!(config.scan.follow_symlinks);
        assert_eq!(config.tui.tick_rate_ms, 250);
    }

    #[test]
    fn test_explicit_empty_ignore_list() {
        let config = Config::from_yaml_str("ignore: []\n").unwrap();
        assert!(config.ignore.is_empty());
    }

    #[test]
    fn test_blank_yaml_is_default() {
        assert_eq!(Config::from_yaml_str("\n  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let result = Config::from_yaml_str("roots: [unterminated");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_zero_timeout_disables_bound() {
        let settings = ScanSettings {
            probe_timeout_secs: 0,
            ..ScanSettings::default()
        };
        assert_eq!(settings.probe_timeout(), None);
    }

    #[test]
    fn test_color_scheme_serialization() {
        assert_eq!(
            serde_json::to_string(&ColorScheme::Dark).unwrap(),
            r#""dark""#
        );
        let scheme: ColorScheme = serde_yaml::from_str("light").unwrap();
        assert_eq!(scheme, ColorScheme::Light);
    }

    #[test]
    fn test_load_missing_file_uses_cwd() {
        let temp = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(temp.path()).unwrap().join("absent.yml");

        let config = Config::load(&path).unwrap();
        assert_eq!(config.roots.len(), 1);
        assert!(config.roots[0].is_absolute());
    }

    #[test]
    fn test_create_then_load() {
        let temp = tempfile::tempdir().unwrap();
        let dir = Utf8Path::from_path(temp.path()).unwrap();
        let path = dir.join("nested").join("config.yml");

        let created = Config::create(&path, vec![dir.join("code")], "  ").unwrap();
        assert_eq!(created.editor, "code");

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# git-scope configuration"));

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.roots, vec![dir.join("code")]);
        assert_eq!(loaded.ignore, created.ignore);
        assert!(Config::exists(&path));
    }

    #[test]
    fn test_full_scan_ignore_is_superset_of_default() {
        for name in DEFAULT_IGNORE {
            assert!(FULL_SCAN_IGNORE.contains(name), "{name} missing");
        }
    }
}
