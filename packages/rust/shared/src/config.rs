//! Application configuration for ldcontext.
//!
//! Config is looked up in this order: an explicit path, `<root>/ldcontext.toml`,
//! then `~/.ldcontext/ldcontext.toml`. CLI flags override config file values,
//! which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LdContextError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "ldcontext.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".ldcontext";

// ---------------------------------------------------------------------------
// Config structs (matching ldcontext.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where to look for Turtle files.
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// How to render the context document.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[discovery]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Subdirectories of the root to search. Empty means the whole root.
    #[serde(default = "default_subdirs")]
    pub subdirs: Vec<String>,

    /// Entry that must exist directly under the root.
    #[serde(default = "default_root_marker")]
    pub root_marker: String,

    /// Paths containing any of these substrings are skipped.
    #[serde(default = "default_exclude_markers")]
    pub exclude_markers: Vec<String>,

    /// Files with exactly these names are skipped.
    #[serde(default = "default_exclude_files")]
    pub exclude_files: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            subdirs: default_subdirs(),
            root_marker: default_root_marker(),
            exclude_markers: default_exclude_markers(),
            exclude_files: default_exclude_files(),
        }
    }
}

fn default_subdirs() -> Vec<String> {
    vec!["ontology".into()]
}
fn default_root_marker() -> String {
    ".git".into()
}
fn default_exclude_markers() -> Vec<String> {
    // CI validation artifacts
    vec![".check-".into()]
}
fn default_exclude_files() -> Vec<String> {
    // Legacy aggregate file; its serialization drops supplementary prefixes.
    vec!["uco.ttl".into()]
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print the JSON document.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the user config directory (`~/.ldcontext/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| LdContextError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the user config file (`~/.ldcontext/ldcontext.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Resolve and load the config for a run rooted at `root`.
///
/// An explicit path must exist. Otherwise the first existing file among
/// `<root>/ldcontext.toml` and the user config file wins; if none exists the
/// defaults are returned.
pub fn load_config(explicit: Option<&Path>, root: &Path) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    let project_file = root.join(CONFIG_FILE_NAME);
    if project_file.is_file() {
        return load_config_from(&project_file);
    }

    // A missing home directory is not an error here, only for `init_config`.
    if let Ok(user_file) = config_file_path() {
        if user_file.is_file() {
            return load_config_from(&user_file);
        }
    }

    tracing::debug!(root = %root.display(), "no config file found, using defaults");
    Ok(AppConfig::default())
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| LdContextError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        LdContextError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    tracing::debug!(path = %path.display(), "loaded config file");
    validate_config(&config)?;
    Ok(config)
}

/// Reject values that would make discovery meaningless.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.discovery.root_marker.trim().is_empty() {
        return Err(LdContextError::config("discovery.root_marker must not be empty"));
    }
    if config.discovery.exclude_markers.iter().any(|m| m.is_empty()) {
        return Err(LdContextError::config(
            "discovery.exclude_markers must not contain empty strings",
        ));
    }
    Ok(())
}

/// Create the user config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| LdContextError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| LdContextError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| LdContextError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
