//! Application configuration for bibcloud.
//!
//! User config lives at `~/.bibcloud/bibcloud.toml`.
//! CLI flags override config file values, which override defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BibcloudError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "bibcloud.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".bibcloud";

// ---------------------------------------------------------------------------
// Config structs (matching bibcloud.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Stop-word and canonical-mapping overrides.
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Number of most frequent tokens to report.
    #[serde(default = "default_top_words")]
    pub top_words: usize,

    /// Directory receiving `text.txt`, `counts.csv` and `summary.json`.
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            top_words: default_top_words(),
            out_dir: default_out_dir(),
        }
    }
}

fn default_top_words() -> usize {
    200
}
fn default_out_dir() -> String {
    ".".into()
}

/// `[vocabulary]` section.
///
/// With `extend_defaults = true` the lists here are merged over the built-in
/// tables; with `false` they replace them entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// Merge with the built-in tables instead of replacing them.
    #[serde(default = "default_true")]
    pub extend_defaults: bool,

    /// Additional stop words.
    #[serde(default)]
    pub stop_words: Vec<String>,

    /// Additional `raw term -> canonical term` substitutions.
    #[serde(default)]
    pub mappings: BTreeMap<String, String>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            extend_defaults: true,
            stop_words: Vec::new(),
            mappings: BTreeMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.bibcloud/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| BibcloudError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.bibcloud/bibcloud.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BibcloudError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| BibcloudError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BibcloudError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| BibcloudError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BibcloudError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
