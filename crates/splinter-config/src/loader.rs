//! Configuration loading

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::config::SplinterConfig;

/// Skips the user config file when set
pub const TEST_MODE_ENV: &str = "SPLINTER_TEST_MODE";
/// Overrides the directory holding `config.toml`
pub const CONFIG_DIR_ENV: &str = "SPLINTER_CONFIG_DIR";
pub const VAULT_PATH_ENV: &str = "SPLINTER_VAULT_PATH";
pub const TEMPLATE_ENV: &str = "SPLINTER_TEMPLATE";
pub const LOG_LEVEL_ENV: &str = "SPLINTER_LOG_LEVEL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub vault_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl SplinterConfig {
    /// Load configuration with precedence: defaults < file < env < args
    pub fn load(overrides: ConfigOverrides) -> ConfigResult<Self> {
        let mut config = Self::from_file_or_default(overrides.config_file.clone())?;
        config.apply_env(|key| std::env::var(key).ok())?;

        if let Some(path) = overrides.vault_path {
            config.vault.path = path;
        }
        if let Some(level) = overrides.log_level {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(VAULT_PATH_ENV) {
            self.vault.path = PathBuf::from(path);
        }
        if let Some(template) = lookup(TEMPLATE_ENV) {
            self.extract.template =
                template
                    .parse()
                    .map_err(|message| ConfigError::InvalidValue {
                        key: TEMPLATE_ENV.to_string(),
                        message,
                    })?;
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Get default config file path
    pub fn default_config_path() -> ConfigResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir).join("config.toml"));
        }
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("splinter");
        Ok(config_dir.join("config.toml"))
    }

    /// Read a config file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load config from file or return default
    fn from_file_or_default(config_file: Option<PathBuf>) -> ConfigResult<Self> {
        if let Some(path) = config_file {
            // An explicit file must exist
            return Self::from_file(&path);
        }

        if std::env::var(TEST_MODE_ENV).is_ok() {
            return Ok(Self::default());
        }

        match Self::default_config_path() {
            Ok(path) if path.exists() => {
                debug!(path = %path.display(), "loading config file");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Display the current configuration as TOML
    pub fn display_as_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Create a new config file with example values
    pub fn create_example(path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, EXAMPLE_CONFIG).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Commented example written by `splinter config init`
pub const EXAMPLE_CONFIG: &str = r#"# Splinter Configuration
# Location: ~/.config/splinter/config.toml

[vault]
# Path to your vault
# Default: current directory
path = "/home/user/Documents/my-vault"

[extract]
# Layout of new notes:
#   heading                 # [[parent]]: selection, alias front matter
#   heading-with-tag        heading plus a daily-inbox tag
#   front-matter-review     inline front matter with a review tag
#   review-skeleton         heading plus review sections and tag
#   front-matter-references inline front matter plus a References section
template = "heading"

# Folder for new notes, relative to the vault (empty = vault root)
folder = ""

# File extension of new notes
extension = "md"

[open]
# Where the new note opens: "tab" or "split"
placement = "tab"

# Focus the new note after opening
activate = true

# Editor used by `extract --edit` (default: $EDITOR, then vi)
# editor = "nvim"

[logging]
# off, error, warn, info, debug, trace
level = "warn"
"#;
