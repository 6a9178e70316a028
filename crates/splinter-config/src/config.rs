//! Configuration sections

use serde::{Deserialize, Serialize};
use splinter_core::{ExtractOptions, NoteTemplate, PaneOptions, Placement};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplinterConfig {
    pub vault: VaultConfig,
    pub extract: ExtractConfig,
    pub open: OpenConfig,
    pub logging: LoggingConfig,
}

/// Vault configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Path to the vault directory
    pub path: PathBuf,
}

/// How new notes are named and laid out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub template: NoteTemplate,
    /// Vault-relative folder for new notes, empty for the vault root
    pub folder: String,
    pub extension: String,
}

/// Where new notes are displayed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenConfig {
    pub placement: Placement,
    pub activate: bool,
    /// Editor command for `--edit`; falls back to `$EDITOR`, then `vi`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter level (off, error, warn, info, debug, trace)
    pub level: String,
}

impl Default for SplinterConfig {
    fn default() -> Self {
        Self {
            vault: VaultConfig::default(),
            extract: ExtractConfig::default(),
            open: OpenConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            path: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            template: NoteTemplate::Heading,
            folder: String::new(),
            extension: "md".to_string(),
        }
    }
}

impl Default for OpenConfig {
    fn default() -> Self {
        Self {
            placement: Placement::Tab,
            activate: true,
            editor: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl OpenConfig {
    /// Editor command, resolved against `$EDITOR`
    pub fn editor_command(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| "vi".to_string())
    }
}

impl SplinterConfig {
    /// Extractor settings derived from this configuration
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            template: self.extract.template,
            folder: self.extract.folder.clone(),
            extension: self.extract.extension.clone(),
            pane: PaneOptions {
                placement: self.open.placement,
                activate: self.open.activate,
            },
        }
    }
}
