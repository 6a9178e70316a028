//! Host capability traits
//!
//! `NoteExtractor` never touches files, panes, or editors directly. The host
//! injects these capabilities so the compose logic can run against the
//! filesystem vault, a terminal, or the in-memory mocks in `test_support`.
//!
//! ## Thread Safety
//!
//! Implementations must be Send + Sync to enable use across async boundaries.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::draft::Metadata;
use crate::error::HostResult;

/// Source of the current local wall time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// A note created through `FilePersistence`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileHandle {
    /// Path relative to the vault root, using `/` separators
    pub path: String,
}

impl FileHandle {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// File name without folder or extension
    pub fn basename(&self) -> &str {
        let name = self.path.rsplit('/').next().unwrap_or(&self.path);
        match name.rfind('.') {
            Some(0) | None => name,
            Some(idx) => &name[..idx],
        }
    }
}

/// Where a newly created note is displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// A new tab next to the source note
    #[default]
    Tab,
    /// A split pane beside the source note
    Split,
}

impl Placement {
    pub fn as_str(self) -> &'static str {
        match self {
            Placement::Tab => "tab",
            Placement::Split => "split",
        }
    }
}

/// How `PaneManager::open` should show the note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneOptions {
    pub placement: Placement,
    /// Move focus to the new pane after opening
    pub activate: bool,
}

impl Default for PaneOptions {
    fn default() -> Self {
        Self {
            placement: Placement::Tab,
            activate: true,
        }
    }
}

/// Creates and reads note files
#[async_trait]
pub trait FilePersistence: Send + Sync {
    /// Create a new note; fails with `HostError::AlreadyExists` if `name` is taken
    async fn create(&self, name: &str, body: &str) -> HostResult<FileHandle>;

    /// Read the full text of a note
    async fn read(&self, file: &FileHandle) -> HostResult<String>;
}

/// Merges key/value entries into a note's front matter
#[async_trait]
pub trait MetadataWriter: Send + Sync {
    async fn apply(&self, file: &FileHandle, metadata: &Metadata) -> HostResult<()>;
}

/// Displays notes to the user
#[async_trait]
pub trait PaneManager: Send + Sync {
    async fn open(&self, file: &FileHandle, options: PaneOptions) -> HostResult<()>;

    /// Select a byte range of an open note
    async fn select(&self, file: &FileHandle, range: Range<usize>) -> HostResult<()>;
}

/// The user's current selection in the originating note
#[async_trait]
pub trait SelectionSource: Send + Sync {
    /// Raw selected text, untrimmed
    async fn selection(&self) -> HostResult<String>;

    /// Display name of the note the selection came from, if it has a backing file
    fn source_name(&self) -> Option<String>;

    /// Overwrite the selection with `text`
    async fn replace(&self, text: &str) -> HostResult<()>;
}
