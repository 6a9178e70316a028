//! Mock Implementations for Testing
//!
//! Every mock appends to a shared call log so tests can assert the order in
//! which `NoteExtractor` drives the host:
//!
//! ```rust,ignore
//! use splinter_core::test_support::mocks::{Call, MockFiles, MockSelection};
//! use splinter_core::{FilePersistence, SelectionSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let files = MockFiles::new();
//! let source = MockSelection::new("Title", None, files.log());
//!
//! files.create("a.md", "# Title\n").await?;
//! source.replace("[[a|Title]]").await?;
//!
//! assert_eq!(files.calls()[0], Call::Create("a.md".to_string()));
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::{Arc, Mutex};

use crate::draft::Metadata;
use crate::error::{HostError, HostResult};
use crate::frontmatter;
use crate::traits::{
    Clock, FileHandle, FilePersistence, MetadataWriter, PaneManager, PaneOptions, Placement,
    SelectionSource,
};

/// One recorded host call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(String),
    Read(String),
    Apply(String),
    Open(String, Placement, bool),
    Select(String),
    Replace(String),
}

/// Shared, ordered call log
pub type CallLog = Arc<Mutex<Vec<Call>>>;

fn record(log: &CallLog, call: Call) {
    if let Ok(mut calls) = log.lock() {
        calls.push(call);
    }
}

// ============================================================================
// Clock
// ============================================================================

/// Clock that always returns the same reading
#[derive(Debug, Clone)]
pub struct FixedClock {
    at: Arc<Mutex<NaiveDateTime>>,
}

impl FixedClock {
    pub fn new(at: NaiveDateTime) -> Self {
        Self {
            at: Arc::new(Mutex::new(at)),
        }
    }

    pub fn set(&self, at: NaiveDateTime) {
        if let Ok(mut current) = self.at.lock() {
            *current = at;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.at.lock().expect("clock lock")
    }
}

// ============================================================================
// File persistence
// ============================================================================

#[derive(Default)]
struct FilesState {
    files: HashMap<String, String>,
    rewrite_on_create: Option<String>,
    fail_reads: bool,
}

/// In-memory note store
pub struct MockFiles {
    state: Mutex<FilesState>,
    log: CallLog,
}

impl MockFiles {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FilesState::default()),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Call log shared with the other mocks
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.lock().expect("log lock").clone()
    }

    /// Add a file without recording a call
    pub fn seed(&self, path: &str, content: &str) {
        let mut state = self.state.lock().expect("files lock");
        state.files.insert(path.to_string(), content.to_string());
    }

    /// Store `content` instead of the requested body on the next create
    pub fn rewrite_on_create(&self, content: &str) {
        self.state.lock().expect("files lock").rewrite_on_create = Some(content.to_string());
    }

    /// Make every later `read` fail with `HostError::Io`
    pub fn fail_reads(&self) {
        self.state.lock().expect("files lock").fail_reads = true;
    }

    pub fn contents(&self, path: &str) -> Option<String> {
        self.state.lock().expect("files lock").files.get(path).cloned()
    }

    fn write(&self, path: &str, content: String) {
        self.state
            .lock()
            .expect("files lock")
            .files
            .insert(path.to_string(), content);
    }
}

impl Default for MockFiles {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FilePersistence for MockFiles {
    async fn create(&self, name: &str, body: &str) -> HostResult<FileHandle> {
        record(&self.log, Call::Create(name.to_string()));
        let mut state = self.state.lock().expect("files lock");
        if state.files.contains_key(name) {
            return Err(HostError::AlreadyExists(name.to_string()));
        }
        let content = state
            .rewrite_on_create
            .take()
            .unwrap_or_else(|| body.to_string());
        state.files.insert(name.to_string(), content);
        Ok(FileHandle::new(name))
    }

    async fn read(&self, file: &FileHandle) -> HostResult<String> {
        record(&self.log, Call::Read(file.path.clone()));
        if self.state.lock().expect("files lock").fail_reads {
            return Err(HostError::Io(std::io::Error::other("read refused")));
        }
        self.contents(&file.path)
            .ok_or_else(|| HostError::NotFound(file.path.clone()))
    }
}

// ============================================================================
// Metadata writer
// ============================================================================

/// Merges front matter into `MockFiles`, or fails on demand
pub struct MockMetadata {
    files: Arc<MockFiles>,
    applied: Mutex<Vec<(String, Metadata)>>,
    failure: Mutex<Option<String>>,
}

impl MockMetadata {
    pub fn new(files: Arc<MockFiles>) -> Self {
        Self {
            files,
            applied: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    /// Make every later `apply` fail with `HostError::Metadata`
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().expect("failure lock") = Some(message.to_string());
    }

    pub fn applied(&self) -> Vec<(String, Metadata)> {
        self.applied.lock().expect("applied lock").clone()
    }
}

#[async_trait]
impl MetadataWriter for MockMetadata {
    async fn apply(&self, file: &FileHandle, metadata: &Metadata) -> HostResult<()> {
        record(&self.files.log, Call::Apply(file.path.clone()));
        if let Some(message) = self.failure.lock().expect("failure lock").clone() {
            return Err(HostError::Metadata(message));
        }

        let current = self
            .files
            .contents(&file.path)
            .ok_or_else(|| HostError::NotFound(file.path.clone()))?;
        self.files
            .write(&file.path, frontmatter::merge(&current, metadata)?);
        self.applied
            .lock()
            .expect("applied lock")
            .push((file.path.clone(), metadata.clone()));
        Ok(())
    }
}

// ============================================================================
// Panes
// ============================================================================

/// Records opened notes and selections
pub struct MockPanes {
    log: CallLog,
    opened: Mutex<Vec<(String, PaneOptions)>>,
    selections: Mutex<Vec<(String, Range<usize>)>>,
    fail_selects: Mutex<bool>,
}

impl MockPanes {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            opened: Mutex::new(Vec::new()),
            selections: Mutex::new(Vec::new()),
            fail_selects: Mutex::new(false),
        }
    }

    /// Make every later `select` fail
    pub fn fail_selects(&self) {
        *self.fail_selects.lock().expect("fail lock") = true;
    }

    pub fn opened(&self) -> Vec<(String, PaneOptions)> {
        self.opened.lock().expect("opened lock").clone()
    }

    pub fn selections(&self) -> Vec<(String, Range<usize>)> {
        self.selections.lock().expect("selections lock").clone()
    }
}

#[async_trait]
impl PaneManager for MockPanes {
    async fn open(&self, file: &FileHandle, options: PaneOptions) -> HostResult<()> {
        record(
            &self.log,
            Call::Open(file.path.clone(), options.placement, options.activate),
        );
        self.opened
            .lock()
            .expect("opened lock")
            .push((file.path.clone(), options));
        Ok(())
    }

    async fn select(&self, file: &FileHandle, range: Range<usize>) -> HostResult<()> {
        record(&self.log, Call::Select(file.path.clone()));
        if *self.fail_selects.lock().expect("fail lock") {
            return Err(HostError::Other("pane closed".to_string()));
        }
        self.selections
            .lock()
            .expect("selections lock")
            .push((file.path.clone(), range));
        Ok(())
    }
}

// ============================================================================
// Selection
// ============================================================================

/// Fixed selection that remembers its replacement
pub struct MockSelection {
    text: String,
    source_name: Option<String>,
    replaced: Mutex<Option<String>>,
    log: CallLog,
}

impl MockSelection {
    pub fn new(text: &str, source_name: Option<&str>, log: CallLog) -> Self {
        Self {
            text: text.to_string(),
            source_name: source_name.map(str::to_string),
            replaced: Mutex::new(None),
            log,
        }
    }

    pub fn replaced(&self) -> Option<String> {
        self.replaced.lock().expect("replaced lock").clone()
    }
}

#[async_trait]
impl SelectionSource for MockSelection {
    async fn selection(&self) -> HostResult<String> {
        Ok(self.text.clone())
    }

    fn source_name(&self) -> Option<String> {
        self.source_name.clone()
    }

    async fn replace(&self, text: &str) -> HostResult<()> {
        record(&self.log, Call::Replace(text.to_string()));
        *self.replaced.lock().expect("replaced lock") = Some(text.to_string());
        Ok(())
    }
}
