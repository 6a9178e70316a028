//! Terminal pane manager
//!
//! A terminal has no tabs or splits of its own. Opening a note records it and,
//! when asked, hands it to the user's editor. Selections are recorded so the
//! command can report where the parent link sits in the new note.

use async_trait::async_trait;
use splinter_core::{FileHandle, HostError, HostResult, PaneManager, PaneOptions};
use std::ops::Range;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::process::Command;
use tracing::{debug, info};

/// Pane manager for the command line
pub struct TerminalPanes {
    vault_root: PathBuf,
    /// Editor command to launch on `open`, if any
    editor: Option<String>,
    opened: Mutex<Vec<(FileHandle, PaneOptions)>>,
    selection: Mutex<Option<Range<usize>>>,
}

impl TerminalPanes {
    pub fn new(vault_root: impl Into<PathBuf>, editor: Option<String>) -> Self {
        Self {
            vault_root: vault_root.into(),
            editor,
            opened: Mutex::new(Vec::new()),
            selection: Mutex::new(None),
        }
    }

    pub fn opened(&self) -> Vec<(FileHandle, PaneOptions)> {
        self.opened.lock().map(|o| o.clone()).unwrap_or_default()
    }

    /// Last selected byte range
    pub fn selection(&self) -> Option<Range<usize>> {
        self.selection.lock().ok().and_then(|s| s.clone())
    }

    async fn launch_editor(&self, editor: &str, file: &FileHandle) -> HostResult<()> {
        let mut parts = editor.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| HostError::Other("empty editor command".to_string()))?;
        let path = self.vault_root.join(&file.path);

        debug!(editor = program, path = %path.display(), "launching editor");
        let status = Command::new(program)
            .args(parts)
            .arg(&path)
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(HostError::Other(format!("editor '{program}' exited with {status}")))
        }
    }
}

#[async_trait]
impl PaneManager for TerminalPanes {
    async fn open(&self, file: &FileHandle, options: PaneOptions) -> HostResult<()> {
        info!(
            path = %file.path,
            placement = options.placement.as_str(),
            activate = options.activate,
            "opening note"
        );
        if let Ok(mut opened) = self.opened.lock() {
            opened.push((file.clone(), options));
        }

        match &self.editor {
            Some(editor) if options.activate => self.launch_editor(editor, file).await,
            Some(_) => {
                debug!(path = %file.path, "not activating, editor skipped");
                Ok(())
            }
            None => Ok(()),
        }
    }

    async fn select(&self, file: &FileHandle, range: Range<usize>) -> HostResult<()> {
        debug!(path = %file.path, start = range.start, end = range.end, "selected range");
        if let Ok(mut selection) = self.selection.lock() {
            *selection = Some(range);
        }
        Ok(())
    }
}
