//! Filesystem host
//!
//! A vault is a directory of markdown notes. `FsVault` creates notes and
//! merges front matter under that root; `FileSelection` treats a line range of
//! an existing note as the user's selection; `BufferSelection` holds a
//! selection that came from somewhere else (stdin, an editor pipe).

use async_trait::async_trait;
use std::io::ErrorKind;
use std::ops::Range;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::draft::Metadata;
use crate::error::{HostError, HostResult};
use crate::frontmatter;
use crate::traits::{FileHandle, FilePersistence, MetadataWriter, SelectionSource};

/// Resolve a vault-relative path, rejecting absolute paths and `..`
fn resolve_within(root: &Path, relative: &str) -> HostResult<PathBuf> {
    let candidate = Path::new(relative);
    if relative.trim().is_empty() {
        return Err(HostError::InvalidPath("empty path".to_string()));
    }
    for component in candidate.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(HostError::InvalidPath(format!(
                    "Path traversal is not allowed: {relative}"
                )))
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(HostError::InvalidPath(format!(
                    "Absolute paths are not allowed: {relative}"
                )))
            }
        }
    }
    Ok(root.join(candidate))
}

fn map_not_found(e: std::io::Error, path: &str) -> HostError {
    if e.kind() == ErrorKind::NotFound {
        HostError::NotFound(path.to_string())
    } else {
        HostError::Io(e)
    }
}

/// A vault rooted at a directory
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a vault-relative note path
    pub fn full_path(&self, relative: &str) -> HostResult<PathBuf> {
        resolve_within(&self.root, relative)
    }

    async fn write(&self, relative: &str, content: &str) -> HostResult<()> {
        let path = self.full_path(relative)?;
        fs::write(&path, content)
            .await
            .map_err(|e| map_not_found(e, relative))
    }
}

#[async_trait]
impl FilePersistence for FsVault {
    async fn create(&self, name: &str, body: &str) -> HostResult<FileHandle> {
        let path = self.full_path(name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::AlreadyExists {
                    HostError::AlreadyExists(name.to_string())
                } else {
                    HostError::Io(e)
                }
            })?;
        file.write_all(body.as_bytes()).await?;
        file.flush().await?;

        debug!(path = %path.display(), bytes = body.len(), "wrote note");
        Ok(FileHandle::new(name.replace('\\', "/")))
    }

    async fn read(&self, file: &FileHandle) -> HostResult<String> {
        let path = self.full_path(&file.path)?;
        fs::read_to_string(&path)
            .await
            .map_err(|e| map_not_found(e, &file.path))
    }
}

#[async_trait]
impl MetadataWriter for FsVault {
    async fn apply(&self, file: &FileHandle, metadata: &Metadata) -> HostResult<()> {
        let current = self.read(file).await?;
        let merged = frontmatter::merge(&current, metadata)?;
        self.write(&file.path, &merged).await
    }
}

/// Byte range covering lines `start..=end` (1-indexed), without the final line break
pub fn line_span(content: &str, start: usize, end: usize) -> Option<Range<usize>> {
    if start == 0 || end < start {
        return None;
    }

    let mut offset = 0;
    let mut span_start = None;
    for (idx, line) in content.split_inclusive('\n').enumerate() {
        let number = idx + 1;
        if number == start {
            span_start = Some(offset);
        }
        if number == end {
            let text = line.strip_suffix('\n').unwrap_or(line);
            let text = text.strip_suffix('\r').unwrap_or(text);
            return span_start.map(|s| s..offset + text.len());
        }
        offset += line.len();
    }
    None
}

/// Selection made of whole lines of a note in the vault
#[derive(Debug, Clone)]
pub struct FileSelection {
    vault: FsVault,
    source: String,
    lines: (usize, usize),
}

impl FileSelection {
    /// Select lines `start..=end` (1-indexed) of `source`
    pub fn from_lines(vault: FsVault, source: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            vault,
            source: source.into(),
            lines: (start, end),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    async fn load(&self) -> HostResult<(String, Range<usize>)> {
        let handle = FileHandle::new(self.source.clone());
        let content = self.vault.read(&handle).await?;
        let (start, end) = self.lines;
        let span = line_span(&content, start, end).ok_or_else(|| {
            HostError::InvalidSelection(format!(
                "lines {start}:{end} are outside {}",
                self.source
            ))
        })?;
        Ok((content, span))
    }
}

#[async_trait]
impl SelectionSource for FileSelection {
    async fn selection(&self) -> HostResult<String> {
        let (content, span) = self.load().await?;
        Ok(content[span].to_string())
    }

    fn source_name(&self) -> Option<String> {
        let name = FileHandle::new(self.source.replace('\\', "/"))
            .basename()
            .to_string();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    async fn replace(&self, text: &str) -> HostResult<()> {
        let (mut content, span) = self.load().await?;
        content.replace_range(span, text);
        self.vault.write(&self.source, &content).await
    }
}

/// Selection held in memory
#[derive(Debug, Default)]
pub struct BufferSelection {
    text: String,
    source_name: Option<String>,
    replaced: Mutex<Option<String>>,
}

impl BufferSelection {
    pub fn new(text: impl Into<String>, source_name: Option<String>) -> Self {
        Self {
            text: text.into(),
            source_name: source_name.filter(|n| !n.is_empty()),
            replaced: Mutex::new(None),
        }
    }

    /// The replacement written by the extractor, if any
    pub fn replaced(&self) -> Option<String> {
        self.replaced.lock().ok().and_then(|r| r.clone())
    }
}

#[async_trait]
impl SelectionSource for BufferSelection {
    async fn selection(&self) -> HostResult<String> {
        Ok(self.text.clone())
    }

    fn source_name(&self) -> Option<String> {
        self.source_name.clone()
    }

    async fn replace(&self, text: &str) -> HostResult<()> {
        let mut replaced = self
            .replaced
            .lock()
            .map_err(|_| HostError::Other("selection buffer poisoned".to_string()))?;
        *replaced = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_line_span() {
        let content = "one\ntwo\r\nthree\nfour";
        assert_eq!(&content[line_span(content, 1, 1).unwrap()], "one");
        assert_eq!(&content[line_span(content, 2, 3).unwrap()], "two\r\nthree");
        assert_eq!(&content[line_span(content, 4, 4).unwrap()], "four");
        assert!(line_span(content, 0, 1).is_none());
        assert!(line_span(content, 3, 2).is_none());
        assert!(line_span(content, 4, 5).is_none());
    }

    #[test]
    fn test_resolve_rejects_escapes() {
        let root = Path::new("/vault");
        assert!(matches!(
            resolve_within(root, "../etc/passwd"),
            Err(HostError::InvalidPath(_))
        ));
        assert!(matches!(
            resolve_within(root, "/etc/passwd"),
            Err(HostError::InvalidPath(_))
        ));
        assert!(matches!(resolve_within(root, ""), Err(HostError::InvalidPath(_))));
        assert_eq!(
            resolve_within(root, "inbox/a.md").unwrap(),
            PathBuf::from("/vault/inbox/a.md")
        );
    }

    #[tokio::test]
    async fn test_create_and_read() {
        let dir = TempDir::new().unwrap();
        let vault = FsVault::new(dir.path());

        let file = vault.create("inbox/20240101000000.md", "# Hi\n").await.unwrap();
        assert_eq!(file.path, "inbox/20240101000000.md");
        assert_eq!(vault.read(&file).await.unwrap(), "# Hi\n");
    }

    #[tokio::test]
    async fn test_create_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let vault = FsVault::new(dir.path());
        std::fs::write(dir.path().join("taken.md"), "original").unwrap();

        let err = vault.create("taken.md", "new body").await.unwrap_err();
        assert!(matches!(err, HostError::AlreadyExists(_)));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("taken.md")).unwrap(),
            "original"
        );
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let vault = FsVault::new(dir.path());
        let err = vault.read(&FileHandle::new("missing.md")).await.unwrap_err();
        assert!(matches!(err, HostError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_apply_merges_front_matter() {
        let dir = TempDir::new().unwrap();
        let vault = FsVault::new(dir.path());
        let file = vault.create("note.md", "# [[Parent]]: Idea\n").await.unwrap();

        let mut metadata = Metadata::new();
        metadata.insert_list("aliases", ["Idea"]);
        vault.apply(&file, &metadata).await.unwrap();

        let content = vault.read(&file).await.unwrap();
        assert!(content.starts_with("---\n"));
        assert!(content.ends_with("---\n# [[Parent]]: Idea\n"));
        let parsed = frontmatter::parse(&content).unwrap();
        assert_eq!(parsed.get("aliases"), Some(&json!(["Idea"])));
    }

    #[tokio::test]
    async fn test_file_selection_reads_and_replaces_lines() {
        let dir = TempDir::new().unwrap();
        let vault = FsVault::new(dir.path());
        std::fs::create_dir_all(dir.path().join("projects")).unwrap();
        std::fs::write(
            dir.path().join("projects/2024 Planning.md"),
            "# Plan\n\nBig idea\ndetails\n\nTail\n",
        )
        .unwrap();

        let selection = FileSelection::from_lines(vault, "projects/2024 Planning.md", 3, 4);
        assert_eq!(selection.selection().await.unwrap(), "Big idea\ndetails");
        assert_eq!(selection.source_name().as_deref(), Some("2024 Planning"));

        selection.replace("[[20240101000000|Big idea]]").await.unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("projects/2024 Planning.md")).unwrap(),
            "# Plan\n\n[[20240101000000|Big idea]]\n\nTail\n"
        );
    }

    #[tokio::test]
    async fn test_file_selection_out_of_range() {
        let dir = TempDir::new().unwrap();
        let vault = FsVault::new(dir.path());
        std::fs::write(dir.path().join("short.md"), "one line\n").unwrap();

        let selection = FileSelection::from_lines(vault, "short.md", 2, 3);
        let err = selection.selection().await.unwrap_err();
        assert!(matches!(err, HostError::InvalidSelection(_)));
    }

    #[tokio::test]
    async fn test_buffer_selection_records_replacement() {
        let buffer = BufferSelection::new("Title\nbody", Some("Source".to_string()));
        assert_eq!(buffer.selection().await.unwrap(), "Title\nbody");
        assert_eq!(buffer.source_name().as_deref(), Some("Source"));
        assert!(buffer.replaced().is_none());

        buffer.replace("[[1|Title]]").await.unwrap();
        assert_eq!(buffer.replaced().as_deref(), Some("[[1|Title]]"));
    }
}
