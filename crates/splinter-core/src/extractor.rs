//! Unique-note extraction
//!
//! `plan` is the pure transform: selection, parent name, template and a clock
//! reading in; draft and replacement out. `NoteExtractor::extract` runs the
//! full sequence against injected host capabilities:
//!
//! 1. read the selection and derive a title (no title, no extraction)
//! 2. compute the whole `Extraction` before touching any file
//! 3. create the note, then merge its metadata
//! 4. replace the selection with the back-link
//! 5. open the note and pre-select the parent link
//!
//! There is no rollback. If merging metadata fails, the created note stays.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::draft::{Extraction, NoteDraft, ReplacementText};
use crate::error::{ExtractError, ExtractResult};
use crate::template::NoteTemplate;
use crate::timestamp::TimestampId;
use crate::title::derive_title;
use crate::traits::{
    Clock, FileHandle, FilePersistence, MetadataWriter, PaneManager, PaneOptions, SelectionSource,
};

/// Compose a new note from a selection
///
/// `selection` is trimmed here; `parent_name` is the display name of the
/// source note, if it has one.
pub fn plan(
    template: NoteTemplate,
    selection: &str,
    parent_name: Option<&str>,
    now: &NaiveDateTime,
) -> Extraction {
    let selection = selection.trim();
    let title = derive_title(selection);
    let id = TimestampId::from_datetime(now);

    let composed = template.compose(selection, title.as_deref(), parent_name);
    let replacement = ReplacementText::new(id.clone(), title.clone());

    Extraction {
        title,
        draft: NoteDraft {
            id,
            body: composed.body,
            metadata: composed.metadata,
            parent_link: composed.parent_link,
        },
        replacement,
    }
}

/// Settings for one extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    pub template: NoteTemplate,
    /// Vault-relative folder for new notes; empty means the vault root
    pub folder: String,
    pub extension: String,
    pub pane: PaneOptions,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            template: NoteTemplate::default(),
            folder: String::new(),
            extension: "md".to_string(),
            pane: PaneOptions::default(),
        }
    }
}

impl ExtractOptions {
    /// Vault-relative path for a note with this id
    pub fn note_path(&self, id: &TimestampId) -> String {
        let file_name = id.file_name(&self.extension);
        let folder = self.folder.trim_matches('/');
        if folder.is_empty() {
            file_name
        } else {
            format!("{folder}/{file_name}")
        }
    }
}

/// Result of a completed extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractOutcome {
    pub file: FileHandle,
    pub title: Option<String>,
    pub draft: NoteDraft,
    pub replacement: ReplacementText,
}

/// Extracts selections into new notes through host capabilities
#[derive(Clone)]
pub struct NoteExtractor {
    options: ExtractOptions,
    clock: Arc<dyn Clock>,
    files: Arc<dyn FilePersistence>,
    metadata: Arc<dyn MetadataWriter>,
    panes: Arc<dyn PaneManager>,
}

impl NoteExtractor {
    pub fn new(
        options: ExtractOptions,
        clock: Arc<dyn Clock>,
        files: Arc<dyn FilePersistence>,
        metadata: Arc<dyn MetadataWriter>,
        panes: Arc<dyn PaneManager>,
    ) -> Self {
        Self {
            options,
            clock,
            files,
            metadata,
            panes,
        }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Whether a raw selection can be extracted
    pub fn is_available(selection: &str) -> bool {
        derive_title(selection).is_some()
    }

    /// Plan an extraction at the current clock reading
    pub fn plan(&self, selection: &str, parent_name: Option<&str>) -> Extraction {
        plan(
            self.options.template,
            selection,
            parent_name,
            &self.clock.now(),
        )
    }

    /// Extract the current selection into a new note
    pub async fn extract(&self, source: &dyn SelectionSource) -> ExtractResult<ExtractOutcome> {
        let selection = source.selection().await?;
        if !Self::is_available(&selection) {
            debug!("selection has no usable title");
            return Err(ExtractError::Unavailable);
        }

        let parent_name = source.source_name();
        let Extraction {
            title,
            draft,
            replacement,
        } = self.plan(&selection, parent_name.as_deref());

        let path = self.options.note_path(&draft.id);
        debug!(
            id = %draft.id,
            path = %path,
            template = %self.options.template,
            parent = ?parent_name,
            "planned extraction"
        );

        let file = self.files.create(&path, &draft.body).await?;
        info!(path = %file.path, "created note");

        if !draft.metadata.is_empty() {
            if let Err(e) = self.metadata.apply(&file, &draft.metadata).await {
                warn!(path = %file.path, error = %e, "metadata merge failed, note left in place");
                return Err(e.into());
            }
        }

        source.replace(&replacement.to_string()).await?;
        self.panes.open(&file, self.options.pane).await?;

        if let Some(link) = &draft.parent_link {
            self.select_parent_link(&file, link).await;
        }

        Ok(ExtractOutcome {
            file,
            title,
            draft,
            replacement,
        })
    }

    /// Pre-select the parent link in the new note; failures only log
    async fn select_parent_link(&self, file: &FileHandle, link: &str) {
        let content = match self.files.read(file).await {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %file.path, error = %e, "could not read new note to select parent link");
                return;
            }
        };

        let Some(start) = content.find(link) else {
            error!(
                path = %file.path,
                content = %content,
                link_to_parent = %link,
                "could not find link to parent in new note"
            );
            return;
        };

        if let Err(e) = self.panes.select(file, start..start + link.len()).await {
            warn!(path = %file.path, error = %e, "could not select parent link");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HostError;
    use crate::test_support::mocks::{
        Call, FixedClock, MockFiles, MockMetadata, MockPanes, MockSelection,
    };
    use crate::traits::Placement;
    use serde_json::json;

    fn now() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    struct Harness {
        clock: Arc<FixedClock>,
        files: Arc<MockFiles>,
        metadata: Arc<MockMetadata>,
        panes: Arc<MockPanes>,
        extractor: NoteExtractor,
    }

    fn harness(options: ExtractOptions) -> Harness {
        let files = Arc::new(MockFiles::new());
        let metadata = Arc::new(MockMetadata::new(files.clone()));
        let panes = Arc::new(MockPanes::new(files.log()));
        let clock = Arc::new(FixedClock::new(now()));
        let extractor = NoteExtractor::new(
            options,
            clock.clone(),
            files.clone(),
            metadata.clone(),
            panes.clone(),
        );
        Harness {
            clock,
            files,
            metadata,
            panes,
            extractor,
        }
    }

    #[test]
    fn test_plan_link_target_matches_draft_id() {
        let extraction = plan(NoteTemplate::Heading, "My Title\nbody text", None, &now());
        assert_eq!(extraction.draft.id.as_str(), "20240601093000");
        assert_eq!(extraction.replacement.to_string(), "[[20240601093000|My Title]]");
        assert_eq!(extraction.replacement.target, extraction.draft.id);
        assert_eq!(extraction.title.as_deref(), Some("My Title"));
    }

    #[test]
    fn test_plan_parent_link_inclusion() {
        let extraction = plan(NoteTemplate::Heading, "Idea", Some("2024 Planning"), &now());
        assert!(extraction.draft.body.starts_with("# [[2024 Planning]]: "));
    }

    #[test]
    fn test_plan_trims_selection() {
        let extraction = plan(NoteTemplate::Heading, "  \n Title  \n", None, &now());
        assert_eq!(extraction.draft.body, "# Title\n");
    }

    #[test]
    fn test_plan_without_title_uses_bare_link() {
        let extraction = plan(NoteTemplate::HeadingWithTag, "[[]]\nbody", None, &now());
        assert!(extraction.title.is_none());
        assert_eq!(extraction.replacement.to_string(), "[[20240601093000]]");
        assert_eq!(extraction.draft.metadata.get("tags"), Some(&json!(["daily-inbox"])));
        assert!(!extraction.draft.metadata.contains_key("aliases"));
    }

    #[test]
    fn test_is_available() {
        assert!(NoteExtractor::is_available("Title"));
        assert!(!NoteExtractor::is_available(""));
        assert!(!NoteExtractor::is_available("  \n  "));
    }

    #[test]
    fn test_note_path_with_folder() {
        let options = ExtractOptions {
            folder: "/inbox/".to_string(),
            ..Default::default()
        };
        let id = TimestampId::from_datetime(&now());
        assert_eq!(options.note_path(&id), "inbox/20240601093000.md");
        assert_eq!(ExtractOptions::default().note_path(&id), "20240601093000.md");
    }

    #[tokio::test]
    async fn test_extract_full_sequence() {
        let h = harness(ExtractOptions::default());
        let source = MockSelection::new("  My Title\nbody text  ", Some("2024 Planning"), h.files.log());

        let outcome = h.extractor.extract(&source).await.unwrap();

        assert_eq!(outcome.file.path, "20240601093000.md");
        assert_eq!(outcome.file.basename(), outcome.draft.id.as_str());
        assert_eq!(source.replaced().as_deref(), Some("[[20240601093000|My Title]]"));

        let stored = h.files.contents("20240601093000.md").unwrap();
        assert!(stored.contains("# [[2024 Planning]]: My Title\nbody text\n"));
        assert_eq!(h.metadata.applied().len(), 1);

        let calls = h.files.calls();
        assert_eq!(
            calls,
            vec![
                Call::Create("20240601093000.md".to_string()),
                Call::Apply("20240601093000.md".to_string()),
                Call::Replace("[[20240601093000|My Title]]".to_string()),
                Call::Open("20240601093000.md".to_string(), Placement::Tab, true),
                Call::Read("20240601093000.md".to_string()),
                Call::Select("20240601093000.md".to_string()),
            ]
        );

        let selected = h.panes.selections();
        let range = selected[0].1.clone();
        assert_eq!(&stored[range], "[[2024 Planning]]: ");
    }

    #[tokio::test]
    async fn test_extract_unavailable_touches_nothing() {
        let h = harness(ExtractOptions::default());
        let source = MockSelection::new("   ", Some("Parent"), h.files.log());

        let err = h.extractor.extract(&source).await.unwrap_err();
        assert!(err.is_unavailable());
        assert!(h.files.calls().is_empty());
        assert!(source.replaced().is_none());
    }

    #[tokio::test]
    async fn test_extract_without_parent_skips_selection() {
        let h = harness(ExtractOptions::default());
        let source = MockSelection::new("Lonely", None, h.files.log());

        h.extractor.extract(&source).await.unwrap();

        assert!(h.panes.selections().is_empty());
        assert!(!h.files.calls().iter().any(|c| matches!(c, Call::Read(_))));
    }

    #[tokio::test]
    async fn test_extract_inline_template_skips_metadata_writer() {
        let h = harness(ExtractOptions {
            template: NoteTemplate::FrontMatterReview,
            pane: PaneOptions {
                placement: Placement::Split,
                activate: false,
            },
            ..Default::default()
        });
        let source = MockSelection::new("Review me", Some("Parent"), h.files.log());

        h.extractor.extract(&source).await.unwrap();

        assert!(h.metadata.applied().is_empty());
        assert!(h.files.calls().contains(&Call::Open(
            "20240601093000.md".to_string(),
            Placement::Split,
            false
        )));
    }

    #[tokio::test]
    async fn test_extract_collision_propagates() {
        let h = harness(ExtractOptions::default());
        h.files.seed("20240601093000.md", "existing");
        let source = MockSelection::new("Title", None, h.files.log());

        let err = h.extractor.extract(&source).await.unwrap_err();
        assert!(matches!(err, ExtractError::Host(HostError::AlreadyExists(_))));
        assert_eq!(h.files.contents("20240601093000.md").as_deref(), Some("existing"));
        assert!(source.replaced().is_none());
    }

    #[tokio::test]
    async fn test_extract_metadata_failure_leaves_note_and_selection() {
        let h = harness(ExtractOptions::default());
        h.metadata.fail_with("disk full");
        let source = MockSelection::new("Title", None, h.files.log());

        let err = h.extractor.extract(&source).await.unwrap_err();
        assert!(matches!(err, ExtractError::Host(HostError::Metadata(_))));

        // Orphaned note, untouched selection
        assert!(h.files.contents("20240601093000.md").is_some());
        assert!(source.replaced().is_none());
    }

    #[tokio::test]
    async fn test_extract_missing_parent_link_is_not_fatal() {
        let h = harness(ExtractOptions::default());
        h.files.rewrite_on_create("rewritten by another tool\n");
        let source = MockSelection::new("Title", Some("Parent"), h.files.log());

        let outcome = h.extractor.extract(&source).await.unwrap();

        assert_eq!(outcome.draft.parent_link.as_deref(), Some("[[Parent]]: "));
        assert!(h.panes.selections().is_empty());
        assert_eq!(source.replaced().as_deref(), Some("[[20240601093000|Title]]"));
    }

    #[tokio::test]
    async fn test_extract_on_later_second_gets_new_id() {
        let h = harness(ExtractOptions::default());
        let first = MockSelection::new("First", None, h.files.log());
        let second = MockSelection::new("Second", None, h.files.log());

        let a = h.extractor.extract(&first).await.unwrap();
        h.clock.set(now() + chrono::Duration::seconds(1));
        let b = h.extractor.extract(&second).await.unwrap();

        assert_eq!(a.file.path, "20240601093000.md");
        assert_eq!(b.file.path, "20240601093001.md");
        assert!(a.draft.id < b.draft.id);
        assert_eq!(second.replaced().as_deref(), Some("[[20240601093001|Second]]"));
        assert!(h.files.contents("20240601093000.md").unwrap().contains("# First\n"));
    }

    #[tokio::test]
    async fn test_extract_read_back_failure_is_not_fatal() {
        let h = harness(ExtractOptions::default());
        h.files.fail_reads();
        let source = MockSelection::new("Title", Some("Parent"), h.files.log());

        let outcome = h.extractor.extract(&source).await.unwrap();

        assert_eq!(outcome.file.path, "20240601093000.md");
        assert_eq!(source.replaced().as_deref(), Some("[[20240601093000|Title]]"));
        assert!(h.panes.selections().is_empty());
        let calls = h.files.calls();
        assert!(calls.contains(&Call::Read("20240601093000.md".to_string())));
        assert!(!calls.iter().any(|c| matches!(c, Call::Select(_))));
    }

    #[tokio::test]
    async fn test_extract_select_failure_is_not_fatal() {
        let h = harness(ExtractOptions::default());
        h.panes.fail_selects();
        let source = MockSelection::new("Title", Some("Parent"), h.files.log());

        let outcome = h.extractor.extract(&source).await.unwrap();

        assert_eq!(outcome.draft.parent_link.as_deref(), Some("[[Parent]]: "));
        assert_eq!(source.replaced().as_deref(), Some("[[20240601093000|Title]]"));
        assert!(h.panes.selections().is_empty());
        assert_eq!(
            h.files.calls().last(),
            Some(&Call::Select("20240601093000.md".to_string()))
        );
    }
}
