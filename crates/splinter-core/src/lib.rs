//! Splinter core
//!
//! Turns a selection in a markdown note into a new, uniquely named note and a
//! back-link that replaces the selection. This crate provides:
//! - Timestamp identifiers for new notes (`YYYYMMDDHHMMSS`, local time)
//! - Title derivation with wikilink unwrapping
//! - Configurable note templates
//! - The `NoteExtractor` sequence over injected host capabilities
//! - A filesystem vault host

pub mod draft;
pub mod error;
pub mod extractor;
pub mod frontmatter;
pub mod template;
pub mod timestamp;
pub mod title;
pub mod traits;
pub mod vault;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use draft::{Extraction, Metadata, NoteDraft, ReplacementText};
pub use error::{ExtractError, ExtractResult, HostError, HostResult};
pub use extractor::{plan, ExtractOptions, ExtractOutcome, NoteExtractor};
pub use template::NoteTemplate;
pub use timestamp::{SystemClock, TimestampId};
pub use title::{derive_title, parse_title};
pub use traits::{
    Clock, FileHandle, FilePersistence, MetadataWriter, PaneManager, PaneOptions, Placement,
    SelectionSource,
};
pub use vault::{BufferSelection, FileSelection, FsVault};
