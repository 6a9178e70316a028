//! Note templates
//!
//! Each template decides the body of the new note and which metadata the host
//! merges into it afterwards. Front matter templates write their metadata
//! inline at creation time and leave nothing for the host to merge.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::draft::Metadata;
use crate::frontmatter;

/// Tag applied by `NoteTemplate::HeadingWithTag`
pub const DAILY_INBOX_TAG: &str = "daily-inbox";

/// Tag applied by the review templates
pub const REVIEW_TAG: &str = "review";

const REVIEW_SECTIONS: [&str; 3] = ["Inspired notes", "Raw notes", "Source material"];

/// How the new note is laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoteTemplate {
    /// `# [[parent]]: selection`, alias metadata when titled
    #[default]
    Heading,
    /// Heading plus a `daily-inbox` tag
    HeadingWithTag,
    /// Inline front matter with a review tag, no parent link
    FrontMatterReview,
    /// Heading plus empty review sections and a review tag
    ReviewSkeleton,
    /// Inline front matter with a review tag and a `## References` section
    FrontMatterReferences,
}

/// Body and metadata composed by a template
#[derive(Debug, Clone, PartialEq)]
pub struct Composed {
    pub body: String,
    pub metadata: Metadata,
    pub parent_link: Option<String>,
}

impl NoteTemplate {
    pub const ALL: [NoteTemplate; 5] = [
        NoteTemplate::Heading,
        NoteTemplate::HeadingWithTag,
        NoteTemplate::FrontMatterReview,
        NoteTemplate::ReviewSkeleton,
        NoteTemplate::FrontMatterReferences,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NoteTemplate::Heading => "heading",
            NoteTemplate::HeadingWithTag => "heading-with-tag",
            NoteTemplate::FrontMatterReview => "front-matter-review",
            NoteTemplate::ReviewSkeleton => "review-skeleton",
            NoteTemplate::FrontMatterReferences => "front-matter-references",
        }
    }

    /// Whether the heading carries a `[[parent]]: ` prefix
    pub fn links_parent_in_heading(self) -> bool {
        matches!(
            self,
            NoteTemplate::Heading | NoteTemplate::HeadingWithTag | NoteTemplate::ReviewSkeleton
        )
    }

    /// Tags this template always applies
    fn tags(self) -> Option<&'static str> {
        match self {
            NoteTemplate::Heading => None,
            NoteTemplate::HeadingWithTag => Some(DAILY_INBOX_TAG),
            NoteTemplate::FrontMatterReview
            | NoteTemplate::ReviewSkeleton
            | NoteTemplate::FrontMatterReferences => Some(REVIEW_TAG),
        }
    }

    fn inline_front_matter(self) -> bool {
        matches!(
            self,
            NoteTemplate::FrontMatterReview | NoteTemplate::FrontMatterReferences
        )
    }

    /// Compose the note for a trimmed `selection`
    pub fn compose(self, selection: &str, title: Option<&str>, parent: Option<&str>) -> Composed {
        let mut metadata = Metadata::new();
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            metadata.insert_list("aliases", [title]);
        }
        if let Some(tag) = self.tags() {
            metadata.insert_list("tags", [tag]);
        }

        let parent = parent.filter(|p| !p.is_empty());
        let parent_link = if self.links_parent_in_heading() {
            parent.map(|p| format!("[[{p}]]: "))
        } else {
            None
        };

        let mut body = String::new();
        if self.inline_front_matter() {
            match frontmatter::render(&metadata) {
                Ok(block) => {
                    body.push_str(&block);
                    metadata = Metadata::new();
                }
                Err(e) => {
                    // Entries stay in `metadata` for the host to merge
                    warn!(template = self.as_str(), error = %e, "inline front matter failed");
                }
            }
        }

        body.push_str("# ");
        if let Some(link) = &parent_link {
            body.push_str(link);
        }
        body.push_str(selection);
        body.push('\n');

        match self {
            NoteTemplate::ReviewSkeleton => {
                for section in REVIEW_SECTIONS {
                    body.push_str("\n## ");
                    body.push_str(section);
                    body.push('\n');
                }
            }
            NoteTemplate::FrontMatterReferences => {
                if let Some(parent) = parent {
                    body.push_str(&format!("\n## References\n\n- [[{parent}]]\n"));
                }
            }
            _ => {}
        }

        Composed {
            body,
            metadata,
            parent_link,
        }
    }
}

impl fmt::Display for NoteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoteTemplate::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = NoteTemplate::ALL.iter().map(|t| t.as_str()).collect();
                format!("unknown template '{s}' (expected one of: {})", known.join(", "))
            })
    }
}
