//! YAML front matter handling
//!
//! Notes may start with a `---` delimited YAML block. These helpers render a
//! block from `Metadata`, split a note into block and body, and merge new
//! entries into an existing block without touching the body.

use serde_json::Value;

use crate::draft::Metadata;
use crate::error::{HostError, HostResult};

/// Render `metadata` as a delimited block, or an empty string when it is empty
pub fn render(metadata: &Metadata) -> HostResult<String> {
    if metadata.is_empty() {
        return Ok(String::new());
    }

    let yaml = serde_yaml::to_string(metadata)
        .map_err(|e| HostError::Metadata(format!("Failed to serialize frontmatter: {e}")))?;

    Ok(format!("---\n{yaml}---\n"))
}

/// Split a note into its raw YAML (without delimiters) and the remaining body
pub fn split(content: &str) -> (Option<&str>, &str) {
    let rest = if let Some(rest) = content.strip_prefix("---\n") {
        rest
    } else if let Some(rest) = content.strip_prefix("---\r\n") {
        rest
    } else {
        return (None, content);
    };

    // Empty block: closing delimiter right after the opening one
    if let Some(body) = rest.strip_prefix("---\n") {
        return (Some(""), body);
    }
    if let Some(body) = rest.strip_prefix("---\r\n") {
        return (Some(""), body);
    }

    if let Some(end) = rest.find("\n---\n") {
        (Some(&rest[..end + 1]), &rest[end + 5..])
    } else if let Some(end) = rest.find("\r\n---\r\n") {
        (Some(&rest[..end + 2]), &rest[end + 7..])
    } else if let Some(yaml) = rest.strip_suffix("\n---") {
        (Some(yaml), "")
    } else {
        // No closing delimiter, so this is not front matter
        (None, content)
    }
}

/// Parse the front matter of a note into a mapping
pub fn parse(content: &str) -> HostResult<Metadata> {
    let (yaml, _) = split(content);
    let Some(yaml) = yaml else {
        return Ok(Metadata::new());
    };
    if yaml.trim().is_empty() {
        return Ok(Metadata::new());
    }

    let value: Value = serde_yaml::from_str(yaml)
        .map_err(|e| HostError::Metadata(format!("Failed to parse frontmatter: {e}")))?;

    match value {
        Value::Object(map) => {
            let mut metadata = Metadata::new();
            for (key, value) in map {
                metadata.insert(key, value);
            }
            Ok(metadata)
        }
        Value::Null => Ok(Metadata::new()),
        other => Err(HostError::Metadata(format!(
            "Frontmatter is not a mapping: {other}"
        ))),
    }
}

/// Merge `updates` into the front matter of `content`
///
/// Keys in `updates` replace existing keys; other keys and the body are kept.
pub fn merge(content: &str, updates: &Metadata) -> HostResult<String> {
    if updates.is_empty() {
        return Ok(content.to_string());
    }

    let mut merged = parse(content)?;
    for (key, value) in updates.iter() {
        merged.insert(key.clone(), value.clone());
    }

    let (_, body) = split(content);
    Ok(format!("{}{}", render(&merged)?, body))
}
