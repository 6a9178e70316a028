//! Value records produced by an extraction

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::timestamp::TimestampId;

/// Front matter entries the host merges into the new note after creating it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, Value>);

impl Metadata {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Insert a list of strings, e.g. `aliases: [title]`
    pub fn insert_list<I, S>(&mut self, key: impl Into<String>, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = items
            .into_iter()
            .map(|item| Value::String(item.into()))
            .collect();
        self.0.insert(key.into(), Value::Array(items));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// The composed new note, ready to persist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub id: TimestampId,
    pub body: String,
    pub metadata: Metadata,
    /// Parent link fragment as written in the body (e.g. `[[Source]]: `)
    pub parent_link: Option<String>,
}

/// The back-link that replaces the original selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementText {
    pub target: TimestampId,
    pub label: Option<String>,
}

impl ReplacementText {
    pub fn new(target: TimestampId, label: Option<String>) -> Self {
        Self {
            target,
            label: label.filter(|l| !l.is_empty()),
        }
    }
}

impl fmt::Display for ReplacementText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "[[{}|{}]]", self.target, label),
            None => write!(f, "[[{}]]", self.target),
        }
    }
}

/// Everything an extraction computes before any persistence happens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub title: Option<String>,
    pub draft: NoteDraft,
    pub replacement: ReplacementText,
}
