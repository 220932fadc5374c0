//! Note record and label reference types.
//!
//! # Responsibility
//! - Define the serializable working copy of one note.
//! - Keep label references deduplicated and insertion-ordered.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `folder` holds exactly one bucket; pinned notes may live in any of them.
//! - `is_new` stays `true` until the first successful persist.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a note.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = Uuid;

/// Reference into the process-wide label catalog.
///
/// Identity is the name. A note holds references only; it never owns label
/// lifecycle and never mutates the catalog itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coarse-grained bucket a note currently belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Folder {
    /// Regular notes visible in the main list.
    Active,
    /// Soft-deleted notes awaiting restore or permanent removal.
    Deleted,
    /// Archived notes kept out of the main list.
    Archived,
}

/// Serializable working copy of one note.
///
/// This is the snapshot shape passed in at screen entry and handed back out
/// for instance-state persistence. Dirty tracking lives in the editor layer,
/// not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Stable identity, generated once per note.
    pub id: NoteId,
    /// Exactly one folder at any time.
    pub folder: Folder,
    /// Pin flag; valid in every folder.
    pub pinned: bool,
    /// Label name references, deduplicated, insertion order preserved.
    pub labels: Vec<Label>,
    /// Title text owned by the external editing surface.
    pub title: String,
    /// Body text owned by the external editing surface.
    pub body: String,
    /// True until the first successful persist.
    pub is_new: bool,
}

impl Note {
    /// Creates a brand-new note with defaults: Active, unpinned, no labels.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Creates a brand-new note with a caller-provided identity.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(id: NoteId) -> Self {
        Self {
            id,
            folder: Folder::Active,
            pinned: false,
            labels: Vec::new(),
            title: String::new(),
            body: String::new(),
            is_new: true,
        }
    }

    /// Returns whether the note carries no meaningful content.
    ///
    /// New notes that are still empty at exit are discarded instead of
    /// persisted as blank records.
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.body.trim().is_empty() && self.labels.is_empty()
    }
}

impl Default for Note {
    fn default() -> Self {
        Self::new()
    }
}

/// Deduplicates labels while preserving first-seen order.
pub(crate) fn dedup_labels(labels: Vec<Label>) -> Vec<Label> {
    let mut seen = Vec::with_capacity(labels.len());
    for label in labels {
        if !seen.contains(&label) {
            seen.push(label);
        }
    }
    seen
}
