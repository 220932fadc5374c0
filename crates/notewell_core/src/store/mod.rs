//! Persistence contracts for notes and the label catalog.
//!
//! # Responsibility
//! - Define the narrow interfaces the editor core needs from storage.
//! - Isolate SQLite details inside the `sqlite` submodule.
//!
//! # Invariants
//! - Implementations must be safe to call from background threads.
//! - `delete_permanently` is irreversible; implementations must not mask
//!   failures.

use crate::model::note::{Label, Note, NoteId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod sqlite;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence failure reported to the editor core.
///
/// Cloneable so one failed persist can notify every collapsed save caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Transport or backend failure, carried as a message.
    Backend(String),
    /// The targeted note has no persisted record.
    NotFound(NoteId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend(message) => write!(f, "store backend failure: {message}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
        }
    }
}

impl Error for StoreError {}

/// Note persistence collaborator.
///
/// The editor treats this as an opaque service: it calls it and reacts to
/// results, nothing more.
pub trait NoteStore: Send + Sync {
    /// Persists the full current state of the note (insert or replace).
    fn persist(&self, note: &Note) -> StoreResult<()>;
    /// Permanently removes the persisted record. Never retried automatically.
    fn delete_permanently(&self, id: NoteId) -> StoreResult<()>;
}

/// Label catalog collaborator.
///
/// The catalog is process-wide and shared by all notes; editing one note's
/// label references never mutates the catalog through this interface.
pub trait LabelStore: Send + Sync {
    /// Loads the full label catalog.
    fn load_labels(&self) -> StoreResult<Vec<Label>>;
    /// Adds one label to the catalog. Inserting an existing name succeeds.
    fn insert_label(&self, label: &Label) -> StoreResult<()>;
}
