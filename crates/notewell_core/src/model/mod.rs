//! Domain model for the note editor.
//!
//! # Responsibility
//! - Define the note record, label references and folder buckets.
//! - Host the pure folder-transition engine consumed by the controller.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - A note belongs to exactly one folder at any time.

pub mod folder;
pub mod note;
