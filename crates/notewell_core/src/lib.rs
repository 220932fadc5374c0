//! Core controller logic for the Notewell note-editing screen.
//! This crate is the single source of truth for note lifecycle invariants.

pub mod editor;
pub mod logging;
pub mod model;
pub mod store;

pub use editor::controller::{
    ConfirmationPrompt, EditorController, Phase, ScreenEntry, SharedContentHook, SharedPayload,
};
pub use editor::model::{NoteModel, SaveCallback};
pub use editor::Effect;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::folder::{
    available_commands, pin_command_label, Command, FolderAction, Transition, TransitionRejected,
};
pub use model::note::{Folder, Label, Note, NoteId};
pub use store::sqlite::{latest_schema_version, open_store, open_store_in_memory, SqliteStore};
pub use store::{LabelStore, NoteStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
