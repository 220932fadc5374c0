//! Note-editing screen core.
//!
//! # Responsibility
//! - Orchestrate one screen session: command dispatch, saves and exit.
//! - Bridge background I/O completions back to the interaction thread.
//!
//! # Invariants
//! - All UI-facing state is mutated on the interaction thread only, by
//!   pumping the completion channel.
//! - Completions for a session that already exited are discarded, never
//!   applied.

use crate::model::note::{Label, Note};
use crate::store::{StoreError, StoreResult};

pub mod controller;
pub mod labels;
pub mod model;

/// Result of a background I/O operation, delivered over the controller's
/// channel and applied by `pump` on the interaction thread.
pub(crate) enum Completion {
    /// A persist finished. `edit_epoch` is the model epoch the persisted
    /// snapshot was taken at.
    SaveFinished {
        edit_epoch: u64,
        result: StoreResult<()>,
    },
    /// The label catalog fetch resolved. `selection` echoes the note's
    /// labels captured when the fetch started.
    CatalogLoaded {
        request: u64,
        selection: Vec<Label>,
        result: StoreResult<Vec<Label>>,
    },
    /// A catalog insert finished.
    LabelInserted {
        label: Label,
        result: StoreResult<()>,
    },
    /// The permanent delete finished.
    PurgeFinished { result: StoreResult<()> },
}

/// Side effect for the host UI, drained via `EditorController::take_effects`.
///
/// The core never touches widgets; the rendering layer interprets these.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Dismiss the screen.
    NavigateBack,
    /// The command set or pin title changed; rebuild the menu.
    CommandsChanged,
    /// The catalog fetch resolved; open the label picker.
    ShowLabelPicker {
        catalog: Vec<Label>,
        selection: Vec<Label>,
    },
    /// The note's label set changed; refresh the label display surface.
    LabelsChanged(Vec<Label>),
    /// Build and fire a share payload for the given snapshot.
    ShareNote(Note),
    /// A catalog insert completed.
    LabelInserted { label: Label, success: bool },
    /// The irreversible permanent delete failed; must be reported.
    PurgeFailed(StoreError),
}
