//! Lifecycle controller for the note-editing screen.
//!
//! # Responsibility
//! - Wire UI commands to the note model, transition engine and label
//!   coordinator.
//! - Guarantee save-before-exit across back navigation, instance-state
//!   snapshots and terminal deletion.
//!
//! # Invariants
//! - Initialization runs exactly once per screen instance, even across
//!   configuration-driven re-creation.
//! - Folder-changing commands terminate the screen; leaving ActiveEditing
//!   on the first one rules out a concurrent second.
//! - After a confirmed permanent delete no save is ever issued.
//! - Completions arriving outside ActiveEditing never mutate screen state.

use crate::editor::labels::LabelCoordinator;
use crate::editor::model::NoteModel;
use crate::editor::{Completion, Effect};
use crate::model::folder::{self, Command, FolderAction};
use crate::model::note::{Label, Note};
use crate::store::{LabelStore, NoteStore};
use log::{debug, error, info, warn};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

/// Screen lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Created but not yet activated.
    Initializing,
    /// Commands are dispatched and edits accumulate.
    ActiveEditing,
    /// A terminal action ran; the screen is on its way out.
    Exiting,
}

/// Inputs available when the screen is entered.
#[derive(Debug, Default)]
pub struct ScreenEntry {
    /// Previously persisted note to edit, or `None` for a new note.
    pub note: Option<Note>,
    /// External share payload seeding a new note.
    pub shared: Option<SharedPayload>,
}

/// Content shared into the app from outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedPayload {
    pub title: Option<String>,
    pub text: String,
}

/// Blocking yes/no prompt, used only for the irreversible permanent delete.
pub trait ConfirmationPrompt {
    fn confirm_delete_forever(&self) -> bool;
}

/// Hook that seeds a new note from a shared payload. Defaults to a no-op.
pub trait SharedContentHook {
    fn seed(&self, _model: &mut NoteModel, _payload: &SharedPayload) {}
}

struct NoopShareHook;

impl SharedContentHook for NoopShareHook {}

/// Controller for one note-editing screen session.
///
/// Owns the working note copy and the completion channel; the host pumps
/// completions on the interaction thread and drains effects after every
/// call.
pub struct EditorController {
    phase: Phase,
    initialized: bool,
    model: NoteModel,
    labels: LabelCoordinator,
    prompt: Box<dyn ConfirmationPrompt>,
    share_hook: Box<dyn SharedContentHook>,
    effects: Vec<Effect>,
    completions: Receiver<Completion>,
}

impl EditorController {
    pub fn new(
        note_store: Arc<dyn NoteStore>,
        label_store: Arc<dyn LabelStore>,
        prompt: Box<dyn ConfirmationPrompt>,
    ) -> Self {
        let (tx, rx) = channel();
        Self {
            phase: Phase::Initializing,
            initialized: false,
            model: NoteModel::new(note_store, tx.clone()),
            labels: LabelCoordinator::new(label_store, tx),
            prompt,
            share_hook: Box::new(NoopShareHook),
            effects: Vec::new(),
            completions: rx,
        }
    }

    /// Replaces the shared-content hook.
    pub fn with_share_hook(mut self, hook: Box<dyn SharedContentHook>) -> Self {
        self.share_hook = hook;
        self
    }

    /// Activates the screen. Runs initialization exactly once; re-entry on
    /// configuration-driven re-creation is a no-op.
    pub fn activate(&mut self, entry: ScreenEntry) {
        if self.initialized {
            debug!("event=editor_activate module=editor status=ok reason=already_initialized");
            return;
        }
        self.initialized = true;

        match entry.note {
            Some(note) => self.model.hydrate(note),
            None => {
                self.model.init_as_new();
                if let Some(payload) = entry.shared.as_ref() {
                    self.share_hook.seed(&mut self.model, payload);
                }
            }
        }
        self.phase = Phase::ActiveEditing;
        self.effects.push(Effect::CommandsChanged);
        info!(
            "event=editor_activate module=editor status=ok id={} is_new={} folder={:?}",
            self.model.note().id,
            self.model.note().is_new,
            self.model.note().folder
        );
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn note(&self) -> &Note {
        self.model.note()
    }

    pub fn is_dirty(&self) -> bool {
        self.model.is_dirty()
    }

    /// Command set for the current folder, for menu construction.
    pub fn available_commands(&self) -> &'static [Command] {
        folder::available_commands(self.model.note().folder)
    }

    /// Current pin-toggle menu title. Always in sync with the in-memory
    /// flag, independent of persistence timing.
    pub fn pin_label(&self) -> &'static str {
        folder::pin_command_label(self.model.note().pinned)
    }

    /// Title edit reported by the external editing surface.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.model.set_title(title);
    }

    /// Body edit reported by the external editing surface.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.model.set_body(body);
    }

    /// Dispatches one menu command. Only valid while actively editing.
    pub fn dispatch(&mut self, command: Command) {
        if self.phase != Phase::ActiveEditing {
            debug!(
                "event=command_dispatch module=editor status=ok reason=ignored phase={:?}",
                self.phase
            );
            return;
        }
        match command {
            Command::TogglePin => {
                let next = !self.model.note().pinned;
                self.model.set_pinned(next);
                self.effects.push(Effect::CommandsChanged);
            }
            Command::Share => {
                self.effects.push(Effect::ShareNote(self.model.note().clone()));
            }
            Command::Labels => {
                let selection = self.model.note().labels.clone();
                self.labels.begin_reconcile(selection);
            }
            Command::Delete => self.move_and_exit(FolderAction::Delete),
            Command::Archive => self.move_and_exit(FolderAction::Archive),
            Command::Restore => self.move_and_exit(FolderAction::Restore),
            Command::Unarchive => self.move_and_exit(FolderAction::Unarchive),
            Command::DeleteForever => self.delete_forever(),
        }
    }

    /// Write-back from the label picker.
    pub fn commit_labels(&mut self, selection: Vec<Label>) {
        if self.phase != Phase::ActiveEditing {
            return;
        }
        self.model.set_labels(selection);
        self.effects
            .push(Effect::LabelsChanged(self.model.note().labels.clone()));
    }

    /// Adds one label to the shared catalog.
    pub fn insert_label(&mut self, label: Label) {
        self.labels.insert_label(label);
    }

    /// Back navigation. Starts the exit save before the screen is torn
    /// down; navigation does not wait for the save to complete.
    pub fn on_back_pressed(&mut self) {
        if self.phase != Phase::ActiveEditing {
            return;
        }
        self.begin_exit(true);
    }

    /// Instance-state snapshot. Triggers a save without terminating the
    /// screen and returns the serializable note state.
    pub fn instance_state(&mut self) -> Note {
        self.model.save(None);
        self.model.note().clone()
    }

    /// Drains and applies every ready completion. Returns how many were
    /// handled. Must run on the interaction thread.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(completion) = self.completions.try_recv() {
            self.handle_completion(completion);
            handled += 1;
        }
        handled
    }

    /// Waits up to `timeout` for one completion, then drains the rest.
    pub fn pump_wait(&mut self, timeout: Duration) -> usize {
        match self.completions.recv_timeout(timeout) {
            Ok(completion) => {
                self.handle_completion(completion);
                1 + self.pump()
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => 0,
        }
    }

    /// Hands accumulated UI effects to the host.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    fn move_and_exit(&mut self, action: FolderAction) {
        match self.model.move_to(action) {
            Ok(next) => {
                info!(
                    "event=folder_move module=editor status=ok id={} action={action} folder={next:?}",
                    self.model.note().id
                );
                self.begin_exit(true);
            }
            Err(rejected) => {
                // Menus only offer valid actions; reaching this is a
                // dispatch-site bug.
                debug_assert!(false, "rejected transition dispatched: {rejected}");
                error!("event=folder_move module=editor status=error error={rejected}");
            }
        }
    }

    fn delete_forever(&mut self) {
        let current = self.model.note().folder;
        if let Err(rejected) = folder::apply(current, FolderAction::DeleteForever) {
            debug_assert!(false, "rejected transition dispatched: {rejected}");
            error!("event=delete_forever module=editor status=error error={rejected}");
            return;
        }
        if !self.prompt.confirm_delete_forever() {
            debug!("event=delete_forever module=editor status=ok reason=declined");
            return;
        }
        // Leave ActiveEditing before the purge starts so no second folder
        // command can race it.
        self.phase = Phase::Exiting;
        self.model.purge();
    }

    fn begin_exit(&mut self, save: bool) {
        self.phase = Phase::Exiting;
        if save {
            // Fire-and-forget: started before teardown, not awaited.
            self.model.save(None);
        }
        self.effects.push(Effect::NavigateBack);
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::SaveFinished { edit_epoch, result } => {
                self.model.finish_save(edit_epoch, result);
            }
            Completion::CatalogLoaded {
                request,
                selection,
                result,
            } => {
                if self.phase != Phase::ActiveEditing || !self.labels.take_current(request) {
                    debug!(
                        "event=catalog_load module=editor status=ok reason=stale request={request}"
                    );
                    return;
                }
                match result {
                    Ok(catalog) => {
                        self.effects
                            .push(Effect::ShowLabelPicker { catalog, selection });
                    }
                    Err(err) => {
                        warn!("event=catalog_load module=editor status=error error={err}");
                    }
                }
            }
            Completion::LabelInserted { label, result } => {
                if self.phase != Phase::ActiveEditing {
                    debug!("event=label_insert module=editor status=ok reason=stale");
                    return;
                }
                if let Err(err) = &result {
                    warn!("event=label_insert module=editor status=error error={err}");
                }
                self.effects.push(Effect::LabelInserted {
                    label,
                    success: result.is_ok(),
                });
            }
            Completion::PurgeFinished { result } => {
                if self.phase != Phase::Exiting {
                    debug!("event=purge module=editor status=ok reason=stale");
                    return;
                }
                match result {
                    Ok(()) => {
                        // The record is gone; exit without issuing a save.
                        info!(
                            "event=purge module=editor status=ok id={}",
                            self.model.note().id
                        );
                        self.effects.push(Effect::NavigateBack);
                    }
                    Err(err) => {
                        // Irreversible and user-initiated: surface it and
                        // hand the screen back instead of retrying.
                        error!(
                            "event=purge module=editor status=error id={} error={err}",
                            self.model.note().id
                        );
                        self.phase = Phase::ActiveEditing;
                        self.effects.push(Effect::PurgeFailed(err));
                    }
                }
            }
        }
    }
}
