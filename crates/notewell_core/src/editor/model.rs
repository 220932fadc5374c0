//! Working copy of one note with save sequencing.
//!
//! # Responsibility
//! - Hold the mutable in-memory note state for the screen session.
//! - Track dirtiness and collapse overlapping save requests into one
//!   persist.
//!
//! # Invariants
//! - UI-visible mutations (pin, title, body, labels) take effect
//!   synchronously; persistence runs on background threads.
//! - The dirty flag stays set after a failed persist so the next save
//!   trigger retries.
//! - A new, still-empty note is never persisted.

use crate::editor::Completion;
use crate::model::folder::{self, FolderAction, Transition, TransitionRejected};
use crate::model::note::{dedup_labels, Folder, Label, Note};
use crate::store::{NoteStore, StoreResult};
use log::{debug, info, warn};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

/// Completion callback for `save`. Invoked on the interaction thread.
pub type SaveCallback = Box<dyn FnOnce(StoreResult<()>)>;

/// State holder for the note being edited.
pub struct NoteModel {
    note: Note,
    dirty: bool,
    /// Bumped on every mutation; lets a finished persist tell whether the
    /// state it wrote is still current.
    edit_epoch: u64,
    save_in_flight: bool,
    pending_saves: Vec<SaveCallback>,
    store: Arc<dyn NoteStore>,
    completions: Sender<Completion>,
}

impl NoteModel {
    pub(crate) fn new(store: Arc<dyn NoteStore>, completions: Sender<Completion>) -> Self {
        Self {
            note: Note::new(),
            dirty: false,
            edit_epoch: 0,
            save_in_flight: false,
            pending_saves: Vec::new(),
            store,
            completions,
        }
    }

    /// Replaces in-memory state from a previously persisted snapshot.
    pub fn hydrate(&mut self, mut note: Note) {
        note.is_new = false;
        self.note = note;
        self.dirty = false;
    }

    /// Resets to a brand-new note with default state.
    pub fn init_as_new(&mut self) {
        self.note = Note::new();
        self.dirty = false;
    }

    pub fn note(&self) -> &Note {
        &self.note
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flips the pin flag. Takes effect synchronously; persistence is the
    /// caller's responsibility (the next save trigger picks it up).
    pub fn set_pinned(&mut self, pinned: bool) {
        if self.note.pinned != pinned {
            self.note.pinned = pinned;
            self.touch();
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        if self.note.title != title {
            self.note.title = title;
            self.touch();
        }
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        let body = body.into();
        if self.note.body != body {
            self.note.body = body;
            self.touch();
        }
    }

    /// Replaces the label reference set and persists immediately.
    pub fn set_labels(&mut self, labels: Vec<Label>) {
        self.note.labels = dedup_labels(labels);
        self.touch();
        self.save(None);
    }

    /// Applies a folder-moving action and persists immediately.
    ///
    /// Folder changes are never deferred: a stale folder must not be
    /// visible in a list after navigating away. Pin and purge actions do
    /// not route through here and are rejected.
    pub fn move_to(&mut self, action: FolderAction) -> Result<Folder, TransitionRejected> {
        let next = match folder::apply(self.note.folder, action)? {
            Transition::MovedTo(next) => next,
            Transition::Purged | Transition::Pinned(_) => {
                return Err(TransitionRejected {
                    folder: self.note.folder,
                    action,
                });
            }
        };
        self.note.folder = next;
        self.touch();
        self.save(None);
        Ok(next)
    }

    /// Starts a save unless there is nothing to persist.
    ///
    /// Idempotent: without intervening mutations a second call performs no
    /// second persist. Calls made while a persist is in flight collapse
    /// into it; every caller is notified once the state it requested is
    /// written.
    pub fn save(&mut self, on_complete: Option<SaveCallback>) {
        if !self.dirty {
            if let Some(callback) = on_complete {
                callback(Ok(()));
            }
            return;
        }
        if self.note.is_new && self.note.is_empty() {
            // Discard-if-untouched: no record is created for a new note
            // without meaningful content.
            debug!("event=save_discarded module=editor status=ok reason=new_empty_note");
            if let Some(callback) = on_complete {
                callback(Ok(()));
            }
            return;
        }

        if let Some(callback) = on_complete {
            self.pending_saves.push(callback);
        }
        if self.save_in_flight {
            return;
        }
        self.spawn_persist();
    }

    /// Starts the permanent removal of the persisted record.
    ///
    /// Confirmation happens at the controller boundary before this is
    /// called. The operation is never retried automatically; the outcome is
    /// delivered as a `PurgeFinished` completion.
    pub(crate) fn purge(&mut self) {
        if self.note.is_new {
            // Nothing was ever persisted; report success without touching
            // the store.
            let _ = self.completions.send(Completion::PurgeFinished { result: Ok(()) });
            return;
        }
        let id = self.note.id;
        let store = Arc::clone(&self.store);
        let completions = self.completions.clone();
        thread::spawn(move || {
            let result = store.delete_permanently(id);
            let _ = completions.send(Completion::PurgeFinished { result });
        });
    }

    /// Applies a finished persist. Called from the controller pump.
    pub(crate) fn finish_save(&mut self, edit_epoch: u64, result: StoreResult<()>) {
        self.save_in_flight = false;
        match &result {
            Ok(()) => {
                self.note.is_new = false;
                if self.edit_epoch == edit_epoch {
                    self.dirty = false;
                } else if self.dirty {
                    // The note changed while the persist was in flight.
                    // Run a follow-up save so registered callers see their
                    // state written, not the stale snapshot.
                    self.spawn_persist();
                    return;
                }
                info!("event=note_saved module=editor status=ok id={}", self.note.id);
            }
            Err(err) => {
                // Dirty stays set; the next save trigger retries.
                warn!(
                    "event=note_save module=editor status=error id={} error={err}",
                    self.note.id
                );
            }
        }
        let callbacks = std::mem::take(&mut self.pending_saves);
        for callback in callbacks {
            callback(result.clone());
        }
    }

    fn spawn_persist(&mut self) {
        self.save_in_flight = true;
        let snapshot = self.note.clone();
        let edit_epoch = self.edit_epoch;
        let store = Arc::clone(&self.store);
        let completions = self.completions.clone();
        thread::spawn(move || {
            let result = store.persist(&snapshot);
            let _ = completions.send(Completion::SaveFinished { edit_epoch, result });
        });
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.edit_epoch += 1;
    }
}
