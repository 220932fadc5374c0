//! Shared test doubles for controller scenarios.
#![allow(dead_code)]

use notewell_core::{
    ConfirmationPrompt, Label, LabelStore, Note, NoteId, NoteStore, StoreError, StoreResult,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};

/// In-memory store double recording every call.
///
/// `hold`/`release` gate all I/O entry points so tests can keep an
/// operation in flight deterministically.
pub struct RecordingStore {
    pub persisted: Mutex<Vec<Note>>,
    pub purged: Mutex<Vec<NoteId>>,
    pub catalog: Mutex<Vec<Label>>,
    pub fail_persist: AtomicBool,
    pub fail_purge: AtomicBool,
    pub fail_load: AtomicBool,
    blocked: Mutex<bool>,
    unblocked: Condvar,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Self::with_catalog(Vec::new())
    }

    pub fn with_catalog(catalog: Vec<Label>) -> Arc<Self> {
        Arc::new(Self {
            persisted: Mutex::new(Vec::new()),
            purged: Mutex::new(Vec::new()),
            catalog: Mutex::new(catalog),
            fail_persist: AtomicBool::new(false),
            fail_purge: AtomicBool::new(false),
            fail_load: AtomicBool::new(false),
            blocked: Mutex::new(false),
            unblocked: Condvar::new(),
        })
    }

    /// Blocks every store call until `release` runs.
    pub fn hold(&self) {
        *self.blocked.lock().unwrap() = true;
    }

    pub fn release(&self) {
        *self.blocked.lock().unwrap() = false;
        self.unblocked.notify_all();
    }

    pub fn persist_count(&self) -> usize {
        self.persisted.lock().unwrap().len()
    }

    pub fn last_persisted(&self) -> Option<Note> {
        self.persisted.lock().unwrap().last().cloned()
    }

    fn wait_gate(&self) {
        let mut blocked = self.blocked.lock().unwrap();
        while *blocked {
            blocked = self.unblocked.wait(blocked).unwrap();
        }
    }
}

impl NoteStore for RecordingStore {
    fn persist(&self, note: &Note) -> StoreResult<()> {
        self.wait_gate();
        if self.fail_persist.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("persist failed".to_string()));
        }
        self.persisted.lock().unwrap().push(note.clone());
        Ok(())
    }

    fn delete_permanently(&self, id: NoteId) -> StoreResult<()> {
        self.wait_gate();
        if self.fail_purge.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("purge failed".to_string()));
        }
        self.purged.lock().unwrap().push(id);
        Ok(())
    }
}

impl LabelStore for RecordingStore {
    fn load_labels(&self) -> StoreResult<Vec<Label>> {
        self.wait_gate();
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("catalog load failed".to_string()));
        }
        Ok(self.catalog.lock().unwrap().clone())
    }

    fn insert_label(&self, label: &Label) -> StoreResult<()> {
        self.wait_gate();
        let mut catalog = self.catalog.lock().unwrap();
        if !catalog.contains(label) {
            catalog.push(label.clone());
        }
        Ok(())
    }
}

/// Prompt double with a fixed answer.
pub struct Confirm(pub bool);

impl ConfirmationPrompt for Confirm {
    fn confirm_delete_forever(&self) -> bool {
        self.0
    }
}

/// A persisted note with content, ready to hydrate.
pub fn existing_note(folder: notewell_core::Folder) -> Note {
    let mut note = Note::new();
    note.folder = folder;
    note.title = "meeting notes".to_string();
    note.body = "agenda and follow-ups".to_string();
    note.is_new = false;
    note
}
