use notewell_core::{
    latest_schema_version, open_store, open_store_in_memory, Command, ConfirmationPrompt,
    EditorController, Folder, Label, LabelStore, Note, NoteStore, ScreenEntry, StoreError,
};
use std::sync::Arc;
use std::time::Duration;

struct Confirm(bool);

impl ConfirmationPrompt for Confirm {
    fn confirm_delete_forever(&self) -> bool {
        self.0
    }
}

fn sample_note() -> Note {
    let mut note = Note::new();
    note.title = "title".to_string();
    note.body = "body".to_string();
    note.labels = vec![Label::new("zeta"), Label::new("alpha")];
    note
}

#[test]
fn migrations_apply_up_to_the_latest_version() {
    let store = open_store_in_memory().unwrap();
    assert_eq!(store.schema_version().unwrap(), latest_schema_version());
}

#[test]
fn persist_and_load_round_trip_preserves_label_order() {
    let store = open_store_in_memory().unwrap();
    let note = sample_note();
    store.persist(&note).unwrap();

    let loaded = store.load_note(note.id).unwrap().expect("note exists");
    assert_eq!(loaded.title, "title");
    assert_eq!(loaded.folder, Folder::Active);
    // Display order is insertion order, not alphabetical.
    assert_eq!(loaded.labels, vec![Label::new("zeta"), Label::new("alpha")]);
    assert!(!loaded.is_new);

    // The catalog itself is sorted by name.
    assert_eq!(
        store.load_labels().unwrap(),
        vec![Label::new("alpha"), Label::new("zeta")]
    );
}

#[test]
fn persist_twice_updates_the_same_row() {
    let store = open_store_in_memory().unwrap();
    let mut note = sample_note();
    store.persist(&note).unwrap();

    note.folder = Folder::Archived;
    note.pinned = true;
    note.labels = vec![Label::new("only")];
    store.persist(&note).unwrap();

    let loaded = store.load_note(note.id).unwrap().expect("note exists");
    assert_eq!(loaded.folder, Folder::Archived);
    assert!(loaded.pinned);
    assert_eq!(loaded.labels, vec![Label::new("only")]);
}

#[test]
fn delete_permanently_removes_the_record_and_reports_missing_ids() {
    let store = open_store_in_memory().unwrap();
    let note = sample_note();
    store.persist(&note).unwrap();

    store.delete_permanently(note.id).unwrap();
    assert!(store.load_note(note.id).unwrap().is_none());

    let err = store.delete_permanently(note.id).unwrap_err();
    assert_eq!(err, StoreError::NotFound(note.id));
}

#[test]
fn inserting_an_existing_label_is_idempotent() {
    let store = open_store_in_memory().unwrap();
    store.insert_label(&Label::new("work")).unwrap();
    store.insert_label(&Label::new("work")).unwrap();
    assert_eq!(store.load_labels().unwrap(), vec![Label::new("work")]);
}

#[test]
fn file_backed_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.sqlite");
    let note = sample_note();

    {
        let store = open_store(&path).unwrap();
        store.persist(&note).unwrap();
    }

    let reopened = open_store(&path).unwrap();
    let loaded = reopened.load_note(note.id).unwrap().expect("note exists");
    assert_eq!(loaded.body, "body");
    assert_eq!(reopened.schema_version().unwrap(), latest_schema_version());
}

#[test]
fn editor_delete_flow_end_to_end_against_sqlite() {
    let store = Arc::new(open_store_in_memory().unwrap());
    let mut note = sample_note();
    note.is_new = false;
    store.persist(&note).unwrap();

    let mut editor = EditorController::new(store.clone(), store.clone(), Box::new(Confirm(true)));
    editor.activate(ScreenEntry {
        note: Some(note.clone()),
        shared: None,
    });

    editor.dispatch(Command::Delete);
    assert!(editor.pump_wait(Duration::from_secs(5)) >= 1);

    let loaded = store.load_note(note.id).unwrap().expect("note exists");
    assert_eq!(loaded.folder, Folder::Deleted);
}

#[test]
fn editor_delete_forever_end_to_end_against_sqlite() {
    let store = Arc::new(open_store_in_memory().unwrap());
    let mut note = sample_note();
    note.folder = Folder::Deleted;
    note.is_new = false;
    store.persist(&note).unwrap();

    let mut editor = EditorController::new(store.clone(), store.clone(), Box::new(Confirm(true)));
    editor.activate(ScreenEntry {
        note: Some(note.clone()),
        shared: None,
    });

    editor.dispatch(Command::DeleteForever);
    assert!(editor.pump_wait(Duration::from_secs(5)) >= 1);

    assert!(store.load_note(note.id).unwrap().is_none());
}
