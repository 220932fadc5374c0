mod common;

use common::{existing_note, Confirm, RecordingStore};
use notewell_core::{Command, EditorController, Effect, Folder, Label, ScreenEntry};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

const PUMP_TIMEOUT: Duration = Duration::from_secs(5);

fn controller(store: &Arc<RecordingStore>) -> EditorController {
    EditorController::new(store.clone(), store.clone(), Box::new(Confirm(true)))
}

#[test]
fn label_picker_opens_only_after_the_catalog_fetch_resolves() {
    let store = RecordingStore::with_catalog(vec![Label::new("home"), Label::new("work")]);
    let mut editor = controller(&store);
    let mut note = existing_note(Folder::Active);
    note.labels = vec![Label::new("work")];
    editor.activate(ScreenEntry {
        note: Some(note),
        shared: None,
    });
    editor.take_effects();

    editor.dispatch(Command::Labels);
    // The fetch has not been pumped yet; no picker may be shown.
    assert!(editor.take_effects().is_empty());

    assert!(editor.pump_wait(PUMP_TIMEOUT) >= 1);
    let effects = editor.take_effects();
    match effects.as_slice() {
        [Effect::ShowLabelPicker { catalog, selection }] => {
            assert_eq!(catalog, &vec![Label::new("home"), Label::new("work")]);
            assert_eq!(selection, &vec![Label::new("work")]);
        }
        other => panic!("expected one ShowLabelPicker effect, got {other:?}"),
    }
}

#[test]
fn committed_selection_is_persisted_and_surfaced() {
    let store = RecordingStore::new();
    let mut editor = controller(&store);
    editor.activate(ScreenEntry {
        note: Some(existing_note(Folder::Active)),
        shared: None,
    });
    editor.take_effects();

    editor.commit_labels(vec![
        Label::new("home"),
        Label::new("urgent"),
        Label::new("home"),
    ]);

    let effects = editor.take_effects();
    assert!(effects.iter().any(|effect| matches!(
        effect,
        Effect::LabelsChanged(labels)
            if labels == &vec![Label::new("home"), Label::new("urgent")]
    )));

    assert!(editor.pump_wait(PUMP_TIMEOUT) >= 1);
    let persisted = store.last_persisted().expect("label change must persist");
    assert_eq!(
        persisted.labels,
        vec![Label::new("home"), Label::new("urgent")]
    );
}

#[test]
fn fetch_resolving_after_teardown_is_discarded() {
    let store = RecordingStore::with_catalog(vec![Label::new("home")]);
    let mut editor = controller(&store);
    let mut note = existing_note(Folder::Active);
    note.labels = vec![Label::new("keep-me")];
    editor.activate(ScreenEntry {
        note: Some(note),
        shared: None,
    });
    editor.take_effects();

    store.hold();
    editor.dispatch(Command::Labels);
    editor.on_back_pressed();
    store.release();

    // The completion arrives, but the screen is exiting: stale delivery.
    assert!(editor.pump_wait(PUMP_TIMEOUT) >= 1);
    let effects = editor.take_effects();
    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, Effect::ShowLabelPicker { .. })));
    assert_eq!(editor.note().labels, vec![Label::new("keep-me")]);
}

#[test]
fn a_second_reconcile_supersedes_the_first() {
    let store = RecordingStore::with_catalog(vec![Label::new("home")]);
    let mut editor = controller(&store);
    editor.activate(ScreenEntry {
        note: Some(existing_note(Folder::Active)),
        shared: None,
    });
    editor.take_effects();

    editor.dispatch(Command::Labels);
    editor.dispatch(Command::Labels);

    // Both completions arrive; only the newest request opens a picker.
    assert!(editor.pump_wait(PUMP_TIMEOUT) >= 1);
    editor.pump_wait(Duration::from_secs(1));
    let pickers = editor
        .take_effects()
        .into_iter()
        .filter(|effect| matches!(effect, Effect::ShowLabelPicker { .. }))
        .count();
    assert_eq!(pickers, 1);
}

#[test]
fn inserting_a_label_updates_the_catalog_and_reports_back() {
    let store = RecordingStore::new();
    let mut editor = controller(&store);
    editor.activate(ScreenEntry {
        note: Some(existing_note(Folder::Active)),
        shared: None,
    });
    editor.take_effects();

    editor.insert_label(Label::new("fresh"));
    assert!(editor.pump_wait(PUMP_TIMEOUT) >= 1);

    let effects = editor.take_effects();
    assert!(effects.iter().any(|effect| matches!(
        effect,
        Effect::LabelInserted { label, success: true } if label == &Label::new("fresh")
    )));
    assert!(store.catalog.lock().unwrap().contains(&Label::new("fresh")));
}

#[test]
fn catalog_load_failure_shows_no_picker_and_no_modal() {
    let store = RecordingStore::new();
    store.fail_load.store(true, Ordering::SeqCst);
    let mut editor = controller(&store);
    editor.activate(ScreenEntry {
        note: Some(existing_note(Folder::Active)),
        shared: None,
    });
    editor.take_effects();

    editor.dispatch(Command::Labels);
    assert!(editor.pump_wait(PUMP_TIMEOUT) >= 1);

    assert!(editor.take_effects().is_empty());
    assert_eq!(editor.phase(), notewell_core::Phase::ActiveEditing);
}
