//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `notewell_core` linkage.
//! - Run one scripted editing session against an in-memory store.

use notewell_core::{
    open_store_in_memory, Command, ConfirmationPrompt, EditorController, ScreenEntry,
};
use std::sync::Arc;
use std::time::Duration;

struct AutoConfirm;

impl ConfirmationPrompt for AutoConfirm {
    fn confirm_delete_forever(&self) -> bool {
        true
    }
}

fn main() {
    println!("notewell_core version={}", notewell_core::core_version());

    let store = Arc::new(open_store_in_memory().expect("in-memory store should open"));
    let mut controller =
        EditorController::new(store.clone(), store.clone(), Box::new(AutoConfirm));

    controller.activate(ScreenEntry::default());
    controller.set_title("smoke note");
    controller.set_body("created by the CLI probe");
    controller.dispatch(Command::TogglePin);
    let note_id = controller.note().id;

    controller.on_back_pressed();
    controller.pump_wait(Duration::from_secs(5));

    match store.load_note(note_id) {
        Ok(Some(note)) => println!(
            "persisted id={} folder={:?} pinned={} title={:?}",
            note.id, note.folder, note.pinned, note.title
        ),
        Ok(None) => println!("note was discarded"),
        Err(err) => println!("load failed: {err}"),
    }
}
