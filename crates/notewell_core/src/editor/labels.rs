//! Label catalog coordination for the editor screen.
//!
//! # Responsibility
//! - Fetch the process-wide label catalog off the interaction thread.
//! - Tag fetches with a generation so late results can be told apart from
//!   the newest request.
//!
//! # Invariants
//! - The picker must not open before the catalog fetch resolves.
//! - Only the newest outstanding request may produce a picker; everything
//!   older is a stale delivery.
//! - Catalog inserts never mutate any note's reference set.

use crate::editor::Completion;
use crate::model::note::Label;
use crate::store::LabelStore;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

/// Coordinates catalog loads and inserts for one screen session.
pub struct LabelCoordinator {
    store: Arc<dyn LabelStore>,
    completions: Sender<Completion>,
    next_request: u64,
    current_request: Option<u64>,
}

impl LabelCoordinator {
    pub(crate) fn new(store: Arc<dyn LabelStore>, completions: Sender<Completion>) -> Self {
        Self {
            store,
            completions,
            next_request: 0,
            current_request: None,
        }
    }

    /// Starts a catalog fetch for a reconcile pass.
    ///
    /// `selection` is the note's current label set; it is echoed back with
    /// the completion so the picker shows catalog and selection together.
    /// Returns the request generation.
    pub(crate) fn begin_reconcile(&mut self, selection: Vec<Label>) -> u64 {
        self.next_request += 1;
        let request = self.next_request;
        self.current_request = Some(request);

        let store = Arc::clone(&self.store);
        let completions = self.completions.clone();
        thread::spawn(move || {
            let result = store.load_labels();
            let _ = completions.send(Completion::CatalogLoaded {
                request,
                selection,
                result,
            });
        });
        request
    }

    /// Consumes the completion for `request` if it is the newest one.
    ///
    /// Returns `false` for anything older; the caller discards that
    /// delivery.
    pub(crate) fn take_current(&mut self, request: u64) -> bool {
        if self.current_request == Some(request) {
            self.current_request = None;
            true
        } else {
            false
        }
    }

    /// Inserts one label into the shared catalog off-thread.
    pub(crate) fn insert_label(&self, label: Label) {
        let store = Arc::clone(&self.store);
        let completions = self.completions.clone();
        thread::spawn(move || {
            let result = store.insert_label(&label);
            let _ = completions.send(Completion::LabelInserted { label, result });
        });
    }
}
