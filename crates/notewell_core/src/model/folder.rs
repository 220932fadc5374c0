//! Pure folder-transition engine.
//!
//! # Responsibility
//! - Map (current folder, requested action) to the resulting transition.
//! - Declare the command set available per folder for menu construction.
//!
//! # Invariants
//! - `apply` has no side effects; callers apply accepted transitions.
//! - Any combination outside the fixed table is a typed rejection, never a
//!   panic.
//! - Pin/Unpin, Share and Labels are available in every folder.

use crate::model::note::Folder;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Action a user command requests against a note's folder or pin state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderAction {
    Delete,
    Restore,
    Archive,
    Unarchive,
    DeleteForever,
    Pin,
    Unpin,
}

impl Display for FolderAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Delete => "delete",
            Self::Restore => "restore",
            Self::Archive => "archive",
            Self::Unarchive => "unarchive",
            Self::DeleteForever => "delete_forever",
            Self::Pin => "pin",
            Self::Unpin => "unpin",
        };
        f.write_str(name)
    }
}

/// Accepted outcome of a folder action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The note moves to a new folder.
    MovedTo(Folder),
    /// The persisted record is removed permanently.
    Purged,
    /// The pin flag takes the given value; the folder is unchanged.
    Pinned(bool),
}

/// Typed rejection for an invalid folder/action combination.
///
/// This is a programming error at the dispatch site, not a user-facing
/// condition; callers guard it in development and must not apply it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRejected {
    pub folder: Folder,
    pub action: FolderAction,
}

impl Display for TransitionRejected {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "action `{}` is not valid for folder {:?}",
            self.action, self.folder
        )
    }
}

impl Error for TransitionRejected {}

/// Maps the current folder and a requested action to a transition.
///
/// Move table:
/// - Active + Delete -> Deleted
/// - Active + Archive -> Archived
/// - Deleted + Restore -> Active
/// - Deleted + DeleteForever -> purge
/// - Archived + Unarchive -> Active (Restore is accepted as an alias)
///
/// Pin/Unpin are accepted in every folder. Everything else is rejected.
pub fn apply(current: Folder, action: FolderAction) -> Result<Transition, TransitionRejected> {
    use FolderAction::*;

    let transition = match (current, action) {
        (_, Pin) => Transition::Pinned(true),
        (_, Unpin) => Transition::Pinned(false),
        (Folder::Active, Delete) => Transition::MovedTo(Folder::Deleted),
        (Folder::Active, Archive) => Transition::MovedTo(Folder::Archived),
        (Folder::Deleted, Restore) => Transition::MovedTo(Folder::Active),
        (Folder::Deleted, DeleteForever) => Transition::Purged,
        (Folder::Archived, Unarchive | Restore) => Transition::MovedTo(Folder::Active),
        _ => {
            return Err(TransitionRejected {
                folder: current,
                action,
            })
        }
    };
    Ok(transition)
}

/// Command offered on the editor's menu surface.
///
/// The rendering layer binds these to whatever widget type it uses; the core
/// never depends on one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePin,
    Share,
    Labels,
    Delete,
    Archive,
    Restore,
    Unarchive,
    DeleteForever,
}

const ACTIVE_COMMANDS: &[Command] = &[
    Command::TogglePin,
    Command::Share,
    Command::Labels,
    Command::Delete,
    Command::Archive,
];

const DELETED_COMMANDS: &[Command] = &[
    Command::TogglePin,
    Command::Share,
    Command::Labels,
    Command::Restore,
    Command::DeleteForever,
];

const ARCHIVED_COMMANDS: &[Command] = &[
    Command::TogglePin,
    Command::Share,
    Command::Labels,
    Command::Unarchive,
];

/// Returns the command set to offer for the given folder.
pub fn available_commands(folder: Folder) -> &'static [Command] {
    match folder {
        Folder::Active => ACTIVE_COMMANDS,
        Folder::Deleted => DELETED_COMMANDS,
        Folder::Archived => ARCHIVED_COMMANDS,
    }
}

/// Menu title for the pin toggle, reflecting the in-memory pin state.
pub fn pin_command_label(pinned: bool) -> &'static str {
    if pinned {
        "Unpin"
    } else {
        "Pin"
    }
}
