//! SQLite-backed store for notes and the label catalog.
//!
//! # Responsibility
//! - Open file or in-memory databases with migrations applied.
//! - Implement `NoteStore` and `LabelStore` over one connection.
//!
//! # Invariants
//! - Returned stores have `foreign_keys=ON` and all migrations applied.
//! - Schema version is tracked via `PRAGMA user_version`.
//! - `persist` replaces the full note row and its label links in one
//!   transaction.

use crate::model::note::{Folder, Label, Note, NoteId};
use crate::store::{LabelStore, NoteStore, StoreError, StoreResult};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: "CREATE TABLE notes (
                  uuid TEXT PRIMARY KEY,
                  title TEXT NOT NULL,
                  body TEXT NOT NULL,
                  folder TEXT NOT NULL CHECK (folder IN ('active', 'deleted', 'archived')),
                  pinned INTEGER NOT NULL DEFAULT 0,
                  updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
              );
              CREATE TABLE labels (
                  name TEXT PRIMARY KEY
              );
              CREATE TABLE note_labels (
                  note_uuid TEXT NOT NULL REFERENCES notes(uuid) ON DELETE CASCADE,
                  label TEXT NOT NULL REFERENCES labels(name),
                  position INTEGER NOT NULL,
                  PRIMARY KEY (note_uuid, label)
              );",
    },
    Migration {
        version: 2,
        sql: "CREATE INDEX idx_notes_folder ON notes(folder);",
    },
];

/// Latest schema version known by this binary.
pub fn latest_schema_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// SQLite store implementing both persistence collaborators.
///
/// The connection is guarded by a mutex so the store can be shared with
/// background persist threads behind an `Arc`.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

/// Opens a database file, applies pending migrations and returns the store.
///
/// # Side effects
/// - Emits `store_open` logging events with duration and status.
pub fn open_store(path: impl AsRef<Path>) -> StoreResult<SqliteStore> {
    let started_at = Instant::now();
    info!("event=store_open module=store status=start mode=file");
    let opened = Connection::open(path)
        .map_err(StoreError::from)
        .and_then(bootstrap);
    match opened {
        Ok(conn) => {
            info!(
                "event=store_open module=store status=ok mode=file duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(SqliteStore {
                conn: Mutex::new(conn),
            })
        }
        Err(err) => {
            error!(
                "event=store_open module=store status=error mode=file duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            Err(err)
        }
    }
}

/// Opens an in-memory database with all migrations applied.
pub fn open_store_in_memory() -> StoreResult<SqliteStore> {
    let conn = Connection::open_in_memory().map_err(StoreError::from)?;
    let conn = bootstrap(conn)?;
    Ok(SqliteStore {
        conn: Mutex::new(conn),
    })
}

fn bootstrap(mut conn: Connection) -> StoreResult<Connection> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(&mut conn)?;
    Ok(conn)
}

fn apply_migrations(conn: &mut Connection) -> StoreResult<()> {
    let current: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = latest_schema_version();

    if current > latest {
        return Err(StoreError::Backend(format!(
            "database schema version {current} is newer than supported {latest}"
        )));
    }
    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current {
            continue;
        }
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;
    Ok(())
}

impl SqliteStore {
    /// Loads one persisted note by id, labels in stored position order.
    pub fn load_note(&self, id: NoteId) -> StoreResult<Option<Note>> {
        let conn = self.lock()?;
        let row: Option<(String, String, String, String, i64)> = conn
            .query_row(
                "SELECT uuid, title, body, folder, pinned FROM notes WHERE uuid = ?1;",
                params![id.to_string()],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((uuid, title, body, folder, pinned)) = row else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT label FROM note_labels WHERE note_uuid = ?1 ORDER BY position ASC;",
        )?;
        let labels = stmt
            .query_map(params![id.to_string()], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(Label::new)
            .collect();

        Ok(Some(Note {
            id: parse_note_id(&uuid)?,
            folder: folder_from_db(&folder)?,
            pinned: pinned != 0,
            labels,
            title,
            body,
            is_new: false,
        }))
    }

    /// Returns the applied schema version.
    pub fn schema_version(&self) -> StoreResult<u32> {
        let conn = self.lock()?;
        let version = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        Ok(version)
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))
    }
}

impl NoteStore for SqliteStore {
    fn persist(&self, note: &Note) -> StoreResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO notes (uuid, title, body, folder, pinned)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(uuid) DO UPDATE SET
                 title = excluded.title,
                 body = excluded.body,
                 folder = excluded.folder,
                 pinned = excluded.pinned,
                 updated_at = (strftime('%s', 'now') * 1000);",
            params![
                note.id.to_string(),
                note.title.as_str(),
                note.body.as_str(),
                folder_to_db(note.folder),
                i64::from(note.pinned),
            ],
        )?;

        tx.execute(
            "DELETE FROM note_labels WHERE note_uuid = ?1;",
            params![note.id.to_string()],
        )?;
        for (position, label) in note.labels.iter().enumerate() {
            // Keep referenced names present in the catalog.
            tx.execute(
                "INSERT OR IGNORE INTO labels (name) VALUES (?1);",
                params![label.name()],
            )?;
            tx.execute(
                "INSERT INTO note_labels (note_uuid, label, position) VALUES (?1, ?2, ?3);",
                params![note.id.to_string(), label.name(), position as i64],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn delete_permanently(&self, id: NoteId) -> StoreResult<()> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "DELETE FROM notes WHERE uuid = ?1;",
            params![id.to_string()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

impl LabelStore for SqliteStore {
    fn load_labels(&self) -> StoreResult<Vec<Label>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT name FROM labels ORDER BY name ASC;")?;
        let labels = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(Label::new)
            .collect();
        Ok(labels)
    }

    fn insert_label(&self, label: &Label) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR IGNORE INTO labels (name) VALUES (?1);",
            params![label.name()],
        )?;
        Ok(())
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Backend(value.to_string())
    }
}

fn parse_note_id(raw: &str) -> StoreResult<NoteId> {
    Uuid::parse_str(raw).map_err(|_| StoreError::Backend(format!("invalid note uuid `{raw}`")))
}

fn folder_to_db(folder: Folder) -> &'static str {
    match folder {
        Folder::Active => "active",
        Folder::Deleted => "deleted",
        Folder::Archived => "archived",
    }
}

fn folder_from_db(raw: &str) -> StoreResult<Folder> {
    match raw {
        "active" => Ok(Folder::Active),
        "deleted" => Ok(Folder::Deleted),
        "archived" => Ok(Folder::Archived),
        other => Err(StoreError::Backend(format!(
            "invalid persisted folder `{other}`"
        ))),
    }
}
