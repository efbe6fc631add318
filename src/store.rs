use chrono::Local;
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;

/// Error type for settings persistence.
#[derive(Debug)]
pub enum StoreError {
    /// The backing database rejected a statement.
    Sqlite(rusqlite::Error),
    /// A value could not be encoded as JSON.
    Serialize(serde_json::Error),
    /// The database directory could not be created.
    Io(std::io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Sqlite(e) => write!(f, "settings database error: {}", e),
            StoreError::Serialize(e) => write!(f, "failed to encode setting: {}", e),
            StoreError::Io(e) => write!(f, "settings directory error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Sqlite(e) => Some(e),
            StoreError::Serialize(e) => Some(e),
            StoreError::Io(e) => Some(e),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Sqlite(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialize(err)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

/// Key-value store holding JSON-encoded settings, one entry per key.
pub trait SettingsStore {
    /// Raw JSON text stored under `key`, if any.
    fn load_raw(&self, key: &str) -> Option<String>;
    fn save_raw(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Load and decode `key`, falling back to `default` when the key is absent
/// or its stored value does not decode.
pub fn load<T, S>(store: &S, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    S: SettingsStore + ?Sized,
{
    let Some(raw) = store.load_raw(key) else {
        return default;
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            debug!("ignoring unreadable value for '{key}': {e}");
            default
        }
    }
}

pub fn save<T, S>(store: &S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: SettingsStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.save_raw(key, &raw)
}

/// SQLite-backed settings store
#[derive(Debug)]
pub struct SqliteSettingsStore {
    conn: Connection,
}

impl SqliteSettingsStore {
    /// Open the store at the default location under $HOME/.local/state/timestable
    pub fn open_default() -> Result<Self, StoreError> {
        let path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("timestable_settings.db"));
        Self::open(path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        debug!("opening settings database at {}", path.display());
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        Ok(Self { conn })
    }
}

impl SettingsStore for SqliteSettingsStore {
    fn load_raw(&self, key: &str) -> Option<String> {
        self.conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .unwrap_or_else(|e| {
                warn!("failed to read setting '{key}': {e}");
                None
            })
    }

    fn save_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value, Local::now().to_rfc3339()],
        )?;

        Ok(())
    }
}

/// In-memory store for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text without any encoding, e.g. to simulate corrupt data.
    pub fn insert_raw(&self, key: &str, raw: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), raw.to_string());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.borrow().contains_key(key)
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load_raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn save_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.insert_raw(key, value);
        Ok(())
    }
}
