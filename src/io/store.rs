use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::io::recovery::{RecoveryEntry, atomic_write, log_recovery};
use crate::model::task::{Task, TaskRecord};

/// Store key for the display name.
pub const KEY_USER_NAME: &str = "userName";
/// Store key for the serialized task list.
pub const KEY_TASKS: &str = "tasks";

const STORE_FILE: &str = "store.json";

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not determine a data directory (set $HOME or pass --data-dir)")]
    NoDataDir,
    #[error("could not create {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The default data directory, respecting `$XDG_DATA_HOME`.
pub fn default_data_dir() -> Result<PathBuf, StoreError> {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME")
        && !xdg.is_empty()
    {
        return Ok(PathBuf::from(xdg).join("tend"));
    }
    std::env::var("HOME")
        .map(|home| PathBuf::from(home).join(".local/share/tend"))
        .map_err(|_| StoreError::NoDataDir)
}

/// A string-keyed store persisted as one JSON document. Every `set` rewrites
/// the whole document atomically, so a reader never sees a partial write.
#[derive(Debug)]
pub struct KvStore {
    dir: PathBuf,
    values: BTreeMap<String, String>,
    /// False when the persisted document existed but could not be parsed;
    /// the store then starts empty and the raw text goes to the recovery log.
    intact: bool,
}

impl KvStore {
    /// Open the store in `dir`, creating the directory if needed. A missing
    /// document is an empty store; a malformed one fails closed.
    pub fn open(dir: &Path) -> Result<KvStore, StoreError> {
        fs::create_dir_all(dir).map_err(|e| StoreError::CreateError {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = dir.join(STORE_FILE);
        let (values, intact) = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<BTreeMap<String, String>>(&text) {
                Ok(values) => (values, true),
                Err(_) => {
                    log_recovery(
                        dir,
                        RecoveryEntry {
                            timestamp: Utc::now(),
                            description: "store document could not be parsed".into(),
                            body: text,
                        },
                    );
                    (BTreeMap::new(), false)
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => (BTreeMap::new(), true),
            Err(e) => {
                return Err(StoreError::ReadError { path, source: e });
            }
        };

        Ok(KvStore {
            dir: dir.to_path_buf(),
            values,
            intact,
        })
    }

    /// Whether the persisted document parsed on open.
    pub fn document_intact(&self) -> bool {
        self.intact
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| v.as_str())
    }

    /// Set a value and persist the full document.
    pub fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }

    fn flush(&self) -> Result<(), StoreError> {
        let path = self.dir.join(STORE_FILE);
        let text = serde_json::to_string_pretty(&self.values).expect("string map serializes");
        atomic_write(&path, text.as_bytes()).map_err(|e| StoreError::WriteError {
            path,
            source: e,
        })
    }
}

// ---------------------------------------------------------------------------
// Task list + profile adapter
// ---------------------------------------------------------------------------

/// Result of reading the task list from the store.
#[derive(Debug)]
pub struct LoadedTasks {
    pub tasks: Vec<Task>,
    /// False when a `tasks` value existed but could not be parsed; the list
    /// is then empty and the raw value has been sent to the recovery log.
    pub intact: bool,
}

/// Read the display name, if one was ever persisted.
pub fn load_name(store: &KvStore) -> Option<String> {
    store
        .get(KEY_USER_NAME)
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
}

/// Persist the display name.
pub fn save_name(store: &mut KvStore, name: &str) -> Result<(), StoreError> {
    store.set(KEY_USER_NAME, name.to_string())
}

/// Read the task list from the `tasks` key. A missing key is an empty list;
/// a value that fails to parse as a record array fails closed.
pub fn load_tasks(store: &KvStore) -> LoadedTasks {
    let raw = match store.get(KEY_TASKS) {
        Some(raw) => raw,
        None => {
            return LoadedTasks {
                tasks: Vec::new(),
                intact: true,
            };
        }
    };

    match serde_json::from_str::<Vec<TaskRecord>>(raw) {
        Ok(records) => LoadedTasks {
            tasks: records.into_iter().map(TaskRecord::into_task).collect(),
            intact: true,
        },
        Err(_) => {
            log_recovery(
                store.dir(),
                RecoveryEntry {
                    timestamp: Utc::now(),
                    description: "tasks value could not be parsed".into(),
                    body: raw.to_string(),
                },
            );
            LoadedTasks {
                tasks: Vec::new(),
                intact: false,
            }
        }
    }
}

/// Persist the whole task list, overwriting the previous value.
pub fn save_tasks(store: &mut KvStore, tasks: &[Task]) -> Result<(), StoreError> {
    let records: Vec<TaskRecord> = tasks.iter().map(TaskRecord::from_task).collect();
    let text = serde_json::to_string(&records).expect("records serialize");
    store.set(KEY_TASKS, text)
}
