use crate::error::AppError;
use crate::model::Task;
use std::collections::HashMap;
use std::path::PathBuf;

/// Fixed key the whole collection is persisted under.
pub const STORE_KEY: &str = "tasks";

const STORE_ENV_VAR: &str = "TASKLIST_STORE_PATH";

/// Durable key-value collaborator. The controller overwrites the value under
/// [`STORE_KEY`] on every mutation and reads it back once at startup.
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError>;
}

/// The persisted format is a bare JSON array of task records.
pub fn encode_tasks(tasks: &[Task]) -> Result<String, AppError> {
    serde_json::to_string_pretty(tasks).map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn decode_tasks(raw: &str) -> Result<Vec<Task>, AppError> {
    serde_json::from_str(raw).map_err(|err| AppError::invalid_data(err.to_string()))
}

/// One file per key under a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn open_default() -> Result<Self, AppError> {
        Ok(Self {
            root: default_root()?,
        })
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

fn default_root() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("tasklist"))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home).join(".config").join("tasklist"))
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content =
            std::fs::read_to_string(&path).map_err(|err| AppError::io(err.to_string()))?;
        Ok(Some(content))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        std::fs::create_dir_all(&self.root).map_err(|err| AppError::io(err.to_string()))?;
        let path = self.entry_path(key);
        std::fs::write(&path, value).map_err(|err| AppError::io(err.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&path, permissions)
                .map_err(|err| AppError::io(err.to_string()))?;
        }

        Ok(())
    }
}

/// In-memory store for tests and embedders that bring their own persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{BlobStore, FileStore, MemoryStore, STORE_KEY, decode_tasks, encode_tasks};
    use crate::model::{Priority, Task};
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_root(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("tasklist-{nanos}-{name}"))
    }

    #[test]
    fn encode_decode_round_trip_preserves_records_and_order() {
        let tasks = vec![
            Task {
                text: "first".to_string(),
                date: "2099-01-01".to_string(),
                time: "09:00".to_string(),
                priority: Priority::High,
            },
            Task {
                text: "second".to_string(),
                date: "2099-01-01".to_string(),
                time: "10:00".to_string(),
                priority: Priority::Low,
            },
        ];

        let encoded = encode_tasks(&tasks).unwrap();
        let decoded = decode_tasks(&encoded).unwrap();

        assert_eq!(decoded, tasks);
    }

    #[test]
    fn decode_rejects_corrupt_payload() {
        let err = decode_tasks("{ not json ").unwrap_err();
        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn decode_accepts_records_without_priority() {
        let raw = "[{\"text\":\"demo\",\"date\":\"2099-01-01\",\"time\":\"10:00\"}]";
        let decoded = decode_tasks(raw).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].priority, Priority::Medium);
    }

    #[test]
    fn file_store_get_missing_key_is_none() {
        let store = FileStore::with_root(temp_root("missing"));
        assert_eq!(store.get(STORE_KEY).unwrap(), None);
    }

    #[test]
    fn file_store_set_then_get_round_trips() {
        let root = temp_root("round-trip");
        let mut store = FileStore::with_root(&root);

        store.set(STORE_KEY, "[]").unwrap();
        let value = store.get(STORE_KEY).unwrap();
        std::fs::remove_dir_all(&root).ok();

        assert_eq!(value.as_deref(), Some("[]"));
    }

    #[test]
    fn file_store_writes_one_file_per_key() {
        let root = temp_root("per-key");
        let mut store = FileStore::with_root(&root);

        store.set(STORE_KEY, "[]").unwrap();
        let exists = root.join("tasks.json").exists();
        std::fs::remove_dir_all(&root).ok();

        assert!(exists);
    }

    #[test]
    fn memory_store_overwrites_previous_value() {
        let mut store = MemoryStore::new();
        store.set(STORE_KEY, "old").unwrap();
        store.set(STORE_KEY, "new").unwrap();

        assert_eq!(store.get(STORE_KEY).unwrap().as_deref(), Some("new"));
        assert_eq!(store.value(STORE_KEY), Some("new"));
    }
}
