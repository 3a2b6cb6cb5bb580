use crate::error::StoreError;
use crate::storage::KeyValueStore;
use std::path::{Path, PathBuf};

const DATA_DIR_ENV_VAR: &str = "TASKBOARD_DATA_DIR";

/// File-backed key-value store. Each key maps to `<dir>/<key>.json`;
/// writes overwrite the whole file.
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the default data directory (see [`data_dir`]).
    pub fn open_default() -> Result<Self, StoreError> {
        Ok(Self::new(data_dir()?))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|err| StoreError::io(format!("{}: {}", path.display(), err)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|err| StoreError::io(err.to_string()))?;
        let path = self.key_path(key);
        std::fs::write(&path, value).map_err(|err| StoreError::io(err.to_string()))?;
        restrict_permissions(&path)?;
        Ok(())
    }
}

pub fn data_dir() -> Result<PathBuf, StoreError> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV_VAR)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| StoreError::corrupt_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("taskboard"))
    } else {
        let home = std::env::var("HOME").map_err(|_| StoreError::corrupt_data("HOME is not set"))?;
        Ok(PathBuf::from(home).join(".config").join("taskboard"))
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    let permissions = std::fs::Permissions::from_mode(0o600);
    std::fs::set_permissions(path, permissions).map_err(|err| StoreError::io(err.to_string()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::FileKvStore;
    use crate::storage::KeyValueStore;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("taskboard-{nanos}-{name}"))
    }

    #[test]
    fn get_of_absent_key_is_none() {
        let store = FileKvStore::new(temp_dir("absent"));
        assert_eq!(store.get("tasks").unwrap(), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let dir = temp_dir("round-trip");
        let store = FileKvStore::new(&dir);

        store.set("tasks", "[]").unwrap();
        let loaded = store.get("tasks").unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(loaded.as_deref(), Some("[]"));
    }

    #[test]
    fn set_overwrites_prior_snapshot() {
        let dir = temp_dir("overwrite");
        let store = FileKvStore::new(&dir);

        store.set("profile", "{\"name\":\"a\"}").unwrap();
        store.set("profile", "{\"name\":\"b\"}").unwrap();
        let loaded = store.get("profile").unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(loaded.as_deref(), Some("{\"name\":\"b\"}"));
    }

    #[test]
    fn keys_map_to_separate_files() {
        let dir = temp_dir("separate");
        let store = FileKvStore::new(&dir);

        store.set("tasks", "[]").unwrap();
        store.set("profile", "{}").unwrap();
        let exists = dir.join("tasks.json").exists() && dir.join("profile.json").exists();
        std::fs::remove_dir_all(&dir).ok();

        assert!(exists);
    }
}
