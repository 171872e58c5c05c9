//! Key-value persistence for the outcome recorder and settings
//!
//! LocalStorage on the web, one JSON file per key natively, an in-memory map
//! for tests. Values are JSON strings.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Persistence failures. Never affect a run that has already ended.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistError>;
}

/// Load a JSON value, falling back to the default when missing or corrupt
pub fn load_or_default<T, S>(storage: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: Storage + ?Sized,
{
    match storage.get(key) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Discarding corrupt {}: {}", key, e);
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(e) => {
            log::warn!("Could not read {}: {}", key, e);
            T::default()
        }
    }
}

pub fn save_json<T, S>(storage: &mut S, key: &str, value: &T) -> Result<(), PersistError>
where
    T: Serialize + ?Sized,
    S: Storage + ?Sized,
{
    let json = serde_json::to_string(value)?;
    storage.set(key, &json)
}

/// In-memory storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileStorage;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{PersistError, Storage};

    /// One `<key>.json` file per key under a directory
    #[derive(Debug, Clone)]
    pub struct FileStorage {
        dir: PathBuf,
    }

    impl FileStorage {
        pub fn new(dir: impl Into<PathBuf>) -> Result<Self, PersistError> {
            let dir = dir.into();
            std::fs::create_dir_all(&dir)?;
            Ok(Self { dir })
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }

        fn path(&self, key: &str) -> PathBuf {
            self.dir.join(format!("{key}.json"))
        }
    }

    impl Storage for FileStorage {
        fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
            match std::fs::read_to_string(self.path(key)) {
                Ok(s) => Ok(Some(s)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
            // Write-then-rename so a crash never leaves a torn file
            let tmp = self.dir.join(format!("{key}.json.tmp"));
            std::fs::write(&tmp, value)?;
            std::fs::rename(&tmp, self.path(key))?;
            Ok(())
        }

        fn remove(&mut self, key: &str) -> Result<(), PersistError> {
            match std::fs::remove_file(self.path(key)) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{PersistError, Storage};

    /// Browser LocalStorage
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LocalStorage;

    impl LocalStorage {
        fn storage() -> Result<web_sys::Storage, PersistError> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or_else(|| PersistError::Unavailable("localStorage".to_string()))
        }
    }

    impl Storage for LocalStorage {
        fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
            Self::storage()?
                .get_item(key)
                .map_err(|e| PersistError::Unavailable(format!("{e:?}")))
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
            Self::storage()?
                .set_item(key, value)
                .map_err(|e| PersistError::Unavailable(format!("{e:?}")))
        }

        fn remove(&mut self, key: &str) -> Result<(), PersistError> {
            Self::storage()?
                .remove_item(key)
                .map_err(|e| PersistError::Unavailable(format!("{e:?}")))
        }
    }
}
