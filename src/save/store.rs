//! Where save blobs live. Two independent sinks (a fast cache and a durable
//! store) sit behind the same [`SaveStore`] port.

use bevy::prelude::*;
use bevy::tasks::IoTaskPool;
use std::sync::{Arc, Mutex};
#[cfg(not(target_arch = "wasm32"))]
use std::{fs, path::PathBuf};

use super::codec::{decode, SaveData, SaveError};

pub trait SaveStore: Send + Sync + 'static {
    /// Short name for log lines.
    fn label(&self) -> &str;
    /// The stored blob, or `None` if nothing has been saved.
    fn read(&self) -> Result<Option<String>, SaveError>;
    fn write(&self, blob: &str) -> Result<(), SaveError>;
    fn clear(&self) -> Result<(), SaveError>;
}

// ═══════════════════════════════════════════════════════════════════════
// BACKENDS
// ═══════════════════════════════════════════════════════════════════════

/// One blob per file. Writes land in a uniquely named sibling temp file and
/// are renamed into place, one writer at a time.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    label: String,
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            write_lock: Arc::default(),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl SaveStore for FileStore {
    fn label(&self) -> &str {
        &self.label
    }

    fn read(&self) -> Result<Option<String>, SaveError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, blob: &str) -> Result<(), SaveError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| SaveError::Unavailable(format!("{} lock poisoned", self.label)))?;
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp_path = self
            .path
            .with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));
        if let Err(e) = fs::write(&tmp_path, blob).and_then(|_| fs::rename(&tmp_path, &self.path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), SaveError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// In-process slot. Clones share the same slot, so a test can keep a handle
/// and inspect what the game wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    label: String,
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            slot: Arc::default(),
        }
    }

    /// Pre-seeds the slot.
    pub fn with_blob(label: impl Into<String>, blob: impl Into<String>) -> Self {
        let store = Self::new(label);
        if let Ok(mut slot) = store.slot.lock() {
            *slot = Some(blob.into());
        }
        store
    }
}

impl SaveStore for MemoryStore {
    fn label(&self) -> &str {
        &self.label
    }

    fn read(&self) -> Result<Option<String>, SaveError> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| SaveError::Unavailable(format!("{} lock poisoned", self.label)))?;
        Ok(slot.clone())
    }

    fn write(&self, blob: &str) -> Result<(), SaveError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| SaveError::Unavailable(format!("{} lock poisoned", self.label)))?;
        *slot = Some(blob.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SaveError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| SaveError::Unavailable(format!("{} lock poisoned", self.label)))?;
        *slot = None;
        Ok(())
    }
}

/// Browser `localStorage` under a fixed key.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage(&self) -> Result<web_sys::Storage, SaveError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| SaveError::Unavailable("localStorage".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl SaveStore for LocalStorageStore {
    fn label(&self) -> &str {
        &self.key
    }

    fn read(&self) -> Result<Option<String>, SaveError> {
        self.storage()?
            .get_item(&self.key)
            .map_err(|e| SaveError::Unavailable(format!("{:?}", e)))
    }

    fn write(&self, blob: &str) -> Result<(), SaveError> {
        self.storage()?
            .set_item(&self.key, blob)
            .map_err(|e| SaveError::Unavailable(format!("{:?}", e)))
    }

    fn clear(&self) -> Result<(), SaveError> {
        self.storage()?
            .remove_item(&self.key)
            .map_err(|e| SaveError::Unavailable(format!("{:?}", e)))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SINKS
// ═══════════════════════════════════════════════════════════════════════

/// The cache and durable stores, read in that order.
#[derive(Resource, Clone)]
pub struct SaveSinks {
    pub cache: Arc<dyn SaveStore>,
    pub durable: Arc<dyn SaveStore>,
    /// Write on the I/O task pool instead of the calling thread.
    pub background: bool,
}

impl SaveSinks {
    pub fn new(cache: impl SaveStore, durable: impl SaveStore) -> Self {
        Self {
            cache: Arc::new(cache),
            durable: Arc::new(durable),
            background: true,
        }
    }

    /// Writes happen inline, so callers can inspect the stores right after a
    /// frame.
    pub fn blocking(cache: impl SaveStore, durable: impl SaveStore) -> Self {
        Self {
            background: false,
            ..Self::new(cache, durable)
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn on_disk(dir: &std::path::Path) -> Self {
        Self::new(
            FileStore::new("cache", dir.join("cache.sav")),
            FileStore::new("durable", dir.join("pasture.sav")),
        )
    }

    #[cfg(target_arch = "wasm32")]
    pub fn browser() -> Self {
        Self::new(
            LocalStorageStore::new("pasture-cache"),
            LocalStorageStore::new("pasture-save"),
        )
    }

    /// The first snapshot that decodes, cache first. A blob that fails to
    /// decode is purged from its store.
    pub fn load(&self) -> Option<SaveData> {
        [&self.cache, &self.durable]
            .into_iter()
            .find_map(|store| load_from(store.as_ref()))
    }

    /// Writes `blob` to the cache, and to the durable store too if asked.
    pub fn persist(&self, blob: String, durable: bool) {
        let mut targets = vec![Arc::clone(&self.cache)];
        if durable {
            targets.push(Arc::clone(&self.durable));
        }
        match IoTaskPool::try_get().filter(|_| self.background) {
            Some(pool) => pool
                .spawn(async move { write_all(&targets, &blob) })
                .detach(),
            None => write_all(&targets, &blob),
        }
    }

    /// Empties both stores.
    pub fn clear(&self) {
        for store in [&self.cache, &self.durable] {
            if let Err(e) = store.clear() {
                warn!("[Save] Could not clear {}: {}", store.label(), e);
            }
        }
    }
}

fn load_from(store: &dyn SaveStore) -> Option<SaveData> {
    let blob = match store.read() {
        Ok(Some(blob)) => blob,
        Ok(None) => return None,
        Err(e) => {
            warn!("[Save] {} unreadable: {}", store.label(), e);
            return None;
        }
    };
    match decode(&blob) {
        Ok(data) => {
            info!("[Save] Restored from {}", store.label());
            Some(data)
        }
        Err(e) => {
            warn!("[Save] {} is corrupt ({}), purging it", store.label(), e);
            if let Err(e) = store.clear() {
                warn!("[Save] Could not purge {}: {}", store.label(), e);
            }
            None
        }
    }
}

fn write_all(targets: &[Arc<dyn SaveStore>], blob: &str) {
    for store in targets {
        if let Err(e) = store.write(blob) {
            warn!("[Save] Write to {} failed: {}", store.label(), e);
        }
    }
}
