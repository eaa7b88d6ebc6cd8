//! Stage progress persistence
//!
//! Only the current stage number is saved, as a JSON integer under
//! [`STAGE_KEY`]. A broken or missing store never stops the game: loads fall
//! back to stage 1 and failed saves are skipped.

use std::collections::HashMap;

use crate::consts::MAX_STAGE;

/// Storage key for the current stage
pub const STAGE_KEY: &str = "qb-stage";

/// Stage used when nothing valid is saved
pub const DEFAULT_STAGE: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage read failed: {0}")]
    Read(String),
    #[error("storage write failed: {0}")]
    Write(String),
}

/// Minimal string key-value store (LocalStorage on web)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    /// Grab `window.localStorage`; a missing or blocked store is kept as `None`
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable, progress will not be saved");
        }
        Self { storage }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .get_item(key)
            .map_err(|e| StorageError::Read(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write(format!("{e:?}")))
    }
}

/// Parse a saved stage. Anything but an integer in `1..=MAX_STAGE` is rejected.
pub fn parse_stage(raw: &str) -> Option<u32> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    let stage = match value.as_u64() {
        Some(n) => n,
        None => {
            let f = value.as_f64()?;
            if !f.is_finite() || f.fract() != 0.0 || f < 0.0 {
                return None;
            }
            f as u64
        }
    };
    u32::try_from(stage)
        .ok()
        .filter(|s| (1..=MAX_STAGE).contains(s))
}

/// Saved stage progress on top of a key-value store
pub struct StageProgress<S: KeyValueStore> {
    store: S,
    last_saved: Option<u32>,
}

impl<S: KeyValueStore> StageProgress<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            last_saved: None,
        }
    }

    /// Saved stage, if one is present and valid
    pub fn load(&mut self) -> Option<u32> {
        let raw = match self.store.get(STAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::debug!("Ignoring stage load failure: {e}");
                return None;
            }
        };
        let stage = parse_stage(&raw);
        match stage {
            Some(stage) => {
                log::info!("Loaded saved stage {}", stage);
                self.last_saved = Some(stage);
            }
            None => log::debug!("Discarding malformed saved stage {:?}", raw),
        }
        stage
    }

    /// Stage to start on
    pub fn initial_stage(&mut self) -> u32 {
        self.load().unwrap_or(DEFAULT_STAGE)
    }

    /// Persist `stage` if it differs from what was last written
    pub fn save(&mut self, stage: u32) {
        if self.last_saved == Some(stage) {
            return;
        }
        let json = match serde_json::to_string(&stage) {
            Ok(json) => json,
            Err(e) => {
                log::debug!("Skipping stage save: {e}");
                return;
            }
        };
        match self.store.set(STAGE_KEY, &json) {
            Ok(()) => {
                self.last_saved = Some(stage);
                log::info!("Stage {} saved", stage);
            }
            Err(e) => log::debug!("Skipping stage save: {e}"),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
