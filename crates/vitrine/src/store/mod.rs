//! # Storage Layer
//!
//! Vitrine persists exactly three things, each under a fixed [`StoreKey`]:
//!
//! | Key | Content |
//! |-----|---------|
//! | `Archive` | The archive document (JSON) |
//! | `Preferences` | The preferences document (JSON) |
//! | `Pin` | The PIN secret (opaque bytes) |
//!
//! The [`KeyValueStore`] trait is the whole contract: `get` and `set` of raw bytes.
//! Every write is a full-document overwrite. There is no transaction spanning keys,
//! so a failure between two writes can leave the archive and the preferences out of
//! step; nothing here tries to compensate.
//!
//! ## Implementations
//!
//! - [`fs::FsStore`]: one file per key in a data directory, atomic writes.
//! - [`memory::MemStore`]: for tests and embedding, with write-failure simulation.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── archive.json   # Archive document
//! ├── prefs.json     # Preferences document
//! ├── pin            # PIN secret
//! └── vitrine.toml   # Optional configuration
//! ```

use crate::error::Result;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::rc::Rc;

pub mod fs;
pub mod memory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Archive,
    Preferences,
    Pin,
}

impl StoreKey {
    pub const ALL: [StoreKey; 3] = [StoreKey::Archive, StoreKey::Preferences, StoreKey::Pin];

    /// File name used by file-backed stores.
    pub fn file_name(self) -> &'static str {
        match self {
            StoreKey::Archive => "archive.json",
            StoreKey::Preferences => "prefs.json",
            StoreKey::Pin => "pin",
        }
    }
}

/// Abstract interface for raw key-value persistence.
///
/// All methods take `&self` so one store can be shared by the archive repository,
/// the preferences manager, and the access gate.
pub trait KeyValueStore {
    /// Read the bytes stored under `key`. `Ok(None)` when nothing was ever written.
    fn get(&self, key: StoreKey) -> Result<Option<Vec<u8>>>;

    /// Overwrite the bytes stored under `key`.
    fn set(&self, key: StoreKey, value: &[u8]) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: StoreKey) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: StoreKey, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: StoreKey) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: StoreKey, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Serializes `doc` as pretty JSON under `key`.
pub fn save_json<S, T>(store: &S, key: StoreKey, doc: &T) -> Result<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize,
{
    let bytes = serde_json::to_vec_pretty(doc)?;
    store.set(key, &bytes)?;
    debug!("persisted {:?} ({} bytes)", key, bytes.len());
    Ok(())
}

/// Reads the raw document under `key` and parses it.
///
/// The outer `Result` carries storage failures; the inner one carries parse failures
/// so callers can decide whether a corrupt document is fatal.
pub fn load_json<S, T>(store: &S, key: StoreKey) -> Result<Option<serde_json::Result<T>>>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    Ok(store
        .get(key)?
        .map(|bytes| serde_json::from_slice::<T>(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::memory::MemStore;
    use super::*;
    use crate::model::Archive;

    #[test]
    fn json_helpers_round_trip() {
        let store = MemStore::new();
        let archive = Archive::seeded("T");
        save_json(&store, StoreKey::Archive, &archive).unwrap();

        let loaded: Archive = load_json(&store, StoreKey::Archive)
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(loaded, archive);
    }

    #[test]
    fn load_json_separates_missing_from_corrupt() {
        let store = MemStore::new();
        assert!(load_json::<_, Archive>(&store, StoreKey::Archive)
            .unwrap()
            .is_none());

        store.set(StoreKey::Archive, b"{not json").unwrap();
        let loaded = load_json::<_, Archive>(&store, StoreKey::Archive).unwrap();
        assert!(matches!(loaded, Some(Err(_))));
    }

    #[test]
    fn shared_handles_see_the_same_data() {
        let store = Rc::new(MemStore::new());
        let other = Rc::clone(&store);
        store.set(StoreKey::Pin, b"x").unwrap();
        assert_eq!(other.get(StoreKey::Pin).unwrap(), Some(b"x".to_vec()));
    }
}
