use super::{KeyValueStore, StoreKey};
use crate::error::{Result, VitrineError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File-backed store: one file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: StoreKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(VitrineError::Io)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FsStore {
    fn get(&self, key: StoreKey) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VitrineError::Io(e)),
        }
    }

    fn set(&self, key: StoreKey, value: &[u8]) -> Result<()> {
        self.ensure_dir()?;

        // Atomic write
        let tmp_path = self
            .root
            .join(format!(".{}-{}.tmp", key.file_name(), Uuid::new_v4()));
        fs::write(&tmp_path, value).map_err(VitrineError::Io)?;
        if let Err(e) = fs::rename(&tmp_path, self.path_for(key)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(VitrineError::Io(e));
        }
        Ok(())
    }
}
