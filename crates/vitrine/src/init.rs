//! # Data Directory Resolution
//!
//! Vitrine keeps all of its state in one directory.
//!
//! ## Resolution Order
//!
//! 1. An explicit override (the CLI's `--data` flag).
//! 2. The `VITRINE_DATA` environment variable (also how tests isolate state).
//! 3. The OS-appropriate data directory via the `directories` crate
//!    (e.g. `~/.local/share/vitrine` on Linux).
//!
//! [`initialize`] resolves the directory, loads `vitrine.toml` from it, and opens a
//! [`VitrineApi`] over an [`FsStore`] rooted there. Nothing is written until the first
//! load finds no archive (the seed is persisted) or a mutation happens.

use crate::api::VitrineApi;
use crate::config::VitrineConfig;
use crate::error::{Result, VitrineError};
use crate::store::fs::FsStore;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const DATA_ENV: &str = "VITRINE_DATA";

pub struct VitrineContext {
    pub api: VitrineApi<FsStore>,
    pub data_dir: PathBuf,
}

pub fn resolve_data_dir(data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(DATA_ENV) {
        return Ok(PathBuf::from(path));
    }
    ProjectDirs::from("com", "vitrine", "vitrine")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| VitrineError::Store("Could not determine a data directory".to_string()))
}

pub fn initialize(data_override: Option<PathBuf>) -> Result<VitrineContext> {
    let data_dir = resolve_data_dir(data_override)?;
    open_at(&data_dir)
}

pub fn open_at(data_dir: &Path) -> Result<VitrineContext> {
    let config = VitrineConfig::load(data_dir)?;
    let api = VitrineApi::open(FsStore::new(data_dir), config)?;
    Ok(VitrineContext {
        api,
        data_dir: data_dir.to_path_buf(),
    })
}
