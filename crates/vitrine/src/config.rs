//! # Configuration
//!
//! Vitrine configuration is managed by [`confique`], layering environment variables
//! over an optional TOML file over compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `VITRINE_TITLE`, `VITRINE_SEED_DEFAULTS`, `VITRINE_EXPORT_FILE`.
//! 2. **Config file**: `vitrine.toml` in the data directory.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `title` | `Sports Car Archive` | Title given to a newly created archive |
//! | `seed_defaults` | `true` | Whether a new archive starts with the default categories |
//! | `export_file` | `archive.json` | Default path for `vitrine export` |

use crate::error::Result;
use crate::repo::ArchiveSeed;
use confique::Config;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "vitrine.toml";

/// Configuration for vitrine, stored in `vitrine.toml`.
#[derive(Config, Debug, Clone, PartialEq, Eq)]
pub struct VitrineConfig {
    /// Title given to a newly created archive.
    #[config(env = "VITRINE_TITLE", default = "Sports Car Archive")]
    pub title: String,

    /// Seed a new archive with the default categories.
    #[config(env = "VITRINE_SEED_DEFAULTS", default = true)]
    pub seed_defaults: bool,

    /// Default destination for exports.
    #[config(env = "VITRINE_EXPORT_FILE", default = "archive.json")]
    pub export_file: String,
}

impl Default for VitrineConfig {
    fn default() -> Self {
        Self {
            title: crate::model::DEFAULT_ARCHIVE_TITLE.to_string(),
            seed_defaults: true,
            export_file: "archive.json".to_string(),
        }
    }
}

impl VitrineConfig {
    /// Loads configuration from the environment and `<data_dir>/vitrine.toml`.
    /// A missing file is fine; a malformed one is an error.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config = VitrineConfig::builder()
            .env()
            .file(data_dir.join(CONFIG_FILENAME))
            .load()?;
        Ok(config)
    }

    pub fn seed(&self) -> ArchiveSeed {
        ArchiveSeed {
            title: self.title.clone(),
            default_categories: self.seed_defaults,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VitrineConfig::default();
        assert_eq!(config.title, "Sports Car Archive");
        assert!(config.seed_defaults);
        assert_eq!(config.export_file, "archive.json");
    }

    #[test]
    fn test_seed_follows_config() {
        let config = VitrineConfig {
            seed_defaults: false,
            title: "Watches".to_string(),
            ..Default::default()
        };
        let seed = config.seed();
        assert_eq!(seed.build().title, "Watches");
        assert!(seed.build().categories.is_empty());
    }

    #[test]
    fn test_load_reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILENAME),
            "title = \"Vinyl\"\nseed_defaults = false\n",
        )
        .unwrap();
        let config = VitrineConfig::load(dir.path()).unwrap();
        assert_eq!(config.title, "Vinyl");
        assert!(!config.seed_defaults);
        assert_eq!(config.export_file, "archive.json");
    }

    #[test]
    fn test_load_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "title = [").unwrap();
        assert!(VitrineConfig::load(dir.path()).is_err());
    }
}
