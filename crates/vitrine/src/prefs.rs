//! # Preferences
//!
//! Display preferences live in their own document, independent of the archive.
//!
//! | Key | Values | Default |
//! |-----|--------|---------|
//! | `theme` | `light`, `dark`, or any other string | `dark` |
//! | `anim` | `smooth`, `reduced`, or any other string | `smooth` |
//! | `locked` | derived from PIN presence, read-only | `false` |
//!
//! Unknown theme or animation names are kept verbatim; constraining the choice is up
//! to the client. `locked` is written to the document but never trusted when read: it
//! is recomputed from the PIN store on every load.

use crate::error::{Result, VitrineError};
use crate::store::{load_json, save_json, KeyValueStore, StoreKey};
use log::error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Theme {
    Light,
    Dark,
    Other(String),
}

impl From<String> for Theme {
    fn from(s: String) -> Self {
        match s.as_str() {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            _ => Theme::Other(s),
        }
    }
}

impl From<Theme> for String {
    fn from(theme: Theme) -> Self {
        theme.to_string()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
            Theme::Other(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Animation {
    Smooth,
    Reduced,
    Other(String),
}

impl From<String> for Animation {
    fn from(s: String) -> Self {
        match s.as_str() {
            "smooth" => Animation::Smooth,
            "reduced" => Animation::Reduced,
            _ => Animation::Other(s),
        }
    }
}

impl From<Animation> for String {
    fn from(anim: Animation) -> Self {
        anim.to_string()
    }
}

impl fmt::Display for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Animation::Smooth => f.write_str("smooth"),
            Animation::Reduced => f.write_str("reduced"),
            Animation::Other(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: Theme,
    pub anim: Animation,
    #[serde(default)]
    pub locked: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            anim: Animation::Smooth,
            locked: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefKey {
    Theme,
    Anim,
    Locked,
}

impl PrefKey {
    pub const ALL: [PrefKey; 3] = [PrefKey::Theme, PrefKey::Anim, PrefKey::Locked];

    pub fn as_str(self) -> &'static str {
        match self {
            PrefKey::Theme => "theme",
            PrefKey::Anim => "anim",
            PrefKey::Locked => "locked",
        }
    }
}

impl FromStr for PrefKey {
    type Err = VitrineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "theme" => Ok(PrefKey::Theme),
            "anim" | "animation" => Ok(PrefKey::Anim),
            "locked" => Ok(PrefKey::Locked),
            other => Err(VitrineError::InvalidInput(format!(
                "Unknown preference '{}'",
                other
            ))),
        }
    }
}

impl Preferences {
    pub fn get(&self, key: PrefKey) -> String {
        match key {
            PrefKey::Theme => self.theme.to_string(),
            PrefKey::Anim => self.anim.to_string(),
            PrefKey::Locked => self.locked.to_string(),
        }
    }
}

pub struct PreferencesManager<S: KeyValueStore> {
    store: S,
    prefs: Preferences,
}

impl<S: KeyValueStore> PreferencesManager<S> {
    /// Loads preferences, recomputing `locked` from `has_pin`.
    pub fn load(store: S, has_pin: bool) -> Result<Self> {
        let mut prefs = match load_json::<_, Preferences>(&store, StoreKey::Preferences)? {
            Some(Ok(prefs)) => prefs,
            Some(Err(e)) => {
                error!("Could not parse prefs from storage, using defaults: {}", e);
                Preferences::default()
            }
            None => Preferences::default(),
        };
        prefs.locked = has_pin;
        Ok(Self { store, prefs })
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    pub fn save(&self) -> Result<()> {
        save_json(&self.store, StoreKey::Preferences, &self.prefs)
    }

    /// Sets a preference by key and persists. `locked` is derived and cannot be set.
    pub fn set(&mut self, key: PrefKey, value: &str) -> Result<()> {
        let value = value.trim();
        if value.is_empty() {
            return Err(VitrineError::InvalidInput(format!(
                "A value is required for '{}'",
                key.as_str()
            )));
        }
        match key {
            PrefKey::Theme => self.set_theme(Theme::from(value.to_string())),
            PrefKey::Anim => self.set_anim(Animation::from(value.to_string())),
            PrefKey::Locked => Err(VitrineError::InvalidInput(
                "'locked' follows the PIN; set a PIN instead".to_string(),
            )),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.update(|p| p.theme = theme)
    }

    pub fn set_anim(&mut self, anim: Animation) -> Result<()> {
        self.update(|p| p.anim = anim)
    }

    pub(crate) fn set_locked(&mut self, locked: bool) -> Result<()> {
        self.update(|p| p.locked = locked)
    }

    fn update(&mut self, f: impl FnOnce(&mut Preferences)) -> Result<()> {
        let mut working = self.prefs.clone();
        f(&mut working);
        save_json(&self.store, StoreKey::Preferences, &working)?;
        self.prefs = working;
        Ok(())
    }
}
