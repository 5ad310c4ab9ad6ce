//! # Access Gate
//!
//! A PIN lock over the archive's contents.
//!
//! ```text
//!   load ── PIN stored? ──yes──▶ Locked ──unlock(correct)──▶ Unlocked
//!              │                                               ▲
//!              └────────no──────────────────────────────────────┘
//!   set_pin(any state) ──▶ Unlocked
//! ```
//!
//! There is no way back to `Locked` within a session; the next load starts locked
//! again if a PIN exists. `set_pin` overwrites any previous PIN without asking for
//! the old one.
//!
//! ## Secret Format
//!
//! PINs are stored as `pbkdf2-sha256$<rounds>$<salt hex>$<key hex>`, a PBKDF2-HMAC-SHA256
//! key derived from a random salt. Two older forms still unlock:
//!
//! - `sha256$<salt hex>$<digest hex>`: a single salted SHA-256 round.
//! - anything else: a clear-text PIN, compared directly.
//!
//! Both are rewritten in the current form after the first successful unlock. A failed
//! rewrite is logged and does not keep the gate shut.

use crate::error::{Result, VitrineError};
use crate::store::{KeyValueStore, StoreKey};
use log::{info, warn};
use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256};
use uuid::Uuid;

const SCHEME: &str = "pbkdf2-sha256";
const SALTED_SHA256_SCHEME: &str = "sha256";
const PIN_ROUNDS: u32 = 100_000;
const KEY_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Locked,
    Unlocked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PinRecord {
    Derived {
        rounds: u32,
        salt: String,
        key: String,
    },
    SaltedSha256 {
        salt: String,
        digest: String,
    },
    Legacy(String),
}

impl PinRecord {
    fn new(pin: &str) -> Self {
        let salt = hex::encode(Uuid::new_v4().as_bytes());
        let key = derive_key(pin, &salt, PIN_ROUNDS);
        PinRecord::Derived {
            rounds: PIN_ROUNDS,
            salt,
            key,
        }
    }

    fn parse(raw: &[u8]) -> Self {
        let text = String::from_utf8_lossy(raw);
        let parts: Vec<&str> = text.trim_end().split('$').collect();
        match parts.as_slice() {
            [SCHEME, rounds, salt, key] => match rounds.parse::<u32>() {
                Ok(rounds) if rounds > 0 => PinRecord::Derived {
                    rounds,
                    salt: salt.to_string(),
                    key: key.to_string(),
                },
                _ => PinRecord::Legacy(text.to_string()),
            },
            [SALTED_SHA256_SCHEME, salt, digest] => PinRecord::SaltedSha256 {
                salt: salt.to_string(),
                digest: digest.to_string(),
            },
            _ => PinRecord::Legacy(text.to_string()),
        }
    }

    fn encode(&self) -> String {
        match self {
            PinRecord::Derived { rounds, salt, key } => {
                format!("{}${}${}${}", SCHEME, rounds, salt, key)
            }
            PinRecord::SaltedSha256 { salt, digest } => {
                format!("{}${}${}", SALTED_SHA256_SCHEME, salt, digest)
            }
            PinRecord::Legacy(pin) => pin.clone(),
        }
    }

    fn verify(&self, candidate: &str) -> bool {
        match self {
            PinRecord::Derived { rounds, salt, key } => constant_time_eq(
                derive_key(candidate, salt, *rounds).as_bytes(),
                key.as_bytes(),
            ),
            PinRecord::SaltedSha256 { salt, digest } => {
                constant_time_eq(salted_sha256(salt, candidate).as_bytes(), digest.as_bytes())
            }
            PinRecord::Legacy(pin) => constant_time_eq(pin.as_bytes(), candidate.as_bytes()),
        }
    }

    /// Whether the record is weaker than what [`PinRecord::new`] writes today.
    fn is_outdated(&self) -> bool {
        !matches!(self, PinRecord::Derived { rounds, .. } if *rounds >= PIN_ROUNDS)
    }
}

fn derive_key(pin: &str, salt: &str, rounds: u32) -> String {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(pin.as_bytes(), salt.as_bytes(), rounds, &mut key);
    hex::encode(key)
}

fn salted_sha256(salt: &str, pin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(pin.as_bytes());
    hex::encode(hasher.finalize())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

pub struct AccessGate<S: KeyValueStore> {
    store: S,
    state: GateState,
}

impl<S: KeyValueStore> AccessGate<S> {
    pub fn load(store: S) -> Result<Self> {
        let state = if read_record(&store)?.is_some() {
            GateState::Locked
        } else {
            GateState::Unlocked
        };
        Ok(Self { store, state })
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == GateState::Locked
    }

    pub fn has_pin(&self) -> Result<bool> {
        Ok(read_record(&self.store)?.is_some())
    }

    /// Tries `pin` against the stored secret. Returns whether the gate is now open.
    pub fn unlock(&mut self, pin: &str) -> Result<bool> {
        let Some(record) = read_record(&self.store)? else {
            self.state = GateState::Unlocked;
            return Ok(true);
        };

        let pin = pin.trim();
        if !record.verify(pin) {
            warn!("Wrong PIN");
            return Ok(false);
        }

        self.state = GateState::Unlocked;

        if record.is_outdated() {
            match self
                .store
                .set(StoreKey::Pin, PinRecord::new(pin).encode().as_bytes())
            {
                Ok(()) => info!("Upgraded stored PIN to the current format"),
                Err(e) => warn!("Could not upgrade stored PIN: {}", e),
            }
        }
        Ok(true)
    }

    /// Replaces the PIN unconditionally and opens the gate.
    pub fn set_pin(&mut self, new_pin: &str) -> Result<()> {
        let new_pin = new_pin.trim();
        if new_pin.is_empty() {
            return Err(VitrineError::InvalidInput("PIN cannot be empty".to_string()));
        }
        self.store
            .set(StoreKey::Pin, PinRecord::new(new_pin).encode().as_bytes())?;
        self.state = GateState::Unlocked;
        Ok(())
    }
}

fn read_record<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<PinRecord>> {
    Ok(store
        .get(StoreKey::Pin)?
        .filter(|raw| !raw.is_empty())
        .map(|raw| PinRecord::parse(&raw)))
}
