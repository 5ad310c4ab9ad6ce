//! # Vitrine Architecture
//!
//! Vitrine is a **UI-agnostic collection archive**. It keeps named categories of items
//! (title, description, URL, tags, image, favorite flag), persists them locally, and
//! exposes search, favorite filtering, a PIN lock, and JSON import/export. The CLI in
//! `vitrine-cli` is one client of this library, not the application itself.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Client (vitrine-cli, or any other UI)                      │
//! │  - Input collection, confirmations, rendering               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Resolves ids / positions, enforces the access gate       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Components                                                 │
//! │  - repo.rs   archive CRUD, import/export (write-through)    │
//! │  - search.rs search and favorite filtering (read-only)      │
//! │  - prefs.rs  theme / animation preferences                  │
//! │  - gate.rs   PIN lock                                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - KeyValueStore trait, three fixed keys                    │
//! │  - FsStore (production), MemStore (testing)                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes plain Rust values and returns `Result`s. It never
//! writes to stdout/stderr, never prompts, and never exits the process. Diagnostics go
//! through the `log` facade; the client decides whether and where they appear.
//!
//! ## Write-Through Persistence
//!
//! Every mutation persists the full affected document before returning. A failed write
//! is returned as an error and the in-memory state is left unchanged.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`repo`]: Archive repository
//! - [`search`]: Search and filtering
//! - [`prefs`]: Preferences manager
//! - [`gate`]: PIN access gate
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`Archive`, `Category`, `Item`)
//! - [`index`]: Id-or-position references
//! - [`config`]: Configuration
//! - [`init`]: Data directory resolution and startup
//! - [`error`]: Error types

pub mod api;
pub mod config;
pub mod error;
pub mod gate;
pub mod index;
pub mod init;
pub mod model;
pub mod prefs;
pub mod repo;
pub mod search;
pub mod store;
