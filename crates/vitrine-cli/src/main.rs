//! # Vitrine CLI Architecture
//!
//! Vitrine ships with a command-line client, but the binary is intentionally thin:
//! the CLI lives in `src/cli/`, while this file only invokes `cli::run()` and
//! handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/vitrine/`: core library with UI-agnostic archive logic
//! - `crates/vitrine-cli/`: this CLI tool, depends on the `vitrine` library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/vitrine-cli/src/cli/)                    │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Command dispatch + context wiring (commands.rs)          │
//! │  - Terminal rendering with console styles (render.rs)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/vitrine/src/api.rs)                      │
//! │  - Resolves ids / positions, enforces the PIN gate          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Components (repo, search, prefs, gate) + Storage           │
//! │  - No knowledge of stdout/stderr or process exits           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The CLI layer is responsible for **all** user-facing concerns: argument parsing,
//! reading image and import files, logging setup, error messages, and rendering.
//!
//! ## Testing Approach
//!
//! - **Library**: unit tests next to each component plus integration tests over a
//!   temporary data directory.
//! - **CLI**: rendering helpers are unit tested with colors disabled; end-to-end
//!   behavior is covered in `tests/` by running the binary with `VITRINE_DATA`
//!   pointing at a temporary directory.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
