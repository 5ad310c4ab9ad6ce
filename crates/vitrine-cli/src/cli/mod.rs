//! # CLI Behavior
//!
//! This is **one possible UI client** for vitrine, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and output formatting.
//!
//! For the overall architecture, see the crate-level documentation in [`crate`].
//!
//! ### Naked Execution (`vitrine`)
//!
//! Running `vitrine` with no arguments lists the categories, same as `vitrine categories`.
//!
//! ### References
//!
//! Categories and items are addressed by id or by their 1-based position in the full
//! list, as printed by `vitrine categories` and `vitrine item list <category>`.
//!
//! ### Locked Archives
//!
//! Once a PIN is set, every later invocation starts locked. Pass the PIN with `--pin`
//! (or `VITRINE_PIN`) to open the archive for that invocation. Preferences and
//! `pin set` remain available without it.
//!
//! ## Module Structure
//!
//! - `commands`: Per-command handlers that call the API and print output
//! - `render`: Output formatting (lists, detail views, messages)
//! - `setup`: Argument parsing via clap
//! - `styles`: Terminal styles, picked from the `theme` preference

mod commands;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
