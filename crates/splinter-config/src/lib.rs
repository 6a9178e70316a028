//! # Splinter Configuration
//!
//! Configuration for the `splinter` CLI: vault location, note template,
//! pane placement and logging.
//!
//! Values are resolved with precedence defaults < file < environment < CLI
//! flags. The file lives at `~/.config/splinter/config.toml` unless
//! `SPLINTER_CONFIG_DIR` or an explicit path says otherwise.

#![warn(clippy::all)]

mod config;
mod loader;

pub use config::*;
pub use loader::*;
