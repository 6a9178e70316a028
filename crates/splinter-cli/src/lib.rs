//! Splinter CLI library
//!
//! Command-line host for `splinter-core`: argument parsing, logging setup,
//! the terminal pane manager and the command implementations.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod panes;
