//! Test support for Splinter
//!
//! In-memory host capabilities for exercising `NoteExtractor` without a vault
//! or editor. Enabled for this crate's tests and, through the `test-utils`
//! feature, for downstream test suites.

pub mod mocks;
