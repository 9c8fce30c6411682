//! CHANGELOG parsing and version notes
//!
//! Follows <https://keepachangelog.com/en/1.0.0/>:
//!
//! - **grammar**: version-heading parser and section scanner
//! - **document**: changelog file lookup and per-version queries
//! - **version_note**: the parsed record, its derived attributes, and tag parsing

pub mod document;
pub mod grammar;
pub mod version_note;

pub use document::{ChangelogDocument, DEFAULT_CHANGELOG, LATEST};
pub use version_note::{VersionNote, parse_tag};
