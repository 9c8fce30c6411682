//! CLI commands for qgis-plugin-ci
//!
//! ## Changelog
//! - **changelog**: print the notes of one version (text, markdown or JSON)
//! - **latest**: print the newest version in the changelog
//!
//! ## Release
//! - **next_version**: suggest the version following a tag
//! - **stamp**: write release values into the plugin `metadata.txt`
//!
//! Commands reading the repository accept `&PluginContext`.

pub mod changelog;
pub mod latest;
pub mod next_version;
pub mod stamp;

pub use changelog::{OutputFormat, run_changelog};
pub use latest::run_latest;
pub use next_version::run_next_version;
pub use stamp::{StampOptions, run_stamp};
