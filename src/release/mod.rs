//! Release helpers
//!
//! - **version**: release version validation, `latest` resolution, tag-derived
//!   pre-release detection and archive naming
//! - **metadata**: plugin `metadata.txt` reading and stamping for a release
//! - **debug_flags**: `DEBUG = True` switched off in plugin sources

pub mod debug_flags;
pub mod metadata;
pub mod version;

pub use debug_flags::disable_debug_flags;
pub use metadata::{MetadataStamp, PluginMetadata, stamp_metadata};
pub use version::{archive_name, release_is_prerelease, resolve_release_version, validate_release_version};
