//! Next-version command: suggest the version following a release tag

use crate::changelog::parse_tag;
use crate::core::error::{PluginCiResult, ReleaseError};

/// Run the next-version command
///
/// Works from the tag alone, no changelog or configuration is read.
pub fn run_next_version(tag: &str) -> PluginCiResult<()> {
  println!("{}", next_version(tag)?);
  Ok(())
}

fn next_version(tag: &str) -> PluginCiResult<String> {
  parse_tag(tag)
    .next_version()
    .and_then(|note| note.version())
    .ok_or_else(|| ReleaseError::NoNextVersion { tag: tag.to_string() }.into())
}
