//! Release version checks and tag-derived attributes

use crate::changelog::{ChangelogDocument, LATEST, parse_tag};
use crate::core::error::{PluginCiResult, ReleaseError};
use regex::Regex;
use tracing::{debug, warn};

/// Shapes accepted besides strict semver: `1.1`, `1.0.1`, `v1.1`, `v1.0.1`
const RELEASE_SHAPE: &str = r"^v?\d+\.\d+(\.\d+)?$";

/// Check a release version before it is used for packaging
///
/// A non-semver version only logs a warning. With `strict`, the version must
/// be semver or one of the accepted dotted shapes.
pub fn validate_release_version(version: &str, strict: bool) -> PluginCiResult<()> {
  let is_semver = semver::Version::parse(version).is_ok();
  if !is_semver {
    warn!(
      "Release version '{}' is not semver compliant (https://semver.org/). Consider following it.",
      version
    );
  }

  if !strict || is_semver {
    return Ok(());
  }

  if Regex::new(RELEASE_SHAPE)?.is_match(version) {
    Ok(())
  } else {
    Err(
      ReleaseError::InvalidVersion {
        version: version.to_string(),
      }
      .into(),
    )
  }
}

/// Replace `latest` by the newest changelog version
///
/// Without a changelog `latest` is kept as is. Any other version is returned
/// unchanged.
pub fn resolve_release_version(version: &str, document: &ChangelogDocument) -> PluginCiResult<String> {
  if version != LATEST || !document.exists() {
    return Ok(version.to_string());
  }

  let latest = document.latest_version()?;
  debug!("'{}' resolved to {}", LATEST, latest);
  Ok(latest)
}

/// Whether the tag names a pre-release, from the tag alone
pub fn release_is_prerelease(tag: &str) -> bool {
  parse_tag(tag).is_prerelease()
}

/// File name of the packaged plugin: `{name}[-experimental].{version}.zip`
pub fn archive_name(plugin_name: &str, version: &str, experimental: bool) -> String {
  if plugin_name.contains('-') {
    warn!(
      "The plugin name '{}' contains a dash '-'. It may not be recognized by QGIS Plugin Manager.",
      plugin_name
    );
  }

  let experimental = if experimental { "-experimental" } else { "" };
  format!("{}{}.{}.zip", plugin_name, experimental, version)
}
