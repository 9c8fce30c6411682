//! Plugin `metadata.txt` reading and release stamping
//!
//! QGIS reads `metadata.txt` as an INI file with a `[general]` section. Values
//! may continue on following lines indented with whitespace (the changelog
//! entry always does), and blank lines inside a value are kept by QGIS but
//! dropped here.

use crate::changelog::ChangelogDocument;
use crate::core::config::Parameters;
use crate::core::error::{PluginCiResult, ResultExt};
use crate::release::release_is_prerelease;
use chrono::{DateTime, Utc};
use regex::{NoExpand, Regex};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the metadata file inside the plugin folder
pub const METADATA_FILE: &str = "metadata.txt";

/// Format QGIS expects for `dateTime=`
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Key/value entries of a plugin `metadata.txt`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginMetadata {
  entries: BTreeMap<String, String>,
}

impl PluginMetadata {
  /// Read `metadata.txt` from the plugin folder
  pub fn load(plugin_path: &Path) -> PluginCiResult<Self> {
    let path = plugin_path.join(METADATA_FILE);
    let content =
      fs::read_to_string(&path).with_context(|| format!("Failed to read plugin metadata {}", path.display()))?;
    Ok(Self::parse(&content))
  }

  pub fn parse(content: &str) -> Self {
    let mut entries: BTreeMap<String, String> = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
      if line.trim().is_empty() {
        continue;
      }

      if line.starts_with([' ', '\t']) {
        // continuation of the previous value
        if let Some(value) = current.as_ref().and_then(|key| entries.get_mut(key)) {
          value.push('\n');
          value.push_str(line.trim());
        }
        continue;
      }

      let line = line.trim();
      if line.starts_with(['#', ';', '[']) {
        current = None;
        continue;
      }

      match line.split_once('=') {
        Some((key, value)) => {
          let key = key.trim().to_string();
          entries.insert(key.clone(), value.trim().to_string());
          current = Some(key);
        }
        None => current = None,
      }
    }

    Self { entries }
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.entries.get(key).map(String::as_str)
  }

  pub fn name(&self) -> Option<&str> {
    self.get("name")
  }

  pub fn version(&self) -> Option<&str> {
    self.get("version")
  }

  pub fn is_experimental(&self) -> bool {
    self
      .get("experimental")
      .is_some_and(|value| value.eq_ignore_ascii_case("true"))
  }
}

/// What happens to the `changelog=` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangelogLine {
  /// Leave the entry untouched
  Keep,
  /// Replace the value with the given block
  Replace(String),
  /// Drop the entry's value, leaving an empty line
  Remove,
}

/// Values written into `metadata.txt` for a release
#[derive(Debug, Clone)]
pub struct MetadataStamp {
  pub changelog: ChangelogLine,
  pub version: String,
  pub date_time: DateTime<Utc>,
  pub experimental: bool,
  pub qgis_minimum_version: Option<String>,
}

impl MetadataStamp {
  /// Stamp for `release_version`, taking the changelog block from `document`
  ///
  /// The block is the `changelog_number_of_entries` newest sections. When
  /// inclusion is off, or the changelog cannot be read, the entry is removed.
  /// An empty changelog leaves the entry as it is.
  pub fn for_release(parameters: &Parameters, document: &ChangelogDocument, release_version: &str) -> Self {
    let changelog = if !parameters.changelog_include {
      ChangelogLine::Remove
    } else if !document.exists() {
      ChangelogLine::Keep
    } else {
      match document.last_items(parameters.changelog_number_of_entries) {
        Ok(block) if block.is_empty() => ChangelogLine::Keep,
        Ok(block) => ChangelogLine::Replace(block),
        Err(err) => {
          warn!("An exception occurred while parsing the changelog file: {}", err);
          ChangelogLine::Remove
        }
      }
    };

    Self {
      changelog,
      version: release_version.to_string(),
      date_time: Utc::now(),
      experimental: release_is_prerelease(release_version),
      qgis_minimum_version: None,
    }
  }

  /// Apply the stamp to the text of a `metadata.txt`
  pub fn apply(&self, content: &str) -> PluginCiResult<String> {
    let mut content = match &self.changelog {
      ChangelogLine::Keep => content.to_string(),
      ChangelogLine::Replace(block) => replace_entry(content, "changelog", Some(block))?,
      ChangelogLine::Remove => replace_entry(content, "changelog", None)?,
    };

    content = replace_entry(&content, "version", Some(&self.version))?;
    content = replace_entry(
      &content,
      "dateTime",
      Some(&self.date_time.format(DATE_TIME_FORMAT).to_string()),
    )?;
    if self.experimental {
      content = replace_entry(&content, "experimental", Some("True"))?;
    }
    if let Some(minimum) = &self.qgis_minimum_version {
      content = replace_entry(&content, "qgisMinimumVersion", Some(minimum))?;
    }
    Ok(content)
  }
}

/// Stamp the `metadata.txt` at `path` in place
pub fn stamp_metadata(path: &Path, stamp: &MetadataStamp) -> PluginCiResult<()> {
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  let stamped = stamp.apply(&content)?;
  fs::write(path, stamped).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(())
}

/// `metadata.txt` inside a plugin folder
pub fn metadata_file(plugin_path: &Path) -> PathBuf {
  plugin_path.join(METADATA_FILE)
}

/// Replace the whole `key=` entry
///
/// The entry spans its indented continuation lines, blank lines between them
/// included. Only lines starting with the key are touched. `None` empties the
/// line.
fn replace_entry(content: &str, key: &str, value: Option<&str>) -> PluginCiResult<String> {
  let pattern = Regex::new(&format!(
    r"(?m)^{}=.*(?:(?:\n[ \t]*)*\n[ \t]+\S.*)*$",
    regex::escape(key)
  ))?;
  if !pattern.is_match(content) {
    debug!("No '{}=' entry to stamp", key);
    return Ok(content.to_string());
  }

  let replacement = value.map(|value| format!("{}={}", key, value)).unwrap_or_default();
  Ok(pattern.replace_all(content, NoExpand(&replacement)).into_owned())
}
