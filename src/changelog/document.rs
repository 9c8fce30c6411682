//! Changelog file lookup and per-version queries
//!
//! The document only remembers where the file is. Every query re-reads and
//! re-parses it, so two calls never disagree with the file on disk.

use super::grammar::parse_sections;
use super::version_note::VersionNote;
use crate::core::error::{ChangelogError, ConfigError, PluginCiResult, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Default changelog file name, relative to the parent folder
pub const DEFAULT_CHANGELOG: &str = "CHANGELOG.md";

/// Special tag selecting the first (newest) section
pub const LATEST: &str = "latest";

/// A changelog file found under a parent folder
#[derive(Debug, Clone, Default)]
pub struct ChangelogDocument {
  path: Option<PathBuf>,
}

impl ChangelogDocument {
  /// Resolve `parent_folder/changelog_path`
  ///
  /// Fails when the parent folder is missing or is not a folder. A missing
  /// changelog file is not an error: the document is simply empty.
  pub fn new(parent_folder: impl AsRef<Path>, changelog_path: impl AsRef<Path>) -> PluginCiResult<Self> {
    let mut document = Self::default();
    document.has_changelog(parent_folder, changelog_path)?;
    Ok(document)
  }

  /// Re-resolve the changelog location and report whether the file exists
  ///
  /// The stored path is cleared first, so a failed lookup never leaves a
  /// stale path behind.
  pub fn has_changelog(
    &mut self,
    parent_folder: impl AsRef<Path>,
    changelog_path: impl AsRef<Path>,
  ) -> PluginCiResult<bool> {
    self.path = None;
    let parent_folder = parent_folder.as_ref();

    if !parent_folder.exists() {
      return Err(
        ConfigError::ParentFolderMissing {
          path: absolute(parent_folder),
        }
        .into(),
      );
    }
    if !parent_folder.is_dir() {
      return Err(
        ConfigError::NotADirectory {
          path: absolute(parent_folder),
        }
        .into(),
      );
    }

    let candidate = parent_folder.join(changelog_path);
    if !candidate.is_file() {
      return Ok(false);
    }

    info!("Changelog file used: {}", absolute(&candidate).display());
    self.path = Some(candidate);
    Ok(true)
  }

  /// Resolved changelog file, if any
  pub fn path(&self) -> Option<&Path> {
    self.path.as_deref()
  }

  pub fn exists(&self) -> bool {
    self.path.is_some()
  }

  /// All version sections, in file order (empty without a file)
  ///
  /// `\r\n` and lone `\r` line endings are read as `\n`.
  pub fn notes(&self) -> PluginCiResult<Vec<VersionNote>> {
    let Some(path) = &self.path else {
      return Ok(Vec::new());
    };

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read changelog {}", path.display()))?;
    Ok(parse_sections(&normalize_newlines(&content)))
  }

  /// The `count` first sections, formatted for the `changelog=` metadata entry
  ///
  /// ```text
  ///
  ///  Version 1.2.3:
  ///  - Added X
  ///
  /// ```
  pub fn last_items(&self, count: usize) -> PluginCiResult<String> {
    let notes = self.notes()?;
    if notes.is_empty() {
      return Ok(String::new());
    }

    let mut output = String::from("\n");
    for note in notes.iter().take(count) {
      output.push_str(&format!(" Version {}:\n", note.version().unwrap_or_default()));
      for item in note.text().split('\n').filter(|item| !item.is_empty()) {
        output.push_str(&format!(" {}\n", item));
      }
      output.push('\n');
    }
    Ok(output)
  }

  /// The section for `tag`, or the first one for [`LATEST`]
  ///
  /// A `v`-prefixed tag also finds the section written without the prefix.
  pub fn version_note(&self, tag: &str) -> PluginCiResult<Option<VersionNote>> {
    let notes = self.notes()?;
    if notes.is_empty() {
      match &self.path {
        Some(path) => error!(
          "Parsing the changelog ({}) returned an empty content.",
          absolute(path).display()
        ),
        None => error!("No changelog file to read version '{}' from.", tag),
      }
      return Ok(None);
    }

    if tag == LATEST {
      return Ok(notes.into_iter().next());
    }

    let bare = tag.strip_prefix('v');
    Ok(notes.into_iter().find(|note| {
      note
        .version()
        .is_some_and(|version| version == tag || Some(version.as_str()) == bare)
    }))
  }

  /// Trimmed body of the section for `tag`
  ///
  /// `None` means no such section; `Some("")` means a section with no body.
  pub fn content(&self, tag: &str) -> PluginCiResult<Option<String>> {
    Ok(self.version_note(tag)?.map(|note| note.text().to_string()))
  }

  /// Version of the newest section
  pub fn latest_version(&self) -> PluginCiResult<String> {
    let Some(path) = &self.path else {
      return Err(ChangelogError::Missing.into());
    };

    self
      .version_note(LATEST)?
      .and_then(|note| note.version())
      .ok_or_else(|| ChangelogError::Empty { path: path.clone() }.into())
  }
}

fn normalize_newlines(content: &str) -> String {
  content.replace("\r\n", "\n").replace('\r', "\n")
}

fn absolute(path: &Path) -> PathBuf {
  std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
