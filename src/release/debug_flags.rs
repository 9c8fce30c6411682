//! `DEBUG = True` switches in plugin sources, turned off for regular releases

use crate::core::error::{PluginCiResult, ResultExt};
use regex::{NoExpand, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const DEBUG_OFF: &str = "DEBUG = False";

/// Rewrite every line-leading `DEBUG = True` in the plugin's `.py` files
///
/// Subfolders are searched too. Only files that change are written, and
/// their paths are returned.
pub fn disable_debug_flags(plugin_path: &Path) -> PluginCiResult<Vec<PathBuf>> {
  let pattern = Regex::new(r"(?m)^DEBUG[ \t]*=[ \t]*True\b")?;
  let mut changed = Vec::new();

  for entry in WalkDir::new(plugin_path)
    .sort_by_file_name()
    .into_iter()
    .filter_map(Result::ok)
    .filter(|entry| entry.file_type().is_file())
    .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "py"))
  {
    let path = entry.path();
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if !pattern.is_match(&content) {
      continue;
    }

    let updated = pattern.replace_all(&content, NoExpand(DEBUG_OFF));
    fs::write(path, updated.as_bytes()).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Turned DEBUG off in {}", path.display());
    changed.push(path.to_path_buf());
  }

  if !changed.is_empty() {
    info!("DEBUG turned off in {} file(s)", changed.len());
  }
  Ok(changed)
}
