//! Plugin repository context, built once in main.rs and passed to commands
//!
//! ```text
//! main.rs:
//!   PluginContext::build() / from_root() -> &PluginContext
//!   |
//!   v
//! commands/changelog.rs, stamp.rs, etc:
//!   fn run_*(ctx: &PluginContext, ...)
//! ```

use crate::changelog::ChangelogDocument;
use crate::core::config::Parameters;
use crate::core::error::PluginCiResult;
use std::path::Path;

/// Configuration and changelog of the plugin repository being released
#[derive(Debug, Clone)]
pub struct PluginContext {
  pub parameters: Parameters,

  /// Changelog found next to the plugin folder (may have no file)
  pub changelog: ChangelogDocument,
}

impl PluginContext {
  /// Load parameters from `root` and resolve the changelog
  ///
  /// With `config_optional`, a repository without configuration falls back to
  /// defaults; commands that write plugin files require a configuration.
  pub fn build(root: &Path, config_file: Option<&Path>, config_optional: bool) -> PluginCiResult<Self> {
    let parameters = Parameters::load(config_file, root, config_optional)?;
    let changelog = ChangelogDocument::new(parameters.changelog_folder(), &parameters.changelog_path)?;

    Ok(Self {
      parameters,
      changelog,
    })
  }

  /// Like [`build`](Self::build) with an optional configuration, but the
  /// changelog is resolved against `root` rather than the plugin's parent
  ///
  /// Used by the read-only changelog queries, which run from the repository
  /// root whatever `plugin_path` says.
  pub fn from_root(root: &Path, config_file: Option<&Path>) -> PluginCiResult<Self> {
    let parameters = Parameters::load(config_file, root, true)?;
    let changelog = ChangelogDocument::new(root, &parameters.changelog_path)?;

    Ok(Self {
      parameters,
      changelog,
    })
  }

  /// Plugin folder from the configuration
  pub fn plugin_path(&self) -> Option<&Path> {
    self.parameters.plugin_path.as_deref()
  }
}
