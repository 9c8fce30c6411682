//! Stamp command: write release values into the plugin `metadata.txt`
//!
//! This is the metadata step of packaging: the archive itself is built by the
//! rest of the release chain, under the name printed at the end.

use crate::core::config::Parameters;
use crate::core::context::PluginContext;
use crate::core::error::{ConfigError, PluginCiResult};
use crate::release::{
  MetadataStamp, PluginMetadata, archive_name, disable_debug_flags, resolve_release_version, stamp_metadata,
  validate_release_version,
};
use tracing::info;

/// Options for the stamp command
#[derive(Debug, Clone, Default)]
pub struct StampOptions {
  pub release_version: String,
  pub qgis_minimum_version: Option<String>,
  /// Skip the release version shape check
  pub no_validation: bool,
}

/// Run the stamp command
pub fn run_stamp(ctx: &PluginContext, options: &StampOptions) -> PluginCiResult<()> {
  let plugin_path = ctx.plugin_path().ok_or_else(|| ConfigError::MissingField {
    field: "plugin_path".to_string(),
  })?;

  let release_version = resolve_release_version(&options.release_version, &ctx.changelog)?;
  validate_release_version(&release_version, !options.no_validation)?;

  let stamp = MetadataStamp {
    qgis_minimum_version: options.qgis_minimum_version.clone(),
    ..MetadataStamp::for_release(&ctx.parameters, &ctx.changelog, &release_version)
  };
  if let Some(changelog) = ctx.changelog.path() {
    info!(
      "Changelog entries ({}) taken from {}",
      ctx.parameters.changelog_number_of_entries,
      changelog.display()
    );
  }
  let metadata_path = ctx.parameters.metadata_path()?;
  stamp_metadata(&metadata_path, &stamp)?;
  info!("Stamped {}", metadata_path.display());
  if !stamp.experimental {
    disable_debug_flags(plugin_path)?;
  }

  let metadata = PluginMetadata::load(plugin_path)?;
  println!(
    "✅ {} {}{}",
    metadata.name().unwrap_or("plugin"),
    metadata.version().unwrap_or(&release_version),
    if metadata.is_experimental() { " (experimental)" } else { "" }
  );
  println!("   Archive: {}", release_archive_name(&ctx.parameters, &release_version));

  Ok(())
}

/// Archive released under `release_version`
///
/// Pre-releases are flagged in `metadata.txt`, not in the archive name.
fn release_archive_name(parameters: &Parameters, release_version: &str) -> String {
  archive_name(&plugin_name(parameters), release_version, false)
}

/// Archive base name: the plugin folder name
fn plugin_name(parameters: &Parameters) -> String {
  parameters
    .plugin_path
    .as_deref()
    .and_then(|path| path.file_name())
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_default()
}
