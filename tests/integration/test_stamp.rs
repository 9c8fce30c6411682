//! Integration tests for `qgis-plugin-ci stamp`

use crate::helpers::{PLUGIN_FOLDER, TestPlugin, run_plugin_ci, run_plugin_ci_raw, stdout};
use anyhow::Result;

#[test]
fn test_stamp_release() -> Result<()> {
  let plugin = TestPlugin::new()?.with_fixture_changelog()?;

  let output = run_plugin_ci(&plugin.path, &["stamp", "10.0.1"])?;
  assert!(stdout(&output).contains(&format!("{}.10.0.1.zip", PLUGIN_FOLDER)));

  let metadata = plugin.metadata()?;
  assert!(metadata.contains("\nversion=10.0.1\n"));
  assert!(metadata.contains("experimental=False"));
  assert!(!metadata.contains("placeholder"));
  // the three newest sections
  assert!(metadata.contains("changelog=\n Version 10.1.0-beta1:\n - Newest documented version of this fixture\n"));
  assert!(metadata.contains(" Version 10.0.1:\n - End of year version\n"));
  assert!(!metadata.contains("Version 10.0.0:"));

  let date_line = metadata
    .lines()
    .find(|line| line.starts_with("dateTime="))
    .unwrap_or_default();
  assert_eq!(date_line.len(), "dateTime=2024-01-15T08:30:00Z".len());
  assert!(date_line.ends_with('Z'));

  Ok(())
}

#[test]
fn test_stamp_latest_prerelease() -> Result<()> {
  let plugin = TestPlugin::new()?.with_fixture_changelog()?;

  let output = run_plugin_ci(&plugin.path, &["stamp", "latest", "--min-qgis", "3.28"])?;
  assert!(stdout(&output).contains(&format!("{}.10.1.0-beta1.zip", PLUGIN_FOLDER)));

  let metadata = plugin.metadata()?;
  assert!(metadata.contains("\nversion=10.1.0-beta1\n"));
  assert!(metadata.contains("experimental=True"));
  assert!(metadata.contains("qgisMinimumVersion=3.28"));

  Ok(())
}

#[test]
fn test_stamp_debug_flag() -> Result<()> {
  let plugin = TestPlugin::new()?.with_fixture_changelog()?;
  let source = format!("{}/__init__.py", PLUGIN_FOLDER);
  plugin.write_file(&source, "DEBUG = True\n")?;

  run_plugin_ci(&plugin.path, &["stamp", "10.1.0-beta1"])?;
  assert_eq!(plugin.read_file(&source)?, "DEBUG = True\n");

  run_plugin_ci(&plugin.path, &["stamp", "10.0.1"])?;
  assert_eq!(plugin.read_file(&source)?, "DEBUG = False\n");

  Ok(())
}

#[test]
fn test_stamp_without_changelog_inclusion() -> Result<()> {
  let plugin = TestPlugin::new()?.with_fixture_changelog()?;
  plugin.write_file(
    ".qgis-plugin-ci",
    &format!("plugin_path: {}\nchangelog_include: false\n", PLUGIN_FOLDER),
  )?;

  run_plugin_ci(&plugin.path, &["stamp", "1.0.0"])?;

  let metadata = plugin.metadata()?;
  assert!(!metadata.contains("changelog="));
  assert!(!metadata.contains("placeholder"));
  assert!(metadata.contains("\nversion=1.0.0\n"));

  Ok(())
}

#[test]
fn test_stamp_with_setup_cfg() -> Result<()> {
  let plugin = TestPlugin::new()?.with_fixture_changelog()?;
  std::fs::remove_file(plugin.path.join(".qgis-plugin-ci"))?;
  plugin.write_file(
    "setup.cfg",
    &format!(
      "[qgis-plugin-ci]\nplugin_path = {}\nchangelog_number_of_entries = 1\n",
      PLUGIN_FOLDER
    ),
  )?;

  run_plugin_ci(&plugin.path, &["stamp", "10.0.1"])?;

  let metadata = plugin.metadata()?;
  assert!(metadata.contains("Version 10.1.0-beta1:"));
  assert!(!metadata.contains("Version 10.1.0-alpha1:"));

  Ok(())
}

#[test]
fn test_stamp_explicit_config_file() -> Result<()> {
  let plugin = TestPlugin::new()?.with_fixture_changelog()?;
  let config = plugin.path.join("pyproject.toml");
  plugin.write_file(
    "pyproject.toml",
    &format!("[tool.qgis-plugin-ci]\nplugin_path = \"{}\"\nchangelog_include = false\n", PLUGIN_FOLDER),
  )?;

  run_plugin_ci(
    &plugin.path,
    &["--config", config.to_str().unwrap_or_default(), "stamp", "2.0.0"],
  )?;

  assert!(!plugin.metadata()?.contains("changelog="));

  Ok(())
}

#[test]
fn test_stamp_validation() -> Result<()> {
  let plugin = TestPlugin::new()?.with_fixture_changelog()?;

  let output = run_plugin_ci_raw(&plugin.path, &["stamp", "next-release"])?;
  assert_eq!(output.status.code(), Some(3));
  assert!(plugin.metadata()?.contains("version=dev"));

  run_plugin_ci(&plugin.path, &["stamp", "next-release", "--no-validation"])?;
  assert!(plugin.metadata()?.contains("version=next-release"));

  Ok(())
}

#[test]
fn test_stamp_requires_configuration() -> Result<()> {
  let plugin = TestPlugin::new()?;
  std::fs::remove_file(plugin.path.join(".qgis-plugin-ci"))?;

  let output = run_plugin_ci_raw(&plugin.path, &["stamp", "1.0.0"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("No qgis-plugin-ci configuration found"));

  Ok(())
}
