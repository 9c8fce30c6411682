//! Integration tests for `qgis-plugin-ci changelog` and `qgis-plugin-ci latest`

use crate::helpers::{TestPlugin, run_plugin_ci, run_plugin_ci_raw, stdout};
use anyhow::Result;

const LATEST_NOTES: &str = "\
- Newest documented version of this fixture
- Integration tests read these lines
- Edit with care
";

#[test]
fn test_changelog_latest_by_default() -> Result<()> {
  let plugin = TestPlugin::new()?.with_fixture_changelog()?;

  let output = run_plugin_ci(&plugin.path, &["changelog"])?;
  assert_eq!(stdout(&output), LATEST_NOTES);

  let explicit = run_plugin_ci(&plugin.path, &["changelog", "latest"])?;
  assert_eq!(stdout(&explicit), LATEST_NOTES);

  Ok(())
}

#[test]
fn test_changelog_by_version() -> Result<()> {
  let plugin = TestPlugin::new()?.with_fixture_changelog()?;

  let cases = [
    ("10.0.1", "- End of year version\n"),
    ("10.0.0", "- A\n- B\n- C\n"),
    ("9.10.1", "- D\n- E\n- F\n"),
    ("v0.1.1", "* Tag with a \"v\" prefix\n* Previous version\n"),
    ("0.1.0", "* Very old version\n"),
  ];
  for (version, expected) in cases {
    let output = run_plugin_ci(&plugin.path, &["changelog", version])?;
    assert_eq!(stdout(&output), expected, "version {}", version);
  }

  Ok(())
}

#[test]
fn test_changelog_stops_at_subsection() -> Result<()> {
  let plugin = TestPlugin::new()?.with_fixture_changelog()?;

  let output = run_plugin_ci(&plugin.path, &["changelog", "10.1.0-alpha1"])?;
  let notes = stdout(&output);
  assert!(notes.contains("- A pre-release section"));
  assert!(!notes.contains("level-3"));

  Ok(())
}

#[test]
fn test_changelog_unknown_version_prints_nothing() -> Result<()> {
  let plugin = TestPlugin::new()?.with_fixture_changelog()?;

  let output = run_plugin_ci(&plugin.path, &["changelog", "0.0.0"])?;
  assert_eq!(stdout(&output), "");

  let json = run_plugin_ci(&plugin.path, &["changelog", "0.0.0", "--json"])?;
  assert_eq!(stdout(&json).trim(), "null");

  Ok(())
}

#[test]
fn test_changelog_json() -> Result<()> {
  let plugin = TestPlugin::new()?.with_fixture_changelog()?;

  let output = run_plugin_ci(&plugin.path, &["changelog", "9.10.1", "--format", "json"])?;
  let value: serde_json::Value = serde_json::from_str(&stdout(&output))?;

  assert_eq!(value["version"], "9.10.1");
  assert_eq!(value["is_prerelease"], false);
  assert_eq!(value["date"], "2020-11-15");
  assert_eq!(
    value["url"],
    "(https://github.com/opengisch/qgis-plugin-ci/compare/9.10.0...9.10.1)"
  );

  Ok(())
}

#[test]
fn test_changelog_markdown() -> Result<()> {
  let plugin = TestPlugin::new()?.with_fixture_changelog()?;

  let output = run_plugin_ci(&plugin.path, &["changelog", "10.0.0", "--format", "markdown"])?;
  assert_eq!(stdout(&output), "## [10.0.0] - 2020-12-01\n\n- A\n- B\n- C\n");

  Ok(())
}

#[test]
fn test_changelog_without_configuration() -> Result<()> {
  let plugin = TestPlugin::new()?;
  std::fs::remove_file(plugin.path.join(".qgis-plugin-ci"))?;
  plugin.write_file("CHANGELOG.md", "## [2.0.0] - 2024-05-01\n- Standalone\n")?;

  let output = run_plugin_ci(&plugin.path, &["changelog"])?;
  assert_eq!(stdout(&output), "- Standalone\n");

  Ok(())
}

#[test]
fn test_latest() -> Result<()> {
  let plugin = TestPlugin::new()?.with_fixture_changelog()?;

  let output = run_plugin_ci(&plugin.path, &["latest"])?;
  assert_eq!(stdout(&output), "10.1.0-beta1\n");

  Ok(())
}

#[test]
fn test_latest_without_changelog_fails() -> Result<()> {
  let plugin = TestPlugin::new()?;

  let output = run_plugin_ci_raw(&plugin.path, &["latest"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("No changelog file found"));

  Ok(())
}

#[test]
fn test_changelog_read_from_repository_root() -> Result<()> {
  let plugin = TestPlugin::new()?;
  std::fs::create_dir_all(plugin.path.join("src/my_plugin"))?;
  plugin.write_file(".qgis-plugin-ci", "plugin_path: src/my_plugin\n")?;
  plugin.write_file("CHANGELOG.md", "## [3.0.0] - 2024-06-01\n- At the root\n")?;

  let output = run_plugin_ci(&plugin.path, &["latest"])?;
  assert_eq!(stdout(&output), "3.0.0\n");

  let notes = run_plugin_ci(&plugin.path, &["changelog", "3.0.0"])?;
  assert_eq!(stdout(&notes), "- At the root\n");

  Ok(())
}
