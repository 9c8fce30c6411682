//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Name of the plugin folder inside every test repository
pub const PLUGIN_FOLDER: &str = "my_plugin";

/// A throwaway plugin repository: plugin folder, metadata.txt and configuration
pub struct TestPlugin {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestPlugin {
  /// Create a plugin repository configured through `.qgis-plugin-ci`
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    std::fs::create_dir_all(path.join(PLUGIN_FOLDER))?;
    std::fs::write(
      path.join(PLUGIN_FOLDER).join("metadata.txt"),
      r#"[general]
name=Test Plugin
qgisMinimumVersion=3.4
description=Plugin used by integration tests
version=dev
author=Test Author
changelog=
 Version 0.0.0:
 - placeholder
experimental=False
dateTime=
"#,
    )?;
    std::fs::write(
      path.join(".qgis-plugin-ci"),
      format!("plugin_path: {}\n", PLUGIN_FOLDER),
    )?;

    Ok(Self { _root: root, path })
  }

  /// Copy the fixture changelog next to the plugin folder
  pub fn with_fixture_changelog(self) -> Result<Self> {
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/CHANGELOG.md");
    std::fs::copy(&fixture, self.path.join("CHANGELOG.md")).context("Failed to copy fixture changelog")?;
    Ok(self)
  }

  /// Write a file, relative to the repository root
  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    std::fs::write(self.path.join(path), content)?;
    Ok(())
  }

  /// Read a file, relative to the repository root
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  pub fn metadata(&self) -> Result<String> {
    self.read_file(&format!("{}/metadata.txt", PLUGIN_FOLDER))
  }
}

/// Run the qgis-plugin-ci binary without checking its exit status
pub fn run_plugin_ci_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_qgis-plugin-ci");

  Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("RUST_LOG")
    .output()
    .context("Failed to run qgis-plugin-ci")
}

/// Run the qgis-plugin-ci binary, failing on a non-zero exit
pub fn run_plugin_ci(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_plugin_ci_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "qgis-plugin-ci command failed: qgis-plugin-ci {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}
