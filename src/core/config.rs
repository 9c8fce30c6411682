use crate::changelog::DEFAULT_CHANGELOG;
use crate::core::error::{ConfigError, PluginCiError, PluginCiResult, ResultExt};
use crate::release::metadata::metadata_file;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Section name used by every supported configuration file
pub const SECTION: &str = "qgis-plugin-ci";

/// Configuration files, in the order they are explored
pub const CONFIG_FILES: [&str; 3] = [".qgis-plugin-ci", "setup.cfg", "pyproject.toml"];

/// Tool configuration
///
/// Read from the `qgis-plugin-ci` section of `.qgis-plugin-ci` (YAML, the whole
/// file), `setup.cfg` (INI) or `pyproject.toml` (`[tool.qgis-plugin-ci]`).
/// Keys belonging to other tools of the release chain are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
  /// Plugin source folder (holds `metadata.txt`)
  #[serde(default)]
  pub plugin_path: Option<PathBuf>,

  /// Stamp the changelog into `metadata.txt` when packaging
  #[serde(default = "default_changelog_include", deserialize_with = "flexible_bool")]
  pub changelog_include: bool,

  /// Changelog location, relative to the current directory (`changelog`,
  /// `latest`) or to the plugin's parent folder (`stamp`)
  #[serde(default = "default_changelog_path")]
  pub changelog_path: PathBuf,

  /// Number of versions stamped into `metadata.txt`
  #[serde(default = "default_changelog_entries", deserialize_with = "flexible_count")]
  pub changelog_number_of_entries: usize,

  /// File the parameters were read from (none when defaults were used)
  #[serde(skip)]
  pub source: Option<PathBuf>,
}

fn default_changelog_include() -> bool {
  true
}

fn default_changelog_path() -> PathBuf {
  PathBuf::from(DEFAULT_CHANGELOG)
}

fn default_changelog_entries() -> usize {
  3
}

/// INI files only know strings, YAML and TOML have real booleans
fn flexible_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Flexible {
    Bool(bool),
    Text(String),
  }

  Ok(match Flexible::deserialize(deserializer)? {
    Flexible::Bool(value) => value,
    Flexible::Text(text) => matches!(text.trim().to_lowercase().as_str(), "true" | "1" | "t" | "y"),
  })
}

fn flexible_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Flexible {
    Number(usize),
    Text(String),
  }

  match Flexible::deserialize(deserializer)? {
    Flexible::Number(value) => Ok(value),
    Flexible::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
  }
}

#[derive(Deserialize)]
struct PyProject {
  #[serde(default)]
  tool: Option<PyProjectTool>,
}

#[derive(Deserialize)]
struct PyProjectTool {
  #[serde(rename = "qgis-plugin-ci")]
  qgis_plugin_ci: Option<Parameters>,
}

impl Default for Parameters {
  fn default() -> Self {
    Self {
      plugin_path: None,
      changelog_include: default_changelog_include(),
      changelog_path: default_changelog_path(),
      changelog_number_of_entries: default_changelog_entries(),
      source: None,
    }
  }
}

impl Parameters {
  /// Load from an explicit file, or explore `root` for a supported one
  ///
  /// With `optional`, a missing configuration falls back to defaults (the
  /// changelog commands work outside of a plugin repository).
  pub fn load(config_file: Option<&Path>, root: &Path, optional: bool) -> PluginCiResult<Self> {
    let found = match config_file {
      Some(path) => Some(Self::from_file(path)?),
      None => Self::explore(root)?,
    };

    match found {
      Some(parameters) => Ok(parameters),
      None if optional => Ok(Self::default()),
      None => Err(
        ConfigError::NotFound {
          searched: CONFIG_FILES.iter().map(|name| root.join(name)).collect(),
        }
        .into(),
      ),
    }
  }

  /// First supported file under `root` that carries a qgis-plugin-ci section
  pub fn explore(root: &Path) -> PluginCiResult<Option<Self>> {
    for name in CONFIG_FILES {
      let path = root.join(name);
      if !path.is_file() {
        continue;
      }
      if let Some(parameters) = Self::read(&path, name)? {
        return Ok(Some(parameters));
      }
    }
    Ok(None)
  }

  /// Load one explicit configuration file
  pub fn from_file(path: &Path) -> PluginCiResult<Self> {
    let not_found = || -> PluginCiError {
      ConfigError::NotFound {
        searched: vec![path.to_path_buf()],
      }
      .into()
    };

    let name = path
      .file_name()
      .and_then(|n| n.to_str())
      .filter(|n| CONFIG_FILES.contains(n))
      .ok_or_else(not_found)?;
    if !path.is_file() {
      return Err(not_found());
    }

    Self::read(path, name)?.ok_or_else(not_found)
  }

  fn read(path: &Path, name: &str) -> PluginCiResult<Option<Self>> {
    let parameters = match name {
      "setup.cfg" => {
        let ini = ini::Ini::load_from_file(path).with_context(|| format!("Failed to read {}", path.display()))?;
        match ini.section(Some(SECTION)) {
          Some(section) => {
            let map: serde_json::Map<String, serde_json::Value> = section
              .iter()
              .map(|(key, value)| (key.to_string(), serde_json::Value::String(value.to_string())))
              .collect();
            Some(
              serde_json::from_value(serde_json::Value::Object(map))
                .with_context(|| format!("Invalid [{}] section in {}", SECTION, path.display()))?,
            )
          }
          None => None,
        }
      }
      "pyproject.toml" => {
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let pyproject: PyProject =
          toml_edit::de::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
        pyproject.tool.and_then(|tool| tool.qgis_plugin_ci)
      }
      _ => {
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        if content.trim().is_empty() {
          None
        } else {
          Some(serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?)
        }
      }
    };

    Ok(parameters.map(|parameters: Parameters| Parameters {
      source: Some(path.to_path_buf()),
      ..parameters
    }))
  }

  /// Folder the changelog path is relative to: the plugin's parent folder
  pub fn changelog_folder(&self) -> PathBuf {
    match &self.plugin_path {
      Some(plugin_path) => std::path::absolute(plugin_path)
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from(".")),
      None => PathBuf::from("."),
    }
  }

  /// Path of the plugin's `metadata.txt`
  pub fn metadata_path(&self) -> PluginCiResult<PathBuf> {
    self.plugin_path.as_deref().map(metadata_file).ok_or_else(|| {
      ConfigError::MissingField {
        field: "plugin_path".to_string(),
      }
      .into()
    })
  }
}
