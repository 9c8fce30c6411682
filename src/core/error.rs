//! Error types for qgis-plugin-ci with contextual messages and exit codes
//!
//! Library code returns these errors; only `main` turns them into a process
//! exit. Every category carries an optional help message for the user.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for qgis-plugin-ci
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, missing files, empty changelog)
  User = 1,
  /// System error (I/O)
  System = 2,
  /// Validation failure (release version rejected)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for qgis-plugin-ci
#[derive(Debug)]
pub enum PluginCiError {
  /// Configuration errors
  Config(ConfigError),

  /// Changelog lookup errors
  Changelog(ChangelogError),

  /// Release version errors
  Release(ReleaseError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl PluginCiError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    PluginCiError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Add context to an existing error
  ///
  /// Typed errors are wrapped into a message so the context is never lost.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      PluginCiError::Message { message, context, help } => PluginCiError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      PluginCiError::Io(e) => PluginCiError::Message {
        message: format!("{}: {}", ctx_str, e),
        context: None,
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      PluginCiError::Config(_) => ExitCode::User,
      PluginCiError::Changelog(_) => ExitCode::User,
      PluginCiError::Release(_) => ExitCode::Validation,
      PluginCiError::Io(_) => ExitCode::System,
      PluginCiError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      PluginCiError::Config(e) => e.help_message(),
      PluginCiError::Changelog(e) => e.help_message(),
      PluginCiError::Release(e) => e.help_message(),
      PluginCiError::Message { help, .. } => help.clone(),
      PluginCiError::Io(_) => None,
    }
  }
}

impl fmt::Display for PluginCiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PluginCiError::Config(e) => write!(f, "{}", e),
      PluginCiError::Changelog(e) => write!(f, "{}", e),
      PluginCiError::Release(e) => write!(f, "{}", e),
      PluginCiError::Io(e) => write!(f, "I/O error: {}", e),
      PluginCiError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for PluginCiError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      PluginCiError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for PluginCiError {
  fn from(err: io::Error) -> Self {
    PluginCiError::Io(err)
  }
}

impl From<ConfigError> for PluginCiError {
  fn from(err: ConfigError) -> Self {
    PluginCiError::Config(err)
  }
}

impl From<ChangelogError> for PluginCiError {
  fn from(err: ChangelogError) -> Self {
    PluginCiError::Changelog(err)
  }
}

impl From<ReleaseError> for PluginCiError {
  fn from(err: ReleaseError) -> Self {
    PluginCiError::Release(err)
  }
}

impl From<toml_edit::de::Error> for PluginCiError {
  fn from(err: toml_edit::de::Error) -> Self {
    PluginCiError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_yaml::Error> for PluginCiError {
  fn from(err: serde_yaml::Error) -> Self {
    PluginCiError::message(format!("YAML error: {}", err))
  }
}

impl From<ini::Error> for PluginCiError {
  fn from(err: ini::Error) -> Self {
    PluginCiError::message(format!("INI error: {}", err))
  }
}

impl From<serde_json::Error> for PluginCiError {
  fn from(err: serde_json::Error) -> Self {
    PluginCiError::message(format!("JSON error: {}", err))
  }
}

impl From<regex::Error> for PluginCiError {
  fn from(err: regex::Error) -> Self {
    PluginCiError::message(format!("Pattern error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// No configuration file with a qgis-plugin-ci section
  NotFound { searched: Vec<PathBuf> },

  /// The folder expected to hold the changelog does not exist
  ParentFolderMissing { path: PathBuf },

  /// The changelog parent path exists but is not a folder
  NotADirectory { path: PathBuf },

  /// Missing required field
  MissingField { field: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => Some(
        "Add a `qgis-plugin-ci` section to .qgis-plugin-ci, setup.cfg or `[tool.qgis-plugin-ci]` to pyproject.toml."
          .to_string(),
      ),
      ConfigError::ParentFolderMissing { .. } | ConfigError::NotADirectory { .. } => {
        Some("Check `plugin_path` in the configuration: the changelog is looked up next to it.".to_string())
      }
      ConfigError::MissingField { field } => Some(format!("Set `{}` in the configuration file.", field)),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { searched } => {
        write!(f, "No qgis-plugin-ci configuration found.")?;
        for path in searched {
          write!(f, "\nSearched: {}", path.display())?;
        }
        Ok(())
      }
      ConfigError::ParentFolderMissing { path } => {
        write!(f, "Parent folder doesn't exist: {}", path.display())
      }
      ConfigError::NotADirectory { path } => {
        write!(f, "Path is not a folder: {}", path.display())
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
    }
  }
}

/// Changelog lookup errors
#[derive(Debug)]
pub enum ChangelogError {
  /// No changelog file was resolved
  Missing,

  /// The changelog exists but no version section matched
  Empty { path: PathBuf },
}

impl ChangelogError {
  fn help_message(&self) -> Option<String> {
    match self {
      ChangelogError::Missing => Some("Create a CHANGELOG.md or set `changelog_path`.".to_string()),
      ChangelogError::Empty { .. } => {
        Some("Version headings look like `## [1.2.3] - 2024-01-15` (see keepachangelog.com).".to_string())
      }
    }
  }
}

impl fmt::Display for ChangelogError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ChangelogError::Missing => write!(f, "No changelog file found"),
      ChangelogError::Empty { path } => {
        write!(f, "Parsing the changelog ({}) returned an empty content", path.display())
      }
    }
  }
}

/// Release version errors
#[derive(Debug)]
pub enum ReleaseError {
  /// The release version does not have an accepted shape
  InvalidVersion { version: String },

  /// No next version can be derived from the tag
  NoNextVersion { tag: String },
}

impl ReleaseError {
  fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::InvalidVersion { .. } => Some(
        "Use a version like 'v1.1.1', 'v1.1', '1.0.1' or '1.1' (semver recommended), or pass --no-validation."
          .to_string(),
      ),
      ReleaseError::NoNextVersion { .. } => Some("Tags need three dot-separated numbers, e.g. 1.2.3.".to_string()),
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::InvalidVersion { version } => {
        write!(f, "Unable to validate the release version '{}'", version)
      }
      ReleaseError::NoNextVersion { tag } => {
        write!(f, "Cannot derive a next version from tag '{}'", tag)
      }
    }
  }
}

/// Result type alias for qgis-plugin-ci
pub type PluginCiResult<T> = Result<T, PluginCiError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> PluginCiResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> PluginCiResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<PluginCiError>,
{
  fn context(self, ctx: impl Into<String>) -> PluginCiResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> PluginCiResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &PluginCiError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
