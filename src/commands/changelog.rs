//! Changelog command: print the notes of one version

use crate::changelog::VersionNote;
use crate::core::context::PluginContext;
use crate::core::error::PluginCiResult;
use clap::ValueEnum;
use serde::Serialize;

/// Output format for the changelog command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
  /// Section body only
  Text,
  /// Full section, heading included
  Markdown,
  /// Parsed note as JSON (`null` when absent)
  Json,
}

/// JSON view of a version note: stored fields plus derived ones
#[derive(Debug, Serialize)]
struct NoteView<'a> {
  version: Option<String>,
  /// Strict semver rendering, when the version is semver
  semver: Option<String>,
  is_prerelease: bool,
  text: &'a str,
  #[serde(flatten)]
  note: &'a VersionNote,
}

impl<'a> NoteView<'a> {
  fn new(note: &'a VersionNote) -> Self {
    Self {
      version: note.version(),
      semver: note.semver().map(|version| version.to_string()),
      is_prerelease: note.is_prerelease(),
      text: note.text(),
      note,
    }
  }
}

/// Run the changelog command
///
/// An unknown version prints nothing (or `null`), it is not an error.
pub fn run_changelog(ctx: &PluginContext, release_version: &str, format: OutputFormat) -> PluginCiResult<()> {
  let output = match format {
    OutputFormat::Text => ctx.changelog.content(release_version)?,
    _ => render(ctx.changelog.version_note(release_version)?.as_ref(), format)?,
  };
  if let Some(output) = output {
    println!("{}", output);
  }
  Ok(())
}

fn render(note: Option<&VersionNote>, format: OutputFormat) -> PluginCiResult<Option<String>> {
  Ok(match format {
    OutputFormat::Text => note.map(|note| note.text().to_string()),
    OutputFormat::Markdown => note.and_then(VersionNote::to_markdown).map(|md| md.trim_end().to_string()),
    OutputFormat::Json => Some(serde_json::to_string_pretty(&note.map(NoteView::new))?),
  })
}
