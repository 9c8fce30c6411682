//! Version notes: one changelog section, or one release tag
//!
//! A note is a plain record. Everything else (`text`, `version`,
//! `is_prerelease`, `next_version`) is derived from its stored fields.

use serde::Serialize;

/// Pre-release label given to the first build after a regular release
const FIRST_PRERELEASE: &str = "alpha";

/// A version section of the changelog, or a version parsed from a tag
///
/// Fields are absent when the note comes from a tag that could not be split
/// into three components. Such a note means "version unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VersionNote {
  pub major: Option<String>,
  pub minor: Option<String>,
  pub patch: Option<String>,
  /// Parenthesized compare-link after the heading version
  pub url: Option<String>,
  pub prerelease: Option<String>,
  /// Build-metadata capture (`+...`); never part of [`VersionNote::version`]
  pub separator: Option<String>,
  /// Raw date token, as written in the heading
  pub date: Option<String>,
  pub text_raw: Option<String>,
}

impl VersionNote {
  /// Build a note from its version components only
  pub fn new(major: &str, minor: &str, patch: &str, prerelease: Option<&str>) -> Self {
    Self {
      major: Some(major.to_string()),
      minor: Some(minor.to_string()),
      patch: Some(patch.to_string()),
      prerelease: prerelease.map(str::to_string),
      ..Default::default()
    }
  }

  /// Body text with surrounding whitespace and blank lines removed
  pub fn text(&self) -> &str {
    self.text_raw.as_deref().map(str::trim).unwrap_or_default()
  }

  pub fn is_prerelease(&self) -> bool {
    self.prerelease.as_deref().is_some_and(|p| !p.is_empty())
  }

  /// `major.minor.patch[-prerelease]`, or `None` for an unknown version
  pub fn version(&self) -> Option<String> {
    let (major, minor, patch) = self.triplet()?;
    match self.prerelease.as_deref() {
      Some(pre) if !pre.is_empty() => Some(format!("{}.{}.{}-{}", major, minor, patch, pre)),
      _ => Some(format!("{}.{}.{}", major, minor, patch)),
    }
  }

  /// Strict semver view of this note (build metadata included)
  pub fn semver(&self) -> Option<semver::Version> {
    let mut version = self.version()?;
    if let Some(build) = self.separator.as_deref().filter(|b| !b.is_empty()) {
      version.push('+');
      version.push_str(build);
    }
    semver::Version::parse(&version).ok()
  }

  /// Suggest the version that follows this one
  ///
  /// A regular release moves to the next patch as the first pre-release.
  /// A pre-release keeps its triplet and bumps the trailing number of its
  /// label, or gets `.1` appended when the label has no trailing number.
  pub fn next_version(&self) -> Option<VersionNote> {
    let (major, minor, patch) = self.triplet()?;

    if !self.is_prerelease() {
      let next_patch = patch.parse::<u64>().ok()?.checked_add(1)?;
      return Some(VersionNote::new(
        major,
        minor,
        &next_patch.to_string(),
        Some(FIRST_PRERELEASE),
      ));
    }

    let prerelease = self.prerelease.as_deref()?;
    Some(VersionNote::new(major, minor, patch, Some(&bump_prerelease(prerelease)?)))
  }

  /// Render as a changelog section (`## [version] - date` plus body)
  pub fn to_markdown(&self) -> Option<String> {
    let mut output = format!("## [{}", self.version()?);
    if let Some(build) = self.separator.as_deref().filter(|b| !b.is_empty()) {
      output.push_str(&format!("+{}", build));
    }
    output.push_str(&format!("] - {}\n\n", self.date.as_deref()?));

    let text = self.text();
    if !text.is_empty() {
      output.push_str(text);
      output.push('\n');
    }
    Some(output)
  }

  fn triplet(&self) -> Option<(&str, &str, &str)> {
    Some((
      self.major.as_deref()?,
      self.minor.as_deref()?,
      self.patch.as_deref()?,
    ))
  }
}

fn bump_prerelease(prerelease: &str) -> Option<String> {
  let label = prerelease.trim_end_matches(|c: char| c.is_ascii_digit());
  let digits = &prerelease[label.len()..];

  if digits.is_empty() {
    return Some(format!("{}.1", prerelease));
  }

  let next = digits.parse::<u64>().ok()?.checked_add(1)?;
  Some(format!("{}{}", label, next))
}

/// Parse a release tag into a version note, without any changelog
///
/// Best effort: a tag with fewer than three dot-separated components yields an
/// all-absent note. A leading `v` stays part of the major component.
pub fn parse_tag(version_tag: &str) -> VersionNote {
  let (core, prerelease) = match version_tag.split_once('-') {
    Some((core, pre)) => (core, Some(pre)),
    None => (version_tag, None),
  };

  let items: Vec<&str> = core.split('.').collect();
  if items.len() < 3 {
    return VersionNote::default();
  }

  VersionNote::new(items[0], items[1], items[2], prerelease)
}
