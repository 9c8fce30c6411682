//! Version-section grammar for Keep-a-Changelog files
//!
//! A section starts right after any `##` and reads:
//!
//! ```text
//! ## [v1.2.3](compare-link)-rc.1+build.5] - 2024-01-15
//! body... up to the next `##` or end of file
//! ```
//!
//! Every part except the triplet, the ` - ` separator and the 10-character date
//! is optional. Headings that do not match produce no section.

use super::version_note::VersionNote;
use winnow::ModalResult;
use winnow::combinator::{opt, preceded, repeat};
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_while};

/// Marker that opens a section heading (and closes the previous body)
const HEADING_MARK: &str = "##";

/// Length of the date token (`2024-01-15`, `15/01/2024`, ...)
const DATE_LEN: usize = 10;

/// A matched version heading, borrowed from the changelog text
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Heading<'a> {
  pub major: &'a str,
  pub minor: &'a str,
  pub patch: &'a str,
  pub url: Option<&'a str>,
  pub prerelease: Option<&'a str>,
  pub build: Option<&'a str>,
  pub date: &'a str,
}

impl Heading<'_> {
  fn into_note(self, body: &str) -> VersionNote {
    VersionNote {
      major: Some(self.major.to_string()),
      minor: Some(self.minor.to_string()),
      patch: Some(self.patch.to_string()),
      url: self.url.map(str::to_string),
      prerelease: self.prerelease.map(str::to_string),
      separator: self.build.map(str::to_string),
      date: Some(self.date.to_string()),
      text_raw: Some(body.to_string()),
    }
  }
}

/// Extract every version section, in file order
pub fn parse_sections(content: &str) -> Vec<VersionNote> {
  let mut notes = Vec::new();
  let mut cursor = 0;

  while let Some(found) = content[cursor..].find(HEADING_MARK) {
    let marker = cursor + found;
    let mut input = &content[marker + HEADING_MARK.len()..];

    match heading(&mut input) {
      Ok(heading) => {
        let body_start = content.len() - input.len();
        let body_end = content[body_start..]
          .find(HEADING_MARK)
          .map_or(content.len(), |offset| body_start + offset);
        notes.push(heading.into_note(&content[body_start..body_end]));
        cursor = body_end;
      }
      // `### 1.0.0 - ...` is retried one character later and matches there
      Err(_) => cursor = marker + 1,
    }
  }

  notes
}

/// Parse one heading, starting right after its `##`
pub(crate) fn heading<'i>(input: &mut &'i str) -> ModalResult<Heading<'i>> {
  (
    take_while(0.., char::is_whitespace),
    take_while(0.., '['),
    opt('v'),
    numeric,
    '.',
    numeric,
    '.',
    numeric,
    opt(']'),
    opt(compare_link),
    opt(preceded('-', prerelease)),
    opt(preceded('+', build_metadata)),
    take_while(0.., ']'),
    one_of(char::is_whitespace),
    '-',
    take_while(0.., char::is_whitespace),
    take_while(DATE_LEN, is_date_char),
  )
    .map(
      |(_, _, _, major, _, minor, _, patch, _, url, prerelease, build, _, _, _, _, date)| Heading {
        major,
        minor,
        patch,
        url,
        prerelease,
        build,
        date,
      },
    )
    .parse_next(input)
}

/// Version component: `0` or digits without a leading zero
fn numeric<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
  take_while(1.., |c: char| c.is_ascii_digit())
    .verify(|digits: &str| !has_leading_zero(digits))
    .parse_next(input)
}

/// One or more `(...)` groups right after the version, kept on the heading line
fn compare_link<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
  repeat(1.., ('(', take_till(0.., [')', '\n']), ')'))
    .map(|()| ())
    .take()
    .parse_next(input)
}

/// Dot-separated semver pre-release identifiers
fn prerelease<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
  (
    prerelease_identifier,
    repeat(0.., ('.', prerelease_identifier)).map(|()| ()),
  )
    .take()
    .parse_next(input)
}

fn prerelease_identifier<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
  identifier
    .verify(|id: &str| !id.bytes().all(|b| b.is_ascii_digit()) || !has_leading_zero(id))
    .parse_next(input)
}

/// Dot-separated build identifiers (leading zeros allowed)
fn build_metadata<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
  (identifier, repeat(0.., ('.', identifier)).map(|()| ()))
    .take()
    .parse_next(input)
}

fn identifier<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
  take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '-').parse_next(input)
}

fn has_leading_zero(digits: &str) -> bool {
  digits.len() > 1 && digits.starts_with('0')
}

fn is_date_char(c: char) -> bool {
  c.is_ascii_digit() || c == '-' || c == '/'
}
