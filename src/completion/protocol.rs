//! The line protocol spoken between the binary and the generated shell scripts.
//!
//! ```text
//! value<TAB>description
//! value
//! :<directive>
//! ```
//!
//! Candidates come first in resolver order, one per line; the last line is
//! always the directive as a decimal integer prefixed with `:`.

use crate::completion::candidate::Candidate;
use crate::completion::directive::Directive;
use crate::completion::resolver::Resolution;
use std::io::{self, Write};
use tracing::warn;

/// Render one candidate as a protocol line, without the line terminator.
///
/// Returns `None` for values that would break the line framing.
pub fn candidate_line(candidate: &Candidate, include_descriptions: bool) -> Option<String> {
    if candidate.value.contains(|c: char| c == '\n' || c == '\r') {
        return None;
    }
    let description = candidate
        .description
        .as_deref()
        .filter(|_| include_descriptions)
        .and_then(first_line)
        .filter(|d| !d.is_empty());
    match description {
        Some(d) => Some(format!("{}\t{}", candidate.value, d)),
        None => Some(candidate.value.clone()),
    }
}

fn first_line(text: &str) -> Option<&str> {
    text.lines().next().map(str::trim_end)
}

/// Write a resolution in protocol form.
pub fn encode<W: Write + ?Sized>(
    out: &mut W,
    resolution: &Resolution,
    include_descriptions: bool,
) -> io::Result<()> {
    for candidate in &resolution.candidates {
        match candidate_line(candidate, include_descriptions) {
            Some(line) => writeln!(out, "{}", line)?,
            None => warn!(value = ?candidate.value, "Dropping candidate containing a line break"),
        }
    }
    writeln!(out, ":{}", resolution.directive.bits())
}

pub fn encode_to_string(resolution: &Resolution, include_descriptions: bool) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail
    let _ = encode(&mut buf, resolution, include_descriptions);
    String::from_utf8_lossy(&buf).into_owned()
}

/// The diagnostic line written to stderr after every completion request
pub fn trailer(directive: Directive) -> String {
    format!("Completion ended with directive: {}", directive)
}

/// A protocol stream as the shell scripts read it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub candidates: Vec<Candidate>,
    pub directive: Directive,
}

/// What a shell does with a response, independent of dialect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellAction {
    /// Error bit set: show nothing
    Ignore,
    /// Nothing offered and file completion allowed
    FileCompletion,
    /// Complete file names with these extensions
    FilterFileExt(Vec<String>),
    /// Complete directories, optionally below the given one
    FilterDirs(Option<String>),
    /// Exactly one candidate and NoSpace: insert it without a trailing space
    InsertNoSpace(Candidate),
    /// Offer the candidates; an empty list means no completion at all
    Offer {
        candidates: Vec<Candidate>,
        keep_order: bool,
    },
}

/// Parse a protocol stream the way the scripts do.
///
/// The last line of the form `:<N>` is the directive; a missing or malformed
/// directive reads as 0. Blank lines are skipped.
pub fn parse_response(text: &str) -> Response {
    let mut lines: Vec<&str> = text.lines().collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    let directive = match lines.last().and_then(|l| l.strip_prefix(':')) {
        Some(bits) => {
            let parsed = bits.trim().parse::<u32>().unwrap_or(0);
            lines.pop();
            Directive::from_bits(parsed)
        }
        None => Directive::DEFAULT,
    };

    let candidates = lines
        .into_iter()
        .filter(|l| !l.is_empty())
        .map(Candidate::parse)
        .collect();

    Response {
        candidates,
        directive,
    }
}

impl Response {
    pub fn action(&self) -> ShellAction {
        let d = self.directive;
        if d.contains(Directive::ERROR) {
            return ShellAction::Ignore;
        }
        if d.contains(Directive::FILTER_FILE_EXT) {
            return ShellAction::FilterFileExt(
                self.candidates.iter().map(|c| c.value.clone()).collect(),
            );
        }
        if d.contains(Directive::FILTER_DIRS) {
            return ShellAction::FilterDirs(self.candidates.first().map(|c| c.value.clone()));
        }
        match self.candidates.as_slice() {
            [] if !d.contains(Directive::NO_FILE_COMP) => ShellAction::FileCompletion,
            [only] if d.contains(Directive::NO_SPACE) => ShellAction::InsertNoSpace(only.clone()),
            _ => ShellAction::Offer {
                candidates: self.candidates.clone(),
                keep_order: d.contains(Directive::KEEP_ORDER),
            },
        }
    }
}
