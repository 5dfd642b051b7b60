//! Requirement extraction from a line-oriented document.
//!
//! The extractor walks the document once. For each line carrying a marker it
//! looks upward for the nearest heading (the title) and downward past the
//! `Status:` line for the first lines of prose (the description). Both
//! lookups are independent windows over the same immutable slice: nothing is
//! consumed, so two markers may read the same heading or the same prose.

use non_empty_string::NonEmptyString;

use crate::domain::{
    marker::{Marker, MarkerPattern},
    Requirement,
};

/// Longest description emitted, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 250;

/// Most lines accumulated into a description.
pub const MAX_DESCRIPTION_LINES: usize = 2;

/// Appended to a description that was cut at [`MAX_DESCRIPTION_CHARS`].
pub const CONTINUATION: &str = "...";

/// Prefix of the line that opens the description window.
pub const STATUS_PREFIX: &str = "Status:";

/// Prefixes of the attribute lines that close a description.
pub const SECTION_PREFIXES: [&str; 6] = [
    "Tags:",
    "Needs:",
    "Comment:",
    "Rationale:",
    "Assumptions:",
    "Considered alternatives:",
];

const NAME_SEPARATORS: [char; 2] = ['-', '_'];

/// Extracts requirements from documents using one marker pattern.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    pattern: MarkerPattern,
}

impl Extractor {
    /// Creates an extractor recognising markers with the given tag keyword.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            pattern: MarkerPattern::new(tag),
        }
    }

    /// The marker pattern in use.
    #[must_use]
    pub const fn pattern(&self) -> &MarkerPattern {
        &self.pattern
    }

    /// Returns one requirement per marker in `lines`, in document order.
    ///
    /// This never fails: a marker without a heading above it gets a title
    /// synthesized from its name, and a marker without a description gets
    /// its title as description.
    pub fn extract<S: AsRef<str>>(&self, lines: &[S], component: &str) -> Vec<Requirement> {
        lines
            .iter()
            .enumerate()
            .filter_map(|(index, line)| {
                let marker = self.pattern.find(line.as_ref().trim())?;
                Some(self.assemble(lines, index, component, marker))
            })
            .collect()
    }

    fn assemble<S: AsRef<str>>(
        &self,
        lines: &[S],
        index: usize,
        component: &str,
        marker: Marker,
    ) -> Requirement {
        let title = find_title_above(lines, index).unwrap_or_else(|| {
            tracing::debug!(
                name = %marker.name.as_str(),
                "no heading above marker, synthesizing title"
            );
            synthesize_title(&marker.name)
        });

        let description = self
            .find_description_below(lines, index)
            .unwrap_or_else(|| title.clone());

        tracing::debug!(
            line = index + 1,
            name = %marker.name.as_str(),
            version = %marker.version.as_str(),
            "found requirement"
        );

        Requirement::new(component, marker, title, truncate_description(description))
    }

    /// Recovers the description of the marker on line `index`.
    ///
    /// Everything up to and including the first `Status:` line is skipped,
    /// then blank lines are skipped until prose appears. Prose is
    /// accumulated until an attribute line, a heading, another marker, a
    /// blank line or [`MAX_DESCRIPTION_LINES`] lines. Returns `None` if no
    /// prose was found before the end of the document.
    #[must_use]
    pub fn find_description_below<S: AsRef<str>>(
        &self,
        lines: &[S],
        index: usize,
    ) -> Option<NonEmptyString> {
        let mut found_status = false;
        let mut collected: Vec<&str> = Vec::new();

        for line in lines.iter().skip(index + 1) {
            let line = line.as_ref().trim();

            if line.starts_with(STATUS_PREFIX) {
                found_status = true;
                continue;
            }
            if !found_status {
                continue;
            }
            if line.is_empty() {
                if collected.is_empty() {
                    continue;
                }
                break;
            }
            if closes_description(line) || self.pattern.is_match(line) {
                break;
            }

            collected.push(line);
            if collected.len() >= MAX_DESCRIPTION_LINES {
                break;
            }
        }

        NonEmptyString::new(collected.join(" ")).ok()
    }
}

/// Recovers the title for the marker on line `index`.
///
/// Scans upward to the start of the document and returns the text of the
/// first heading found. Blank lines, list items, table rows and prose are
/// passed over.
#[must_use]
pub fn find_title_above<S: AsRef<str>>(lines: &[S], index: usize) -> Option<NonEmptyString> {
    lines[..index.min(lines.len())]
        .iter()
        .rev()
        .find_map(|line| heading_text(line.as_ref().trim()))
        .and_then(|text| NonEmptyString::new(text.to_string()).ok())
}

/// Builds a title from a requirement name.
///
/// Separators become spaces and every word is capitalized, so `req-x`
/// becomes `Req X`. A letter following any non-letter starts a new word.
#[must_use]
pub fn synthesize_title(name: &NonEmptyString) -> NonEmptyString {
    let mut title = String::with_capacity(name.as_str().len());
    let mut in_word = false;

    for c in name.as_str().chars() {
        let c = if NAME_SEPARATORS.contains(&c) { ' ' } else { c };
        if c.is_alphabetic() {
            if in_word {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            title.push(c);
            in_word = false;
        }
    }

    if title.trim().is_empty() {
        return name.clone();
    }
    NonEmptyString::new(title).unwrap_or_else(|_| name.clone())
}

/// Caps a description at [`MAX_DESCRIPTION_CHARS`] characters.
///
/// Longer text keeps its first characters and ends with [`CONTINUATION`],
/// for exactly [`MAX_DESCRIPTION_CHARS`] characters in total.
#[must_use]
pub fn truncate_description(description: NonEmptyString) -> NonEmptyString {
    if description.as_str().chars().count() <= MAX_DESCRIPTION_CHARS {
        return description;
    }

    let keep = MAX_DESCRIPTION_CHARS - CONTINUATION.chars().count();
    let mut truncated: String = description.as_str().chars().take(keep).collect();
    truncated.push_str(CONTINUATION);

    NonEmptyString::new(truncated).unwrap_or(description)
}

/// The text of a heading line (`#`s, whitespace, text), or `None`.
fn heading_text(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches('#');
    if rest.len() == line.len() || !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    (!text.is_empty()).then_some(text)
}

fn closes_description(line: &str) -> bool {
    SECTION_PREFIXES
        .iter()
        .any(|prefix| line.starts_with(prefix))
        || heading_text(line).is_some()
}
