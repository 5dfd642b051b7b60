//! Inline requirement markers.
//!
//! A marker is an inline code span of the form `` `tag~name~version` ``. The
//! tag keyword is configurable (OpenFastTrace design documents use `swdd`).

use non_empty_string::NonEmptyString;
use regex::Regex;

/// The tag keyword recognised when none is configured.
pub const DEFAULT_TAG: &str = "tag";

/// The compiled marker pattern for one tag keyword.
#[derive(Debug, Clone)]
pub struct MarkerPattern {
    tag: String,
    regex: Regex,
}

impl MarkerPattern {
    /// Compiles the marker pattern for the given tag keyword.
    ///
    /// The keyword is matched literally.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        let pattern = format!(r"`{}~([^~]+)~(\d+)`", regex::escape(tag));
        let regex = Regex::new(&pattern).expect("an escaped tag always forms a valid pattern");
        Self {
            tag: tag.to_string(),
            regex,
        }
    }

    /// The tag keyword this pattern recognises.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the first marker in `line`, if any.
    #[must_use]
    pub fn find(&self, line: &str) -> Option<Marker> {
        let captures = self.regex.captures(line)?;
        let name = NonEmptyString::new(captures[1].to_string()).ok()?;
        let version = NonEmptyString::new(captures[2].to_string()).ok()?;
        Some(Marker { name, version })
    }

    /// Whether `line` contains a marker anywhere.
    #[must_use]
    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

impl Default for MarkerPattern {
    fn default() -> Self {
        Self::new(DEFAULT_TAG)
    }
}

/// The fields of one marker occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// The requirement name, verbatim.
    pub name: NonEmptyString,
    /// The version digits, verbatim.
    pub version: NonEmptyString,
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn finds_name_and_version() {
        let marker = MarkerPattern::default()
            .find("`tag~req-x~1`")
            .expect("marker should match");
        assert_eq!(marker.name.as_str(), "req-x");
        assert_eq!(marker.version.as_str(), "1");
    }

    #[test]
    fn first_marker_wins() {
        let marker = MarkerPattern::default()
            .find("see `tag~first~2` and `tag~second~3`")
            .unwrap();
        assert_eq!(marker.name.as_str(), "first");
        assert_eq!(marker.version.as_str(), "2");
    }

    #[test]
    fn version_keeps_leading_zeros() {
        let marker = MarkerPattern::default().find("`tag~a~007`").unwrap();
        assert_eq!(marker.version.as_str(), "007");
    }

    #[test]
    fn configured_tag_is_matched_literally() {
        let pattern = MarkerPattern::new("swdd");
        assert!(pattern.is_match("`swdd~agent-starts-workload~1`"));
        assert!(!pattern.is_match("`tag~agent-starts-workload~1`"));

        let dotted = MarkerPattern::new("a.b");
        assert!(dotted.is_match("`a.b~x~1`"));
        assert!(!dotted.is_match("`axb~x~1`"));
    }

    #[test_case("tag~req~1"; "missing backticks")]
    #[test_case("`tag~req~`"; "missing version")]
    #[test_case("`tag~req~v1`"; "non numeric version")]
    #[test_case("`tag~~1`"; "empty name")]
    #[test_case("`tags~req~1`"; "different keyword")]
    fn rejects(line: &str) {
        assert!(MarkerPattern::default().find(line).is_none());
    }
}
