//! Software design requirement extraction
//!
//! Requirements are tagged inline in markdown design documents with markers
//! like `` `swdd~name~1` ``. This crate finds them, recovers a title and a
//! short description for each, and exports them as an issue-tracker shaped
//! JSON report.

pub mod domain;
pub use domain::{writes_to_stdout, Config, ConfigError, Extractor, Requirement, Source};

/// Reading documents and writing reports.
pub mod storage;
pub use storage::{Document, Report, Scan};

/// Extracts the requirements from `lines` using the default marker tag.
///
/// See [`Extractor::extract`].
pub fn extract<S: AsRef<str>>(lines: &[S], component: &str) -> Vec<Requirement> {
    Extractor::default().extract(lines, component)
}
