//! Domain models for requirement extraction.
//!
//! This module contains the marker pattern, the extractor and the
//! requirement records it produces, along with the export configuration.

mod config;
pub use config::{writes_to_stdout, Config, Error as ConfigError, Source};

pub mod extract;
pub use extract::Extractor;

pub mod marker;
pub use marker::{Marker, MarkerPattern};

mod requirement;
pub use requirement::Requirement;
