pub mod document;
pub mod report;
pub mod scan;

pub use document::{Document, LoadError};
pub use report::{issue_key, Report, WriteError};
pub use scan::{Scan, ScanError, ScannedDocument};
