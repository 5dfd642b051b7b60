//! Documents read from disk.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::domain::{Extractor, Requirement};

/// A text document attributed to one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    component: String,
    path: PathBuf,
    lines: Vec<String>,
}

impl Document {
    /// Reads a UTF-8 text file as a document.
    ///
    /// Both `\n` and `\r\n` line endings are accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be read, or is not
    /// valid UTF-8.
    pub fn load(component: impl Into<String>, path: &Path) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|io_error| match io_error.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
            io::ErrorKind::InvalidData => LoadError::Encoding(path.to_path_buf()),
            _ => LoadError::Io {
                path: path.to_path_buf(),
                source: io_error,
            },
        })?;

        Ok(Self::from_lines(
            component,
            path,
            content.lines().map(str::to_string).collect(),
        ))
    }

    /// Creates a document from lines already in memory.
    #[must_use]
    pub fn from_lines(
        component: impl Into<String>,
        path: impl Into<PathBuf>,
        lines: Vec<String>,
    ) -> Self {
        Self {
            component: component.into(),
            path: path.into(),
            lines,
        }
    }

    /// The component label of the document.
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Where the document was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The document's lines, without line terminators.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Runs the extractor over this document.
    #[must_use]
    pub fn requirements(&self, extractor: &Extractor) -> Vec<Requirement> {
        extractor.extract(&self.lines, &self.component)
    }
}

/// Errors that can occur when loading a document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The document was not found.
    #[error("document not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The document is not valid UTF-8.
    #[error("document is not valid UTF-8: {}", .0.display())]
    Encoding(PathBuf),
    /// An I/O error occurred.
    #[error("failed to read document {}", path.display())]
    Io {
        /// The document path.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn load_splits_lines() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("README.md");
        fs::write(&path, "# Title\r\n`tag~a~1`\r\nStatus: approved\nBody\n").unwrap();

        let document = Document::load("Agent", &path).unwrap();

        assert_eq!(document.component(), "Agent");
        assert_eq!(document.path(), path);
        assert_eq!(
            document.lines(),
            ["# Title", "`tag~a~1`", "Status: approved", "Body"]
        );
    }

    #[test]
    fn requirements_use_document_component() {
        let document = Document::from_lines(
            "Server",
            "memory",
            vec!["## Heading".to_string(), "`tag~s~4`".to_string()],
        );

        let requirements = document.requirements(&Extractor::default());

        assert_eq!(requirements.len(), 1);
        assert_eq!(requirements[0].component(), "Server");
        assert_eq!(requirements[0].title(), "Heading");
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();

        let result = Document::load("Agent", &tmp.path().join("missing.md"));

        assert!(matches!(result, Err(LoadError::NotFound(_))));
    }

    #[test]
    fn invalid_utf8_is_an_encoding_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("latin1.md");
        fs::write(&path, [0x23, 0x20, 0xe9, 0xff, 0x0a]).unwrap();

        let result = Document::load("Agent", &path);

        assert!(matches!(result, Err(LoadError::Encoding(_))));
    }
}
