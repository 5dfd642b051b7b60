//! Scanning configured sources for requirements.
//!
//! A [`Scan`] expands each configured source into documents (a file is one
//! document, a directory contributes every markdown file below it), loads the
//! documents in parallel and extracts their requirements. Results keep the
//! order of the source table, which is the order keys are numbered in.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use walkdir::WalkDir;

use crate::{
    domain::{Config, Extractor, Requirement, Source},
    storage::document::{Document, LoadError},
};

/// The requirements found in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedDocument {
    /// The component label of the document.
    pub component: String,
    /// Where the document was read from.
    pub path: PathBuf,
    /// The requirements, in document order.
    pub requirements: Vec<Requirement>,
}

/// The outcome of scanning every source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scan {
    documents: Vec<ScannedDocument>,
}

impl Scan {
    /// Scans the sources named by the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read. A source path that does
    /// not exist is skipped instead when `allow_missing` is set.
    pub fn run(config: &Config) -> Result<Self, ScanError> {
        let extractor = Extractor::new(config.tag());
        Self::run_with(config.sources(), &extractor, config.allow_missing)
    }

    /// Scans the given sources with an explicit extractor.
    ///
    /// # Errors
    ///
    /// See [`Scan::run`].
    pub fn run_with(
        sources: &[Source],
        extractor: &Extractor,
        allow_missing: bool,
    ) -> Result<Self, ScanError> {
        let mut targets = Vec::new();
        for source in sources {
            if !source.path.exists() {
                if allow_missing {
                    tracing::warn!(
                        "Skipping missing source for {}: {}",
                        source.component,
                        source.path.display()
                    );
                    continue;
                }
                return Err(LoadError::NotFound(source.path.clone()).into());
            }
            targets.extend(
                expand_source(&source.path)?
                    .into_iter()
                    .map(|path| (source.component.as_str(), path)),
            );
        }

        let documents = targets
            .into_par_iter()
            .map(|(component, path)| scan_document(component, path, extractor))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { documents })
    }

    /// The scanned documents, in source order.
    #[must_use]
    pub fn documents(&self) -> &[ScannedDocument] {
        &self.documents
    }

    /// Every requirement found, in source order then document order.
    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.documents
            .iter()
            .flat_map(|document| document.requirements.iter())
    }

    /// The total number of requirements found.
    #[must_use]
    pub fn total(&self) -> usize {
        self.documents
            .iter()
            .map(|document| document.requirements.len())
            .sum()
    }
}

fn scan_document(
    component: &str,
    path: PathBuf,
    extractor: &Extractor,
) -> Result<ScannedDocument, LoadError> {
    tracing::info!("Processing {component} from {}", path.display());

    let document = Document::load(component, &path)?;
    let requirements = document.requirements(extractor);

    tracing::info!("Found {} requirements in {}", requirements.len(), path.display());

    Ok(ScannedDocument {
        component: component.to_string(),
        path,
        requirements,
    })
}

/// Expands a source path into the documents it names.
fn expand_source(path: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let paths = collect_markdown_paths(path)?;
    if paths.is_empty() {
        tracing::warn!("No markdown files found in {}", path.display());
    }
    Ok(paths)
}

fn collect_markdown_paths(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && entry.path().extension() == Some(OsStr::new("md")) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

/// Errors that can occur while scanning sources.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// A document could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// A source directory could not be traversed.
    #[error("failed to walk source directory")]
    Walk(#[from] walkdir::Error),
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn names(scan: &Scan) -> Vec<String> {
        scan.requirements()
            .map(|req| format!("{}:{}", req.component(), req.name()))
            .collect()
    }

    #[test]
    fn keeps_source_order() {
        let tmp = TempDir::new().unwrap();
        let server = tmp.path().join("server.md");
        let agent = tmp.path().join("agent.md");
        write(&server, "## S\n`tag~s1~1`\n## S2\n`tag~s2~1`\n");
        write(&agent, "## A\n`tag~a1~1`\n");

        let sources = [Source::new("Server", &server), Source::new("Agent", &agent)];
        let scan = Scan::run_with(&sources, &Extractor::default(), false).unwrap();

        assert_eq!(names(&scan), ["Server:s1", "Server:s2", "Agent:a1"]);
        assert_eq!(scan.total(), 3);
        assert_eq!(scan.documents().len(), 2);
    }

    #[test]
    fn directories_expand_to_markdown_files_by_name() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("docs");
        write(&root.join("b.md"), "`tag~b~1`\n");
        write(&root.join("a.md"), "`tag~a~1`\n");
        write(&root.join("nested/c.md"), "`tag~c~1`\n");
        write(&root.join("notes.txt"), "`tag~ignored~1`\n");

        let sources = [Source::new("Common", &root)];
        let scan = Scan::run_with(&sources, &Extractor::default(), false).unwrap();

        assert_eq!(names(&scan), ["Common:a", "Common:b", "Common:c"]);
    }

    #[test]
    fn empty_directory_yields_no_documents() {
        let tmp = TempDir::new().unwrap();

        let sources = [Source::new("Empty", tmp.path())];
        let scan = Scan::run_with(&sources, &Extractor::default(), false).unwrap();

        assert!(scan.documents().is_empty());
        assert_eq!(scan.total(), 0);
    }

    #[test]
    fn missing_source_is_an_error() {
        let tmp = TempDir::new().unwrap();

        let sources = [Source::new("Agent", tmp.path().join("missing.md"))];
        let result = Scan::run_with(&sources, &Extractor::default(), false);

        assert!(matches!(
            result,
            Err(ScanError::Load(LoadError::NotFound(_)))
        ));
    }

    #[test]
    fn missing_source_can_be_skipped() {
        let tmp = TempDir::new().unwrap();
        let present = tmp.path().join("present.md");
        write(&present, "`tag~p~1`\n");

        let sources = [
            Source::new("Agent", tmp.path().join("missing.md")),
            Source::new("Server", &present),
        ];
        let scan = Scan::run_with(&sources, &Extractor::default(), true).unwrap();

        assert_eq!(names(&scan), ["Server:p"]);
    }

    #[test]
    fn run_uses_configured_tag() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("README.md");
        write(&path, "`swdd~s~1`\n`tag~t~1`\n");

        let mut config = Config::default();
        config.set_tag("swdd".to_string());
        config.add_source(Source::new("Ank", &path));

        let scan = Scan::run(&config).unwrap();

        assert_eq!(names(&scan), ["Ank:s"]);
    }
}
