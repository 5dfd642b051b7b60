use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::marker::DEFAULT_TAG;

/// Configuration for a requirements export.
///
/// Holds the marker tag keyword, where the report is written, and the
/// ordered table of sources to scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The tag keyword of requirement markers.
    ///
    /// For example, `swdd` matches markers like `` `swdd~name~1` ``.
    tag: String,

    /// Where the JSON report is written.
    output: PathBuf,

    /// Whether a source path that does not exist is skipped with a warning
    /// rather than failing the export.
    pub allow_missing: bool,

    /// The documents to scan, in order.
    ///
    /// The order is significant: requirement keys are numbered in the order
    /// their sources appear here.
    sources: Vec<Source>,
}

/// One entry in the source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// The component label given to every requirement found in this source.
    pub component: String,
    /// A markdown file, or a directory whose markdown files are scanned.
    pub path: PathBuf,
}

impl Source {
    /// Creates a source entry.
    #[must_use]
    pub fn new(component: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            component: component.into(),
            path: path.into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            output: default_output(),
            allow_missing: false,
            sources: Vec::new(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// Relative source and output paths are resolved against the directory
    /// containing the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolved_against(base))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the marker tag keyword.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Sets the marker tag keyword.
    pub fn set_tag(&mut self, tag: String) {
        self.tag = tag;
    }

    /// Returns the report output path.
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Sets the report output path.
    pub fn set_output(&mut self, output: PathBuf) {
        self.output = output;
    }

    /// Returns the source table, in order.
    #[must_use]
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Replaces the whole source table.
    pub fn set_sources(&mut self, sources: Vec<Source>) {
        self.sources = sources;
    }

    /// Appends a source to the end of the table.
    pub fn add_source(&mut self, source: Source) {
        self.sources.push(source);
    }

    fn resolved_against(mut self, base: &Path) -> Self {
        for source in &mut self.sources {
            if source.path.is_relative() {
                source.path = base.join(&source.path);
            }
        }
        if self.output.is_relative() && !writes_to_stdout(&self.output) {
            self.output = base.join(&self.output);
        }
        self
    }
}

/// Errors reading or writing a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file could not be read.
    #[error("failed to read config file {}", path.display())]
    Read {
        /// The config file.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// The file is not a valid configuration.
    #[error("failed to parse config file {}", path.display())]
    Parse {
        /// The config file.
        path: PathBuf,
        /// The underlying error.
        source: toml::de::Error,
    },
    /// The configuration could not be serialized.
    #[error("failed to serialize config")]
    Serialize(#[from] toml::ser::Error),
    /// The file could not be written.
    #[error("failed to write config file {}", path.display())]
    Write {
        /// The config file.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
}

/// Whether an output path names standard output (`-`).
#[must_use]
pub fn writes_to_stdout(output: &Path) -> bool {
    output == Path::new("-")
}

fn default_tag() -> String {
    DEFAULT_TAG.to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from("readme.json")
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_tag")]
        tag: String,

        #[serde(default = "default_output")]
        output: PathBuf,

        #[serde(default)]
        allow_missing: bool,

        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        sources: Vec<Source>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                tag,
                output,
                allow_missing,
                sources,
            } => Self {
                tag,
                output,
                allow_missing,
                sources,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            tag: config.tag,
            output: config.output,
            allow_missing: config.allow_missing,
            sources: config.sources,
        }
    }
}
