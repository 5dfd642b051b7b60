//! Issue-tracker shaped JSON report.
//!
//! Every requirement becomes one issue. Issues are numbered from 1 in the
//! order they are given, and the number is used both as the issue id and in
//! the issue key (`REQ-D-<component>-<NNN>`).

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use serde::Serialize;

use crate::domain::Requirement;

/// Prefix of every issue key.
pub const KEY_PREFIX: &str = "REQ-D";

/// Builds the issue key for the requirement numbered `index` (1-based).
#[must_use]
pub fn issue_key(component: &str, index: usize) -> String {
    format!("{KEY_PREFIX}-{component}-{index:03}")
}

/// The report envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<'a> {
    expand: &'static str,
    start_at: usize,
    max_results: usize,
    total: usize,
    issues: Vec<Issue<'a>>,
}

#[derive(Debug, Clone, Serialize)]
struct Issue<'a> {
    id: String,
    key: String,
    fields: Fields<'a>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Fields<'a> {
    summary: &'a str,
    #[serde(rename = "issuetype")]
    issue_type: IssueType,
    status: Status,
    assignee: Account,
    reporter: Account,
    description: &'a str,
    verifiable_by_code_only: bool,
}

#[derive(Debug, Clone, Serialize)]
struct IssueType {
    id: String,
    description: &'static str,
    name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct Status {
    id: &'static str,
    name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Account {
    display_name: &'static str,
    account_id: &'static str,
}

const APPROVED: Status = Status {
    id: "approved",
    name: "Approved",
};

const UNASSIGNED: Account = Account {
    display_name: "Unassigned",
    account_id: "unassigned",
};

const SYSTEM: Account = Account {
    display_name: "System",
    account_id: "system",
};

impl<'a> Report<'a> {
    /// Builds a report over the requirements, numbering them from 1.
    pub fn new<I>(requirements: I) -> Self
    where
        I: IntoIterator<Item = &'a Requirement>,
    {
        let issues: Vec<_> = requirements
            .into_iter()
            .zip(1..)
            .map(|(requirement, index)| Issue::new(requirement, index))
            .collect();
        let total = issues.len();

        Self {
            expand: "schema,names",
            start_at: 0,
            max_results: total,
            total,
            issues,
        }
    }

    /// The number of issues in the report.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Writes the report as pretty-printed JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), WriteError> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the report to a file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written to.
    pub fn save(&self, path: &Path) -> Result<(), WriteError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)
    }
}

impl<'a> Issue<'a> {
    fn new(requirement: &'a Requirement, index: usize) -> Self {
        Self {
            id: index.to_string(),
            key: issue_key(requirement.component(), index),
            fields: Fields {
                summary: requirement.title(),
                issue_type: IssueType {
                    id: index.to_string(),
                    description: "Software design requirement",
                    name: "Design Requirement",
                },
                status: APPROVED,
                assignee: UNASSIGNED,
                reporter: SYSTEM,
                description: requirement.description(),
                verifiable_by_code_only: true,
            },
        }
    }
}

/// Errors that can occur when writing a report.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// An I/O error occurred.
    #[error("failed to write report")]
    Io(#[from] io::Error),
    /// The report could not be serialized.
    #[error("failed to serialize report")]
    Json(#[from] serde_json::Error),
}
