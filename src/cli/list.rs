use clap::{Parser, ValueEnum};
use serde::Serialize;
use swdd::{storage::issue_key, Requirement, Scan};
use tracing::instrument;

use super::{
    terminal::{terminal_width, truncate, Colorize},
    ConfigLocation, SourceArgs,
};

/// Command arguments for `swdd-export list`.
#[derive(Debug, Parser)]
#[command(about = "List the requirements found in the sources")]
pub struct List {
    #[command(flatten)]
    sources: SourceArgs,

    /// Filter by component (comma-separated, case-insensitive).
    #[arg(long, value_delimiter = ',', value_name = "COMPONENT")]
    component: Vec<String>,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,

    /// Suppress headers and format rows for scripting.
    #[arg(long)]
    quiet: bool,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// One listed requirement.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct Row<'a> {
    key: String,
    component: &'a str,
    name: &'a str,
    version: &'a str,
    title: &'a str,
    description: &'a str,
}

impl<'a> Row<'a> {
    fn new(requirement: &'a Requirement, index: usize) -> Self {
        Self {
            key: issue_key(requirement.component(), index),
            component: requirement.component(),
            name: requirement.name(),
            version: requirement.version(),
            title: requirement.title(),
            description: requirement.description(),
        }
    }
}

impl List {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, location: &ConfigLocation) -> anyhow::Result<()> {
        let config = self.sources.resolve(location)?;
        let scan = Scan::run(&config)?;
        let rows = rows(&scan, &self.component);

        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(std::io::stdout(), &rows)?;
                println!();
            }
            OutputFormat::Table => {
                if rows.is_empty() {
                    if !self.quiet {
                        println!("{}", "No requirements found.".warning());
                    }
                    return Ok(());
                }
                Self::output_table(&rows, self.quiet);
            }
        }
        Ok(())
    }

    fn output_table(rows: &[Row], quiet: bool) {
        let key_width = column_width(rows.iter().map(|row| row.key.as_str()), "KEY");
        let ids: Vec<String> = rows
            .iter()
            .map(|row| format!("{}~{}", row.name, row.version))
            .collect();
        let id_width = column_width(ids.iter().map(String::as_str), "REQUIREMENT");
        let title_width = terminal_width()
            .map_or(usize::MAX, |width| width.saturating_sub(key_width + id_width + 4))
            .max(10);

        if !quiet {
            let header = format!("{:<key_width$}  {:<id_width$}  TITLE", "KEY", "REQUIREMENT");
            println!("{}", header.dim());
        }

        for (row, id) in rows.iter().zip(&ids) {
            if quiet {
                println!("{}\t{id}\t{}", row.key, row.title);
            } else {
                println!(
                    "{}  {:<id_width$}  {}",
                    format!("{:<key_width$}", row.key).info(),
                    id,
                    truncate(row.title, title_width)
                );
            }
        }

        if !quiet {
            println!("{}", format!("{} requirements", rows.len()).dim());
        }
    }
}

/// Numbers every requirement as the export does, then keeps the requested
/// components.
fn rows<'a>(scan: &'a Scan, components: &[String]) -> Vec<Row<'a>> {
    scan.requirements()
        .zip(1..)
        .filter(|(requirement, _)| {
            components.is_empty()
                || components
                    .iter()
                    .any(|component| component.eq_ignore_ascii_case(requirement.component()))
        })
        .map(|(requirement, index)| Row::new(requirement, index))
        .collect()
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|value| value.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use swdd::{Extractor, Source};
    use tempfile::tempdir;

    use super::*;

    fn scan() -> (tempfile::TempDir, Scan) {
        let tmp = tempdir().unwrap();
        let agent = tmp.path().join("agent.md");
        let server = tmp.path().join("server.md");
        fs::write(&agent, "## A1\n`tag~a-one~1`\n## A2\n`tag~a-two~1`\n").unwrap();
        fs::write(&server, "## S1\n`tag~s-one~3`\n").unwrap();

        let sources = [Source::new("Agent", agent), Source::new("Server", server)];
        let scan = Scan::run_with(&sources, &Extractor::default(), false).unwrap();
        (tmp, scan)
    }

    #[test]
    fn rows_keep_export_numbering_when_filtered() {
        let (_tmp, scan) = scan();

        let rows = rows(&scan, &["server".to_string()]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "REQ-D-Server-003");
        assert_eq!(rows[0].title, "S1");
        assert_eq!(rows[0].version, "3");
    }

    #[test]
    fn no_filter_lists_everything() {
        let (_tmp, scan) = scan();

        let keys: Vec<_> = rows(&scan, &[]).into_iter().map(|row| row.key).collect();

        assert_eq!(keys, ["REQ-D-Agent-001", "REQ-D-Agent-002", "REQ-D-Server-003"]);
    }

    #[test]
    fn column_width_counts_header() {
        assert_eq!(column_width(["ab", "abc"].into_iter(), "KEY"), 3);
        assert_eq!(column_width(["abcdef"].into_iter(), "KEY"), 6);
    }
}
