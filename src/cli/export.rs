use std::{io, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use swdd::{writes_to_stdout, Report, Scan};
use tracing::instrument;

use super::{
    terminal::{Colorize, truncate, terminal_width},
    ConfigLocation, SourceArgs,
};

#[derive(Debug, Parser, Default)]
#[command(about = "Extract requirements and write the JSON report")]
pub struct Export {
    #[command(flatten)]
    sources: SourceArgs,

    /// Where to write the report ('-' for stdout) [default: from config]
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Do not print the summary
    #[arg(short, long)]
    quiet: bool,
}

impl Export {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, location: &ConfigLocation) -> anyhow::Result<()> {
        let mut config = self.sources.resolve(location)?;
        if let Some(output) = self.output {
            config.set_output(output);
        }

        let scan = Scan::run(&config).context("failed to scan sources")?;
        let report = Report::new(scan.requirements());

        if writes_to_stdout(config.output()) {
            report
                .write_to(&mut io::stdout().lock())
                .context("failed to write report to stdout")?;
            return Ok(());
        }

        report
            .save(config.output())
            .with_context(|| format!("failed to write {}", config.output().display()))?;

        tracing::info!(
            "Generated {} with {} requirements",
            config.output().display(),
            report.total()
        );

        if !self.quiet {
            Self::output_summary(&scan, &config.output().display().to_string(), config.tag());
        }
        Ok(())
    }

    fn output_summary(scan: &Scan, output: &str, tag: &str) {
        let width = terminal_width().unwrap_or(80);

        for document in scan.documents() {
            let path = document.path.display().to_string();
            println!(
                "{:<10} {:>4}  {}",
                document.component.info(),
                document.requirements.len(),
                truncate(&path, width.saturating_sub(17)).dim()
            );
        }

        let total = scan.total();
        if total == 0 {
            println!(
                "{}",
                format!("No requirements found. Markers look like `{tag}~name~1`.").warning()
            );
        } else {
            println!(
                "{}",
                format!("Generated {output} with {total} requirements").success()
            );
        }
    }
}
