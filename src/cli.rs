use std::path::{Path, PathBuf};

mod export;
mod init;
mod list;
mod terminal;

use anyhow::Context;
use clap::ArgAction;
use export::Export;
use init::Init;
use list::List;
use swdd::{Config, Source};

/// The configuration file used when `--config` is not given.
const DEFAULT_CONFIG: &str = "swdd.toml";

/// Parse a `COMPONENT=PATH` source argument.
fn parse_source(s: &str) -> Result<Source, String> {
    let (component, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COMPONENT=PATH, got '{s}'"))?;

    let component = component.trim();
    if component.is_empty() {
        return Err(format!("missing component label in '{s}'"));
    }
    if path.is_empty() {
        return Err(format!("missing path in '{s}'"));
    }

    Ok(Source::new(component, path))
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The configuration file [default: swdd.toml]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let location = ConfigLocation::new(self.config);

        self.command
            .unwrap_or_else(|| Command::Export(Export::default()))
            .run(&location)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Extract requirements and write the JSON report (default)
    Export(Export),

    /// List the requirements found in the sources
    List(List),

    /// Write a default configuration file
    Init(Init),
}

impl Command {
    fn run(self, location: &ConfigLocation) -> anyhow::Result<()> {
        match self {
            Self::Export(command) => command.run(location)?,
            Self::List(command) => command.run(location)?,
            Self::Init(command) => command.run(location)?,
        }
        Ok(())
    }
}

/// Where the configuration file lives, and whether the user named it.
#[derive(Debug, Clone)]
pub struct ConfigLocation {
    path: PathBuf,
    explicit: bool,
}

impl ConfigLocation {
    fn new(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self {
                path,
                explicit: true,
            },
            None => Self {
                path: PathBuf::from(DEFAULT_CONFIG),
                explicit: false,
            },
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration.
    ///
    /// A missing default file yields the default configuration; a missing
    /// file named with `--config` is an error.
    fn load(&self) -> anyhow::Result<Config> {
        if !self.explicit && !self.path.exists() {
            tracing::debug!(
                "No config file at {}, using defaults",
                self.path.display()
            );
            return Ok(Config::default());
        }
        Config::load(&self.path)
            .with_context(|| format!("failed to load configuration from {}", self.path.display()))
    }
}

/// Arguments selecting what to scan, shared by the scanning commands.
#[derive(Debug, Default, clap::Args)]
pub struct SourceArgs {
    /// Scan a source as COMPONENT=PATH (repeatable, replaces configured sources)
    #[arg(short, long = "source", value_name = "COMPONENT=PATH", value_parser = parse_source)]
    sources: Vec<Source>,

    /// Tag keyword of requirement markers, e.g. 'swdd'
    #[arg(short, long)]
    tag: Option<String>,
}

impl SourceArgs {
    /// Loads the configuration and applies the command-line overrides.
    fn resolve(self, location: &ConfigLocation) -> anyhow::Result<Config> {
        let mut config = location.load()?;

        if !self.sources.is_empty() {
            config.set_sources(self.sources);
        }
        if let Some(tag) = self.tag {
            config.set_tag(tag);
        }

        if config.sources().is_empty() {
            anyhow::bail!(
                "No sources to scan. Add [[sources]] to {} or pass --source COMPONENT=PATH",
                location.path().display()
            );
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn parse_source_splits_on_first_equals() {
        let source = parse_source("gRPC=docs/a=b.md").unwrap();
        assert_eq!(source, Source::new("gRPC", "docs/a=b.md"));
    }

    #[test]
    fn parse_source_rejects_malformed_values() {
        assert!(parse_source("no-separator").is_err());
        assert!(parse_source("=path.md").is_err());
        assert!(parse_source("Agent=").is_err());
    }

    #[test]
    fn export_is_the_default_command() {
        let cli = Cli::try_parse_from(["swdd-export", "-v"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["swdd-export", "list", "--config", "other.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("other.toml")));
        assert!(matches!(cli.command, Some(Command::List(_))));
    }

    #[test]
    fn missing_default_config_yields_defaults() {
        let tmp = tempdir().unwrap();
        let location = ConfigLocation {
            path: tmp.path().join(DEFAULT_CONFIG),
            explicit: false,
        };

        assert_eq!(location.load().unwrap(), Config::default());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let tmp = tempdir().unwrap();
        let location = ConfigLocation::new(Some(tmp.path().join("missing.toml")));

        assert!(location.load().is_err());
    }

    #[test]
    fn command_line_sources_replace_configured_ones() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG);
        let mut config = Config::default();
        config.add_source(Source::new("Configured", tmp.path().join("configured.md")));
        config.save(&path).unwrap();

        let args = SourceArgs {
            sources: vec![Source::new("Cli", "cli.md")],
            tag: Some("swdd".to_string()),
        };
        let resolved = args.resolve(&ConfigLocation::new(Some(path))).unwrap();

        assert_eq!(resolved.sources(), &[Source::new("Cli", "cli.md")]);
        assert_eq!(resolved.tag(), "swdd");
    }

    #[test]
    fn no_sources_is_an_error() {
        let tmp = tempdir().unwrap();
        let location = ConfigLocation {
            path: tmp.path().join(DEFAULT_CONFIG),
            explicit: false,
        };

        assert!(SourceArgs::default().resolve(&location).is_err());
    }
}
