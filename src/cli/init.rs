use clap::Parser;
use swdd::Config;
use tracing::instrument;

use super::ConfigLocation;

#[derive(Debug, Parser)]
#[command(about = "Write a default configuration file")]
pub struct Init {
    /// Overwrite an existing configuration file
    #[arg(long)]
    force: bool,
}

impl Init {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, location: &ConfigLocation) -> anyhow::Result<()> {
        let path = location.path();
        if path.exists() && !self.force {
            anyhow::bail!(
                "Configuration already exists at {} (use --force to overwrite)",
                path.display()
            );
        }

        Config::default()
            .save(path)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", path.display()))?;

        println!("Initialized configuration in {}", path.display());
        println!();
        println!("Next steps:");
        println!("  Add sources to {}:", path.display());
        println!();
        println!("    [[sources]]");
        println!("    component = \"Agent\"");
        println!("    path = \"agent/doc/swdesign/README.md\"");
        println!();
        println!("  swdd-export export");

        Ok(())
    }
}
