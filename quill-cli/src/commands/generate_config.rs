//! Generate config command implementation

use crate::{config::CONFIG_TEMPLATE, error::CliError};
use anyhow::{Context, Result};
use clap::Args;
use std::{fs, path::PathBuf};

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        if self.output.exists() && !self.force {
            return Err(CliError::OutputExists(self.output.display().to_string()).into());
        }

        fs::write(&self.output, CONFIG_TEMPLATE)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template written to {}", self.output.display());
        println!();
        println!("Next steps:");
        println!("1. Set the API key environment variable named in [generation]");
        println!("2. Validate your configuration:");
        println!("   quill validate -c {}", self.output.display());
        println!("3. Use it for rewriting:");
        println!("   quill rewrite -c {} -i input.txt", self.output.display());

        Ok(())
    }
}
