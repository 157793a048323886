//! Split command implementation

use super::{GlobalOptions, InputArgs};
use crate::{
    error::CliError,
    input::read_documents,
    output::{formatter, open_sink},
};
use anyhow::Result;
use clap::Args;

/// Arguments for the split command
#[derive(Debug, Args)]
pub struct SplitArgs {
    /// Input and output options
    #[command(flatten)]
    pub input: InputArgs,
}

impl SplitArgs {
    /// Execute the split command
    pub fn execute(&self, global: &GlobalOptions) -> Result<()> {
        let mut config = global.load_config()?;
        if let Some(size) = self.input.max_chunk_size {
            config.chunking.max_chunk_size = size;
        }
        let packer = config
            .rewrite_config()
            .and_then(|rewrite| rewrite.packer())
            .map_err(|e| CliError::ConfigError(e.to_string()))?;

        let documents = read_documents(&self.input.input)?;
        log::info!(
            "splitting {} document(s) at {} characters",
            documents.len(),
            packer.max_chunk_size()
        );

        let mut out = formatter(self.input.format, open_sink(self.input.output_path())?);
        for document in &documents {
            let chunks = packer.split(&document.text);
            log::debug!("{}: {} chunk(s)", document.name, chunks.len());

            for (index, chunk) in chunks.iter().enumerate() {
                out.format_chunk(&document.name, index, chunk)?;
            }
        }
        out.finish()
    }
}
