//! Translate command implementation

use super::{
    build_generator, pipeline_config,
    rewrite::{process_documents, write_results},
    GlobalOptions, InputArgs, PipelineArgs,
};
use crate::{error::CliError, input::read_documents};
use anyhow::Result;
use clap::Args;
use quill_engine::Translator;

/// Arguments for the translate command
#[derive(Debug, Args)]
pub struct TranslateArgs {
    /// Input and output options
    #[command(flatten)]
    pub input: InputArgs,

    /// Pipeline options
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Source language code, or `auto`
    #[arg(long, value_name = "LANG", default_value = "auto")]
    pub source: String,

    /// Target language code
    #[arg(long, value_name = "LANG", default_value = "en")]
    pub target: String,
}

impl TranslateArgs {
    /// Execute the translate command
    pub fn execute(&self, global: &GlobalOptions) -> Result<()> {
        let mut config = global.load_config()?;
        let rewrite_config = pipeline_config(&mut config, &self.input, &self.pipeline)?;

        let documents = read_documents(&self.input.input)?;
        let translator = Translator::with_config(build_generator(&config)?, rewrite_config)
            .map_err(|e| CliError::ConfigError(e.to_string()))?;

        let results = process_documents(&documents, global.quiet, |text| {
            translator.process(text, &self.source, &self.target)
        })?;
        write_results(&self.input, &results)
    }
}
