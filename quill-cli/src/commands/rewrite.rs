//! Rewrite command implementation

use super::{build_generator, pipeline_config, GlobalOptions, InputArgs, PipelineArgs};
use crate::{
    error::CliError,
    input::{read_documents, Document},
    output::{formatter, open_sink},
    progress::ProgressReporter,
};
use anyhow::Result;
use clap::Args;
use quill_engine::{RewriteOutput, Rewriter};

/// Arguments for the rewrite command
#[derive(Debug, Args)]
pub struct RewriteArgs {
    /// Input and output options
    #[command(flatten)]
    pub input: InputArgs,

    /// Pipeline options
    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

impl RewriteArgs {
    /// Execute the rewrite command
    pub fn execute(&self, global: &GlobalOptions) -> Result<()> {
        let mut config = global.load_config()?;
        let rewrite_config = pipeline_config(&mut config, &self.input, &self.pipeline)?;
        let prompts = config
            .prompt_set()
            .map_err(|e| CliError::ConfigError(e.to_string()))?;

        let documents = read_documents(&self.input.input)?;
        let rewriter = Rewriter::with_config(build_generator(&config)?, rewrite_config)
            .map_err(|e| CliError::ConfigError(e.to_string()))?
            .with_prompts(prompts);

        let results = process_documents(&documents, global.quiet, |text| rewriter.process(text))?;
        write_results(&self.input, &results)
    }
}

/// Run `process` over every document, stopping at the first failure
pub(crate) fn process_documents<F>(
    documents: &[Document],
    quiet: bool,
    process: F,
) -> Result<Vec<(String, RewriteOutput)>>
where
    F: Fn(&str) -> quill_engine::Result<RewriteOutput>,
{
    let mut progress = ProgressReporter::new(quiet);
    progress.init_documents(documents.len() as u64);

    let mut results = Vec::with_capacity(documents.len());
    for document in documents {
        progress.document_started(&document.name);

        let output = process(&document.text).map_err(|e| CliError::ProcessingError {
            source: document.name.clone(),
            message: e.to_string(),
        })?;
        log::info!(
            "{}: {} chunk(s), {} call(s) in {} ms",
            document.name,
            output.metadata.chunk_count,
            output.metadata.generation_calls,
            output.metadata.processing_time_ms
        );

        results.push((document.name.clone(), output));
        progress.document_completed(&document.name);
    }
    progress.finish();

    Ok(results)
}

/// Write every result; nothing is written unless all documents succeeded
pub(crate) fn write_results(input: &InputArgs, results: &[(String, RewriteOutput)]) -> Result<()> {
    let mut out = formatter(input.format, open_sink(input.output_path())?);
    for (name, output) in results {
        out.format_result(name, output)?;
    }
    out.finish()
}
