//! CLI command implementations

use crate::{config::QuillConfig, error::CliError, output::OutputFormat};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use quill_engine::{ExecutionMode, OpenAiGenerator, RewriteConfig};
use std::path::{Path, PathBuf};

pub mod coach;
pub mod generate_config;
pub mod rewrite;
pub mod split;
pub mod translate;
pub mod validate;

/// Chunked text rewriting over an OpenAI-compatible backend
#[derive(Debug, Parser)]
#[command(name = "quill", version, about, propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "QUILL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Suppress progress output and logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Split text into chunks without calling the backend
    Split(split::SplitArgs),

    /// Rewrite text chunk by chunk
    Rewrite(rewrite::RewriteArgs),

    /// Translate text chunk by chunk
    Translate(translate::TranslateArgs),

    /// Startup coaching
    Coach {
        #[command(subcommand)]
        subcommand: coach::CoachCommands,
    },

    /// Write a commented configuration template
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// Check a configuration file
    Validate(validate::ValidateArgs),
}

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Configuration file, if any
    pub config: Option<PathBuf>,
    /// Suppress progress output
    pub quiet: bool,
}

impl GlobalOptions {
    /// Load the configuration file, or defaults when none is given
    pub fn load_config(&self) -> Result<QuillConfig> {
        QuillConfig::load_or_default(self.config.as_deref())
    }
}

impl Cli {
    /// Options passed down to commands
    pub fn global_options(&self) -> GlobalOptions {
        GlobalOptions {
            config: self.config.clone(),
            quiet: self.quiet,
        }
    }

    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
                .init();
        }
    }

    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        let global = self.global_options();
        log::debug!("Arguments: {:?}", self);

        match &self.command {
            Commands::Split(args) => args.execute(&global),
            Commands::Rewrite(args) => args.execute(&global),
            Commands::Translate(args) => args.execute(&global),
            Commands::Coach { subcommand } => subcommand.execute(&global),
            Commands::GenerateConfig(args) => args.execute(),
            Commands::Validate(args) => args.execute(&global),
        }
    }
}

/// Input and output options shared by text-processing commands
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Input files or patterns (supports glob, `-` for stdin)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Chunk budget in characters (overrides the config file)
    #[arg(short, long, value_name = "CHARS")]
    pub max_chunk_size: Option<usize>,
}

impl InputArgs {
    /// Output destination as a path
    pub fn output_path(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}

/// Pipeline options shared by rewrite and translate
#[derive(Debug, Args)]
pub struct PipelineArgs {
    /// Skip the final polish pass
    #[arg(long)]
    pub no_polish: bool,

    /// Send chunks to the backend concurrently
    #[arg(short, long)]
    pub parallel: bool,

    /// Model to use (overrides the config file)
    #[arg(long, value_name = "NAME")]
    pub model: Option<String>,
}

/// Pipeline configuration after applying command-line overrides
pub fn pipeline_config(
    config: &mut QuillConfig,
    input: &InputArgs,
    pipeline: &PipelineArgs,
) -> Result<RewriteConfig> {
    if let Some(size) = input.max_chunk_size {
        config.chunking.max_chunk_size = size;
    }
    if pipeline.no_polish {
        config.rewrite.polish = false;
    }
    if pipeline.parallel {
        config.rewrite.execution_mode = ExecutionMode::Parallel;
    }
    if let Some(model) = &pipeline.model {
        config.generation.model = model.clone();
    }

    config
        .validate()
        .map_err(|e| CliError::ConfigError(e.to_string()))?;
    Ok(config
        .rewrite_config()
        .map_err(|e| CliError::ConfigError(e.to_string()))?)
}

/// Build the HTTP generation backend from the `[generation]` section
pub fn build_generator(config: &QuillConfig) -> Result<OpenAiGenerator> {
    log::info!(
        "using model {} at {}",
        config.generation.model,
        config.generation.api_base
    );
    OpenAiGenerator::new(config.generation.clone())
        .map_err(|e| CliError::ConfigError(e.to_string()).into())
}
