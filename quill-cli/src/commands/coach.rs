//! Coach command implementation

use super::{build_generator, GlobalOptions};
use crate::error::CliError;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use quill_engine::{Coach, CoachError, StageAnalysis};

/// Coach subcommands
#[derive(Debug, Subcommand)]
pub enum CoachCommands {
    /// Suggest the next step for a configured project
    Next(NextArgs),

    /// Analyse the stage of a project
    Stage(StageArgs),

    /// List configured projects
    Projects,
}

/// Arguments for `coach next`
#[derive(Debug, Args)]
pub struct NextArgs {
    /// Project key from the `[projects]` section
    #[arg(short, long, value_name = "KEY")]
    pub project: String,

    /// Replace the configured focus items (repeatable)
    #[arg(long, value_name = "ITEM")]
    pub focus: Vec<String>,
}

/// Arguments for `coach stage`
#[derive(Debug, Args)]
pub struct StageArgs {
    /// What the project is for
    #[arg(long, value_name = "TEXT")]
    pub purpose: String,

    /// Current state of the project
    #[arg(long, value_name = "TEXT")]
    pub info: String,
}

impl CoachCommands {
    /// Execute the coach command
    pub fn execute(&self, global: &GlobalOptions) -> Result<()> {
        let config = global.load_config()?;

        match self {
            CoachCommands::Projects => {
                if config.projects.is_empty() {
                    println!("No projects configured");
                }
                for key in config.projects.keys() {
                    println!("{key}");
                }
                Ok(())
            }
            CoachCommands::Next(args) => {
                // Report unknown keys before touching the backend
                config.projects.get(&args.project).map_err(coach_error)?;

                let retry = config
                    .retry
                    .policy()
                    .map_err(|e| CliError::ConfigError(e.to_string()))?;
                let coach = Coach::with_retry(build_generator(&config)?, retry);
                let advice = coach
                    .suggest_for(&config.projects, &args.project, &args.focus)
                    .map_err(coach_error)?;

                println!("{advice}");
                Ok(())
            }
            CoachCommands::Stage(args) => {
                let retry = config
                    .retry
                    .policy()
                    .map_err(|e| CliError::ConfigError(e.to_string()))?;
                let coach = Coach::with_retry(build_generator(&config)?, retry);
                let analysis = coach
                    .analyze_stage(&args.purpose, &args.info)
                    .map_err(coach_error)?;

                if let StageAnalysis::Unparsed { reason, .. } = &analysis {
                    eprintln!("warning: reply could not be parsed as JSON ({reason})");
                }
                let json = serde_json::to_string_pretty(&analysis)
                    .context("Failed to serialize stage analysis")?;
                println!("{json}");
                Ok(())
            }
        }
    }
}

fn coach_error(err: CoachError) -> anyhow::Error {
    match err {
        CoachError::UnknownProject { .. } => CliError::ConfigError(err.to_string()).into(),
        CoachError::Generation(_) => anyhow::Error::new(err),
    }
}
