//! Validate command implementation

use super::GlobalOptions;
use crate::{config::QuillConfig, error::CliError};
use anyhow::Result;
use clap::Args;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Also require the API key to be resolvable
    #[arg(long)]
    pub check_key: bool,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self, global: &GlobalOptions) -> Result<()> {
        let Some(path) = global.config.as_deref() else {
            return Err(CliError::ConfigError(
                "no configuration file given (use -c FILE or QUILL_CONFIG)".to_string(),
            )
            .into());
        };

        println!("Validating configuration: {}", path.display());

        let checked = QuillConfig::load(path).and_then(|config| {
            config.validate()?;
            if self.check_key {
                config.generation.resolve_api_key()?;
            }
            Ok(config)
        });

        match checked {
            Ok(config) => {
                println!("✓ Configuration is valid!");
                println!("  Chunk budget: {} characters", config.chunking.max_chunk_size);
                println!("  Model: {}", config.generation.model);
                println!("  Execution mode: {}", config.rewrite.execution_mode.as_str());
                println!("  Projects: {}", config.projects.len());
                Ok(())
            }
            Err(e) => {
                println!("✗ Configuration is invalid!");
                println!("  Error: {e:#}");
                Err(anyhow::anyhow!("Validation failed: {e:#}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn options(file: &NamedTempFile) -> GlobalOptions {
        GlobalOptions {
            config: Some(file.path().to_path_buf()),
            quiet: true,
        }
    }

    #[test]
    fn test_validate_valid_config() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[chunking]\nmax_chunk_size = 800\n").unwrap();

        let args = ValidateArgs { check_key: false };
        assert!(args.execute(&options(&temp_file)).is_ok());
    }

    #[test]
    fn test_validate_invalid_config() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[retry]\nmax_attempts = 0\n").unwrap();

        let args = ValidateArgs { check_key: false };
        let err = args.execute(&options(&temp_file)).unwrap_err();
        assert!(err.to_string().contains("max_attempts"));
    }

    #[test]
    fn test_missing_api_key() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            "[generation]\napi_key_env = \"QUILL_TEST_NEVER_SET\"\n"
        )
        .unwrap();

        let args = ValidateArgs { check_key: true };
        assert!(args.execute(&options(&temp_file)).is_err());
    }

    #[test]
    fn test_requires_config_path() {
        let args = ValidateArgs { check_key: false };
        assert!(args.execute(&GlobalOptions::default()).is_err());
    }
}
