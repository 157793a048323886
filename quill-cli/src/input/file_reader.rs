//! File reading utilities

use super::glob_resolver::{resolve_patterns, InputSource};
use anyhow::{Context, Result};
use std::{
    fs,
    io::{self, Read},
    path::Path,
};

/// File reader with UTF-8 validation
pub struct FileReader;

impl FileReader {
    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(content)
    }

    /// Read all of standard input as UTF-8 text
    pub fn read_stdin() -> Result<String> {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read standard input")?;

        Ok(content)
    }

    /// Read one input source
    pub fn read_source(source: &InputSource) -> Result<String> {
        match source {
            InputSource::Stdin => Self::read_stdin(),
            InputSource::File(path) => Self::read_text(path),
        }
    }
}

/// A loaded input document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Display name of the source
    pub name: String,
    /// Full text
    pub text: String,
}

/// Resolve `patterns` and read every matching document
pub fn read_documents(patterns: &[String]) -> Result<Vec<Document>> {
    resolve_patterns(patterns)?
        .iter()
        .map(|source| {
            Ok(Document {
                name: source.display_name(),
                text: FileReader::read_source(source)?,
            })
        })
        .collect()
}
