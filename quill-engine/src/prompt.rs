//! Prompt templates with `{name}` placeholders
//!
//! Rendering is a single pass over the template: substituted values are
//! never re-scanned, and braces that do not wrap a placeholder name (JSON
//! examples, for instance) are copied through unchanged.

use crate::error::ConfigError;
use std::fmt;

/// Placeholder filled with the text being transformed
pub const TEXT_PLACEHOLDER: &str = "text";

const REWRITE_CHUNK: &str = "\
Convert the following text into a first-person travel blog written in English.
Focus on personal experiences and feelings, on interactions with locals and \
other travelers, and on vivid descriptions of places and activities. Use a \
natural, engaging storytelling voice and keep narrative continuity with the \
other parts.

Text:
{text}

Write the travel blog based on this content:";

const REWRITE_POLISH: &str = "\
Polish this travel blog to ensure consistency and smooth transitions:

{text}";

const TRANSLATE_CHUNK: &str = "\
Translate the following text from {source_lang} to {target_lang}. Keep the \
paragraph breaks and the meaning. Reply with the translation only.

{text}";

const TRANSLATE_POLISH: &str = "\
The following {target_lang} text was translated in separate parts. Smooth \
the transitions between the parts without changing the meaning. Reply with \
the revised text only.

{text}";

/// A prompt with named placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    /// Wrap template text without validation
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Wrap template text, checking that every `required` placeholder appears
    pub fn with_required(
        name: &str,
        text: impl Into<String>,
        required: &[&str],
    ) -> Result<Self, ConfigError> {
        let template = Self::new(text);
        let present = template.placeholders();

        if let Some(missing) = required.iter().find(|p| !present.contains(p)) {
            return Err(ConfigError::MissingPlaceholder {
                template: name.to_string(),
                placeholder: missing.to_string(),
            });
        }

        Ok(template)
    }

    /// Raw template text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Names of the placeholders in order of first appearance
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names = Vec::new();
        scan(&self.text, |piece| {
            if let Piece::Placeholder(name) = piece {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        });
        names
    }

    /// Substitute `vars`; unknown placeholders are left as they are
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.text.len());
        scan(&self.text, |piece| match piece {
            Piece::Literal(text) => out.push_str(text),
            Piece::Placeholder(name) => match vars.iter().find(|(key, _)| *key == name) {
                Some((_, value)) => out.push_str(value),
                None => {
                    out.push('{');
                    out.push_str(name);
                    out.push('}');
                }
            },
        });
        out
    }

    /// Bind some placeholders now and keep the rest for later
    pub fn bind(&self, vars: &[(&str, &str)]) -> Self {
        Self::new(self.render(vars))
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

enum Piece<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn scan<'a>(text: &'a str, mut visit: impl FnMut(Piece<'a>)) {
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if is_placeholder_name(&after[..close]) => {
                visit(Piece::Literal(&rest[..open]));
                visit(Piece::Placeholder(&after[..close]));
                rest = &after[close + 1..];
            }
            _ => {
                visit(Piece::Literal(&rest[..=open]));
                rest = after;
            }
        }
    }

    visit(Piece::Literal(rest));
}

/// Templates used for per-chunk calls and the polish pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    /// Applied to every chunk; must contain `{text}`
    pub chunk: PromptTemplate,
    /// Applied to the joined output; must contain `{text}`
    pub polish: PromptTemplate,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            chunk: PromptTemplate::new(REWRITE_CHUNK),
            polish: PromptTemplate::new(REWRITE_POLISH),
        }
    }
}

impl PromptSet {
    /// Build a set from custom template text
    pub fn custom(chunk: &str, polish: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            chunk: PromptTemplate::with_required("chunk", chunk, &[TEXT_PLACEHOLDER])?,
            polish: PromptTemplate::with_required("polish", polish, &[TEXT_PLACEHOLDER])?,
        })
    }

    /// Translation prompts for a language pair (codes or names)
    pub fn translation(source_lang: &str, target_lang: &str) -> Self {
        let vars = [
            ("source_lang", language_name(source_lang)),
            ("target_lang", language_name(target_lang)),
        ];
        Self {
            chunk: PromptTemplate::new(TRANSLATE_CHUNK).bind(&vars),
            polish: PromptTemplate::new(TRANSLATE_POLISH).bind(&vars),
        }
    }

    /// Prompt for one chunk
    pub fn render_chunk(&self, text: &str) -> String {
        self.chunk.render(&[(TEXT_PLACEHOLDER, text)])
    }

    /// Prompt for the polish pass
    pub fn render_polish(&self, text: &str) -> String {
        self.polish.render(&[(TEXT_PLACEHOLDER, text)])
    }
}

/// Display name for a language code; unknown codes pass through
pub fn language_name(code: &str) -> &str {
    match code.to_ascii_lowercase().as_str() {
        "auto" => "the source language",
        "zh" | "zh-cn" | "zh-hans" => "Chinese",
        "zh-tw" | "zh-hant" => "Traditional Chinese",
        "en" => "English",
        "ja" => "Japanese",
        "ko" => "Korean",
        "fr" => "French",
        "de" => "German",
        "es" => "Spanish",
        _ => code,
    }
}
