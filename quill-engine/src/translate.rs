//! Chunked translation on top of the rewrite pipeline

use crate::{
    config::RewriteConfig,
    error::{ConfigError, Result},
    generator::Generator,
    prompt::PromptSet,
    rewriter::{RewriteOutput, Rewriter},
};

/// Translates long text chunk by chunk
#[derive(Debug)]
pub struct Translator<G> {
    generator: G,
    config: RewriteConfig,
}

impl<G: Generator> Translator<G> {
    /// Create a translator with the default pipeline configuration
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            config: RewriteConfig::default(),
        }
    }

    /// Create a translator with a custom pipeline configuration
    pub fn with_config(generator: G, config: RewriteConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { generator, config })
    }

    /// Translate `text`; `source_lang` may be `auto`
    pub fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        self.process(text, source_lang, target_lang)
            .map(|output| output.text)
    }

    /// Translate `text`, returning run metadata as well
    pub fn process(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<RewriteOutput> {
        log::info!("translating from {source_lang} to {target_lang}");
        Rewriter::with_config(&self.generator, self.config.clone())?
            .with_prompts(PromptSet::translation(source_lang, target_lang))
            .process(text)
    }
}
