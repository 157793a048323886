//! Startup coaching prompts over the generation backend
//!
//! Project profiles come from an injected [`ProjectCatalog`], typically the
//! `[projects.<key>]` tables of the configuration file.

use crate::{
    generator::Generator,
    prompt::PromptTemplate,
    retry::{RetryError, RetryPolicy},
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::OnceLock};
use thiserror::Error;

const NEXT_STEPS: &str = "\
You are a startup coach who has mentored hundreds of successful early-stage \
companies and knows how to find the next action that suits each founder.

Suggest the next step for this founder:

Project purpose: {purpose}
Founder personality: {personality}
Founder preferences: {preferences}
Recent events: {event_logs}
Project stage: {stage}
Current focus:
{current_focus}

Follow these rules:
1. The result of the step should be something the founder will keep using happily.
2. The step should take no more than three hours.

Reply with the concrete next step only, short and motivating.";

const STAGE_ANALYSIS: &str = "\
You are a startup partner who has guided hundreds of companies. Analyse \
this project:

- Purpose: {purpose}
- Details: {info}

Cover product/market fit, growth metrics, the most important open problem \
and the next milestone. Reply in JSON:
{
  \"stage\": {\"current_stage\": \"Pre-PMF, Finding PMF or Scale\", \"confidence\": \"1-10\"},
  \"key_metrics\": {\"growth_rate\": \"weekly growth\", \"core_metric\": \"most important metric and its value\", \"burn_rate\": \"monthly burn\"},
  \"priorities\": [\"priority 1\", \"priority 2\", \"priority 3\"],
  \"advice\": \"key advice\"
}";

/// Coaching failures
#[derive(Error, Debug)]
pub enum CoachError {
    /// No profile is configured under this key
    #[error("unknown project '{key}'")]
    UnknownProject {
        /// Requested project key
        key: String,
    },

    /// The generation call did not succeed
    #[error("coach generation failed: {0}")]
    Generation(#[from] RetryError),
}

/// What the coach knows about a project and its founder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectProfile {
    /// Why the project exists
    pub purpose: String,
    /// Founder personality traits
    pub personality: String,
    /// Founder preferences and constraints
    pub preferences: String,
    /// Recent activity
    pub event_logs: String,
    /// Current project stage
    pub stage: String,
    /// Items the founder is focused on
    pub current_focus: Vec<String>,
}

/// Project profiles keyed by project name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectCatalog(BTreeMap<String, ProjectProfile>);

impl ProjectCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a profile
    pub fn insert(&mut self, key: impl Into<String>, profile: ProjectProfile) {
        self.0.insert(key.into(), profile);
    }

    /// Look up a profile by key
    pub fn get(&self, key: &str) -> Result<&ProjectProfile, CoachError> {
        self.0.get(key).ok_or_else(|| CoachError::UnknownProject {
            key: key.to_string(),
        })
    }

    /// Configured project keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of profiles
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the catalog has no profiles
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of a stage analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StageAnalysis {
    /// The reply contained a JSON object
    Structured(serde_json::Value),
    /// The reply could not be parsed; the raw text is kept
    Unparsed {
        /// Raw reply
        raw: String,
        /// Why parsing failed
        reason: String,
    },
}

impl StageAnalysis {
    /// Parse the first `{...}` block of a reply
    pub fn from_reply(reply: &str) -> Self {
        let Some(block) = json_block(reply) else {
            return StageAnalysis::Unparsed {
                raw: reply.to_string(),
                reason: "no JSON object in reply".to_string(),
            };
        };

        match serde_json::from_str(block) {
            Ok(value) => StageAnalysis::Structured(value),
            Err(err) => StageAnalysis::Unparsed {
                raw: reply.to_string(),
                reason: format!("invalid JSON: {err}"),
            },
        }
    }

    /// Whether the reply was parsed
    pub fn is_structured(&self) -> bool {
        matches!(self, StageAnalysis::Structured(_))
    }
}

fn json_block(reply: &str) -> Option<&str> {
    static JSON_BLOCK: OnceLock<Option<Regex>> = OnceLock::new();
    JSON_BLOCK
        .get_or_init(|| Regex::new(r"(?s)\{.*\}").ok())
        .as_ref()?
        .find(reply)
        .map(|m| m.as_str())
}

/// Next-step advice and stage analysis for startup projects
#[derive(Debug)]
pub struct Coach<G> {
    generator: G,
    retry: RetryPolicy,
}

impl<G: Generator> Coach<G> {
    /// Create a coach with the default retry policy
    pub fn new(generator: G) -> Self {
        Self::with_retry(generator, RetryPolicy::default())
    }

    /// Create a coach with a custom retry policy
    pub fn with_retry(generator: G, retry: RetryPolicy) -> Self {
        Self { generator, retry }
    }

    /// Suggest the next action for a project
    pub fn suggest_next_steps(&self, profile: &ProjectProfile) -> Result<String, CoachError> {
        let focus = profile.current_focus.join("\n");
        let prompt = PromptTemplate::new(NEXT_STEPS).render(&[
            ("purpose", profile.purpose.as_str()),
            ("personality", profile.personality.as_str()),
            ("preferences", profile.preferences.as_str()),
            ("event_logs", profile.event_logs.as_str()),
            ("stage", profile.stage.as_str()),
            ("current_focus", focus.as_str()),
        ]);

        Ok(self.ask(&prompt)?.trim().to_string())
    }

    /// Suggest the next action for a catalog project, optionally replacing its focus
    pub fn suggest_for(
        &self,
        catalog: &ProjectCatalog,
        key: &str,
        focus: &[String],
    ) -> Result<String, CoachError> {
        let mut profile = catalog.get(key)?.clone();
        if !focus.is_empty() {
            profile.current_focus = focus.to_vec();
        }
        log::info!("suggesting next steps for project '{key}'");
        self.suggest_next_steps(&profile)
    }

    /// Analyse the stage of a project described by `purpose` and `info`
    pub fn analyze_stage(&self, purpose: &str, info: &str) -> Result<StageAnalysis, CoachError> {
        let prompt =
            PromptTemplate::new(STAGE_ANALYSIS).render(&[("purpose", purpose), ("info", info)]);
        let reply = self.ask(&prompt)?;

        let analysis = StageAnalysis::from_reply(&reply);
        if let StageAnalysis::Unparsed { reason, .. } = &analysis {
            log::warn!("stage analysis reply was not parsed: {reason}");
        }
        Ok(analysis)
    }

    fn ask(&self, prompt: &str) -> Result<String, RetryError> {
        self.retry.run(|_| self.generator.generate(prompt, ""))
    }
}
