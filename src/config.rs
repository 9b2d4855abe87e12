//! Engine configuration.
//!
//! Resolved once at process startup (after `.env` is loaded) and then passed by
//! reference into the strategy selector and the AI generator. Nothing below the
//! binary reads the process environment during a request.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::models::SummaryStrategy;
use crate::reference;

/// Application-level constants
pub const APP_NAME: &str = "consultation-summary";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 10;

/// Tracing filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "warn,consultation_summary=info"
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("unknown summarizer strategy '{0}' (expected rule_based or llm_based)")]
    UnknownStrategy(String),
}

/// Character limits applied to free-text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLimits {
    pub history_present_illness: usize,
    pub physical_examination: usize,
    pub treatment_plan: usize,
    pub additional_notes: usize,
    pub social_history: usize,
    pub section_content: usize,
    pub full_summary: usize,
}

impl Default for TextLimits {
    fn default() -> Self {
        Self {
            history_present_illness: reference::DEFAULT_HPI_LIMIT,
            physical_examination: reference::DEFAULT_PHYSICAL_EXAM_LIMIT,
            treatment_plan: reference::DEFAULT_TREATMENT_PLAN_LIMIT,
            additional_notes: reference::DEFAULT_ADDITIONAL_NOTES_LIMIT,
            social_history: reference::DEFAULT_SOCIAL_HISTORY_LIMIT,
            section_content: reference::DEFAULT_SECTION_CONTENT_LIMIT,
            full_summary: reference::DEFAULT_FULL_SUMMARY_LIMIT,
        }
    }
}

/// Which remote provider backs the AI generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Gemini,
    OpenAi,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
        }
    }
}

#[derive(Clone)]
pub struct EngineConfig {
    pub default_strategy: SummaryStrategy,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub llm_timeout: Duration,
    pub text_limits: TextLimits,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_strategy: SummaryStrategy::RuleBased,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            llm_timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            text_limits: TextLimits::default(),
        }
    }
}

// API keys never reach logs.
impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("default_strategy", &self.default_strategy)
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<set>"))
            .field("gemini_model", &self.gemini_model)
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<set>"))
            .field("openai_model", &self.openai_model)
            .field("openai_base_url", &self.openai_base_url)
            .field("llm_timeout", &self.llm_timeout)
            .field("text_limits", &self.text_limits)
            .finish()
    }
}

impl EngineConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let default_strategy = match get("SUMMARIZER_STRATEGY") {
            Some(raw) => raw
                .to_lowercase()
                .parse::<SummaryStrategy>()
                .map_err(|_| ConfigError::UnknownStrategy(raw))?,
            None => defaults.default_strategy,
        };

        let llm_timeout = match get("LLM_TIMEOUT_SECONDS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "LLM_TIMEOUT_SECONDS".into(),
                        value: raw,
                    })
                }
            },
            None => defaults.llm_timeout,
        };

        Ok(Self {
            default_strategy,
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_base_url: get("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.openai_base_url),
            llm_timeout,
            text_limits: defaults.text_limits,
        })
    }

    /// Gemini wins when both keys are present.
    pub fn llm_provider(&self) -> Option<LlmProvider> {
        if self.gemini_api_key.is_some() {
            Some(LlmProvider::Gemini)
        } else if self.openai_api_key.is_some() {
            Some(LlmProvider::OpenAi)
        } else {
            None
        }
    }

    pub fn is_llm_configured(&self) -> bool {
        self.llm_provider().is_some()
    }

    /// Model name of the active provider, if any.
    pub fn llm_model(&self) -> Option<&str> {
        match self.llm_provider()? {
            LlmProvider::Gemini => Some(&self.gemini_model),
            LlmProvider::OpenAi => Some(&self.openai_model),
        }
    }
}
