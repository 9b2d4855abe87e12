//! Strategy selection: which summarizer serves a request.

use chrono::NaiveDate;

use crate::config::EngineConfig;
use crate::models::SummaryStrategy;
use crate::pipeline::llm::LlmSummarizer;

use super::{RuleBasedSummarizer, Summarizer};

// ═══════════════════════════════════════════════════════════
// Strategy resolution
// ═══════════════════════════════════════════════════════════

/// Request strategy if given, else the configured default.
///
/// `LlmBased` without provider credentials resolves to `RuleBased`.
pub fn resolve_strategy(requested: Option<SummaryStrategy>, config: &EngineConfig) -> SummaryStrategy {
    let strategy = requested.unwrap_or(config.default_strategy);
    if strategy == SummaryStrategy::LlmBased && !config.is_llm_configured() {
        tracing::debug!("LLM strategy requested without credentials, using rule_based");
        return SummaryStrategy::RuleBased;
    }
    strategy
}

/// Build the summarizer for a request.
pub fn select_summarizer(requested: Option<SummaryStrategy>, config: &EngineConfig) -> Box<dyn Summarizer> {
    select_summarizer_at(requested, config, None)
}

/// Like [`select_summarizer`], with "today" pinned for age and end-date checks.
pub fn select_summarizer_at(
    requested: Option<SummaryStrategy>,
    config: &EngineConfig,
    reference_date: Option<NaiveDate>,
) -> Box<dyn Summarizer> {
    match resolve_strategy(requested, config) {
        SummaryStrategy::RuleBased => Box::new(build_rule_based(config, reference_date)),
        SummaryStrategy::LlmBased => Box::new(build_llm(config, reference_date)),
    }
}

pub fn build_rule_based(config: &EngineConfig, reference_date: Option<NaiveDate>) -> RuleBasedSummarizer {
    let rule_based = RuleBasedSummarizer::new(config.text_limits);
    match reference_date {
        Some(date) => rule_based.with_reference_date(date),
        None => rule_based,
    }
}

/// AI generator for `config`, backed by a rule-based fallback.
pub fn build_llm(config: &EngineConfig, reference_date: Option<NaiveDate>) -> LlmSummarizer {
    let llm = LlmSummarizer::from_config(Box::new(build_rule_based(config, reference_date)), config);
    match reference_date {
        Some(date) => llm.with_reference_date(date),
        None => llm,
    }
}
