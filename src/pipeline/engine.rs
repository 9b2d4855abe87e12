//! Engine facade: one synchronous call from record to summary.

use std::time::Instant;

use chrono::NaiveDate;

use crate::audit::{RequestStamp, RunDetails, SummaryEnvelope};
use crate::config::EngineConfig;
use crate::models::{ConsultationRecord, StrategyUsed, SummaryResult, SummaryStrategy};
use crate::reference::codes;

use super::llm::LlmSummarizer;
use super::summarizer::{build_llm, build_rule_based, resolve_strategy, RuleBasedSummarizer, Summarizer};

/// Holds one summarizer per strategy for the life of the engine, so the AI
/// client is built at most once across requests.
pub struct SummaryEngine {
    config: EngineConfig,
    rule_based: RuleBasedSummarizer,
    llm: Option<LlmSummarizer>,
}

impl SummaryEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::build(config, None)
    }

    fn build(config: EngineConfig, reference_date: Option<NaiveDate>) -> Self {
        let rule_based = build_rule_based(&config, reference_date);
        let llm = config
            .is_llm_configured()
            .then(|| build_llm(&config, reference_date));
        Self {
            config,
            rule_based,
            llm,
        }
    }

    /// Pin "today" for age and end-date checks.
    pub fn with_reference_date(self, date: NaiveDate) -> Self {
        Self::build(self.config, Some(date))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn summarizer_for(&self, record: &ConsultationRecord) -> &dyn Summarizer {
        match (resolve_strategy(record.strategy, &self.config), &self.llm) {
            (SummaryStrategy::LlmBased, Some(llm)) => llm as &dyn Summarizer,
            _ => &self.rule_based,
        }
    }

    /// Summarize with the strategy the record asks for, or the configured default.
    pub fn summarize(&self, record: &ConsultationRecord) -> SummaryResult {
        self.summarizer_for(record).summarize(record)
    }

    /// Summarize and wrap the result with audit metadata.
    pub fn process(&self, record: &ConsultationRecord) -> SummaryEnvelope {
        let stamp = RequestStamp::start();
        let span = tracing::info_span!("summarize", request_id = %stamp.request_id);
        let _guard = span.enter();

        let started = Instant::now();
        let summarizer = self.summarizer_for(record);
        let result = summarizer.summarize(record);
        let elapsed = started.elapsed();

        let llm_model = match result.strategy_used {
            StrategyUsed::RuleBased => None,
            StrategyUsed::LlmBased | StrategyUsed::LlmFallback => summarizer.llm_model().map(str::to_string),
        };
        let fallback_reason = (result.strategy_used == StrategyUsed::LlmFallback)
            .then(|| {
                result
                    .warnings_with_code(codes::LLM_FALLBACK_ACTIVATED)
                    .next()
                    .and_then(|w| w.value.clone())
            })
            .flatten();

        tracing::info!(
            strategy_requested = ?record.strategy,
            strategy_resolved = resolve_strategy(record.strategy, &self.config).as_str(),
            strategy_used = result.strategy_used.as_str(),
            section_count = result.sections.len(),
            warning_count = result.warnings.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Summary generated"
        );

        SummaryEnvelope::new(
            result,
            stamp,
            RunDetails {
                strategy_requested: record.strategy,
                elapsed,
                llm_model,
                fallback_reason,
            },
        )
    }
}
