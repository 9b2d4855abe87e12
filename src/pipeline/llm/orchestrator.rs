use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;

use crate::config::{EngineConfig, LlmProvider, TextLimits};
use crate::models::{ConsultationRecord, StrategyUsed, SummaryResult, Warning, WarningLevel};
use crate::pipeline::safety::{apply_guardrails, scan_forbidden_terms};
use crate::pipeline::summarizer::{build_full_text, Summarizer, SummarizerError};
use crate::pipeline::validator;
use crate::reference::{codes, FALLBACK_REASON_LIMIT};
use crate::text;

use super::gemini::GeminiClient;
use super::openai::OpenAiClient;
use super::parser::parse_summary_response;
use super::prompt::{build_summary_prompt, SUMMARY_SYSTEM_PROMPT};
use super::types::LlmClient;
use super::LlmError;

/// Deferred provider construction, run on first use.
pub type ClientFactory = Box<dyn Fn() -> Result<Box<dyn LlmClient>, LlmError> + Send + Sync>;

/// Where an AI generation attempt stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    NotConfigured,
    Init,
    PromptBuild,
    ProviderCall,
    ResponseParse,
}

impl GenerationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::Init => "init",
            Self::PromptBuild => "prompt_build",
            Self::ProviderCall => "provider_call",
            Self::ResponseParse => "response_parse",
        }
    }
}

/// A failed attempt: the stage plus the error that stopped it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFailure {
    pub stage: GenerationStage,
    pub error: LlmError,
}

impl GenerationFailure {
    fn at(stage: GenerationStage) -> impl FnOnce(LlmError) -> Self {
        move |error| Self { stage, error }
    }
}

impl fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.stage.as_str(), self.error)
    }
}

/// AI-assisted summarizer with mandatory rule-based fallback.
///
/// Pipeline: init (lazy, once) → prompt → provider call → parse → guardrails.
/// Guardrails never fail; they redact and warn.
/// Any failure hands the record to the fallback summarizer; nothing escapes
/// to the caller.
pub struct LlmSummarizer {
    fallback: Box<dyn Summarizer>,
    client: OnceLock<Box<dyn LlmClient>>,
    factory: Option<ClientFactory>,
    model_hint: Option<String>,
    limits: TextLimits,
    reference_date: Option<NaiveDate>,
}

impl LlmSummarizer {
    pub fn builder() -> LlmSummarizerBuilder {
        LlmSummarizerBuilder::default()
    }

    /// Wire the provider selected by `config` behind `fallback`.
    pub fn from_config(fallback: Box<dyn Summarizer>, config: &EngineConfig) -> Self {
        Self {
            fallback,
            client: OnceLock::new(),
            factory: provider_factory(config),
            model_hint: config.llm_model().map(str::to_string),
            limits: config.text_limits,
            reference_date: None,
        }
    }

    /// Pin "today" for the validator pass on the AI path.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Whether the provider client has been constructed.
    pub fn is_initialized(&self) -> bool {
        self.client.get().is_some()
    }

    fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// The provider client, constructing it on first use. A failed construction
    /// leaves the slot empty so a later call tries again.
    fn client(&self) -> Result<&dyn LlmClient, GenerationFailure> {
        if let Some(client) = self.client.get() {
            return Ok(client.as_ref());
        }
        let factory = self.factory.as_ref().ok_or(GenerationFailure {
            stage: GenerationStage::NotConfigured,
            error: LlmError::NotConfigured,
        })?;
        let created = factory().map_err(GenerationFailure::at(GenerationStage::Init))?;
        tracing::info!(model = %created.model(), "LLM client initialized");
        Ok(self.client.get_or_init(move || created).as_ref())
    }

    /// One AI attempt, start to finish.
    pub fn try_generate(&self, record: &ConsultationRecord) -> Result<SummaryResult, GenerationFailure> {
        let client = self.client()?;
        let mut warnings = validator::validate(record, self.today());

        let prompt = build_summary_prompt(record).map_err(GenerationFailure::at(GenerationStage::PromptBuild))?;

        let response = client
            .generate(&prompt, SUMMARY_SYSTEM_PROMPT)
            .map_err(GenerationFailure::at(GenerationStage::ProviderCall))?;
        if response.trim().is_empty() {
            return Err(GenerationFailure {
                stage: GenerationStage::ProviderCall,
                error: LlmError::EmptyResponse,
            });
        }

        let parsed = parse_summary_response(&response, self.limits.section_content)
            .map_err(GenerationFailure::at(GenerationStage::ResponseParse))?;
        warnings.extend(parsed.warnings);

        let guarded = apply_guardrails(parsed.sections);
        debug_assert!(guarded
            .sections
            .iter()
            .all(|s| scan_forbidden_terms(&s.content).is_empty() && scan_forbidden_terms(&s.title).is_empty()));
        warnings.extend(guarded.warnings);

        let full_text = build_full_text(&guarded.sections, self.limits.full_summary, &mut warnings);

        tracing::debug!(
            section_count = guarded.sections.len(),
            redacted_sections = guarded.redacted_sections,
            "AI summary accepted"
        );

        Ok(SummaryResult {
            sections: guarded.sections,
            full_text,
            warnings,
            strategy_used: StrategyUsed::LlmBased,
        })
    }

    fn fall_back(&self, record: &ConsultationRecord, failure: &GenerationFailure) -> SummaryResult {
        let reason = text::take_chars(&failure.to_string(), FALLBACK_REASON_LIMIT);
        tracing::warn!(stage = failure.stage.as_str(), reason = %reason, "AI summary failed, using fallback");

        let fallback = self.fallback.summarize(record);

        let mut warnings = Vec::with_capacity(fallback.warnings.len() + 1);
        warnings.push(
            Warning::new(
                codes::LLM_FALLBACK_ACTIVATED,
                WarningLevel::Info,
                format!("Fallback para rule_based ativado: {reason}"),
            )
            .with_value(reason),
        );
        warnings.extend(fallback.warnings);

        SummaryResult {
            sections: fallback.sections,
            full_text: fallback.full_text,
            warnings,
            strategy_used: StrategyUsed::LlmFallback,
        }
    }
}

impl Summarizer for LlmSummarizer {
    fn summarize(&self, record: &ConsultationRecord) -> SummaryResult {
        let span = tracing::info_span!("llm_summarize");
        let _guard = span.enter();

        match self.try_generate(record) {
            Ok(result) => result,
            Err(failure) => self.fall_back(record, &failure),
        }
    }

    fn llm_model(&self) -> Option<&str> {
        self.client
            .get()
            .map(|c| c.model())
            .or(self.model_hint.as_deref())
    }
}

/// Factory for the provider `config` selects, or `None` without credentials.
pub fn provider_factory(config: &EngineConfig) -> Option<ClientFactory> {
    let timeout = config.llm_timeout;
    match config.llm_provider()? {
        LlmProvider::Gemini => {
            let key = config.gemini_api_key.clone()?;
            let model = config.gemini_model.clone();
            Some(Box::new(move || {
                GeminiClient::new(&key, &model, timeout).map(|c| Box::new(c) as Box<dyn LlmClient>)
            }))
        }
        LlmProvider::OpenAi => {
            let key = config.openai_api_key.clone()?;
            let model = config.openai_model.clone();
            let base_url = config.openai_base_url.clone();
            Some(Box::new(move || {
                OpenAiClient::new(&base_url, &key, &model, timeout).map(|c| Box::new(c) as Box<dyn LlmClient>)
            }))
        }
    }
}

#[derive(Default)]
pub struct LlmSummarizerBuilder {
    fallback: Option<Box<dyn Summarizer>>,
    factory: Option<ClientFactory>,
    limits: TextLimits,
    reference_date: Option<NaiveDate>,
}

impl LlmSummarizerBuilder {
    pub fn fallback(mut self, fallback: impl Summarizer + 'static) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    /// Use an already-built client. Still installed lazily on first call.
    pub fn client(self, client: impl LlmClient + Clone + 'static) -> Self {
        self.client_factory(move || Ok(Box::new(client.clone()) as Box<dyn LlmClient>))
    }

    pub fn client_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn LlmClient>, LlmError> + Send + Sync + 'static,
    {
        self.factory = Some(Box::new(factory));
        self
    }

    pub fn limits(mut self, limits: TextLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn build(self) -> Result<LlmSummarizer, SummarizerError> {
        let fallback = self.fallback.ok_or(SummarizerError::MissingFallback)?;
        Ok(LlmSummarizer {
            fallback,
            client: OnceLock::new(),
            factory: self.factory,
            model_hint: None,
            limits: self.limits,
            reference_date: self.reference_date,
        })
    }
}
