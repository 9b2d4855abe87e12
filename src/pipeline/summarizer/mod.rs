pub mod factory;
pub mod rule_based;

pub use factory::*;
pub use rule_based::*;

use thiserror::Error;

use crate::models::{ConsultationRecord, Section, SummaryResult, Warning, WarningLevel};
use crate::reference::{codes, DUPLICATE_NAMES_SHOWN};
use crate::text;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummarizerError {
    #[error("AI-assisted summarizer requires a fallback summarizer")]
    MissingFallback,
}

/// A summary generation strategy.
///
/// Implementations are total: every record produces a result, problems are
/// reported as warnings inside it.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, record: &ConsultationRecord) -> SummaryResult;

    /// Model behind this summarizer, when one is involved.
    fn llm_model(&self) -> Option<&str> {
        None
    }
}

impl<S: Summarizer + ?Sized> Summarizer for Box<S> {
    fn summarize(&self, record: &ConsultationRecord) -> SummaryResult {
        (**self).summarize(record)
    }

    fn llm_model(&self) -> Option<&str> {
        (**self).llm_model()
    }
}

/// Render sections as `=== TITLE ===` blocks in catalog order, clipped to
/// `max_chars`. Clipping appends a `TEXT_TRUNCATED` warning for `full_summary`.
pub fn build_full_text(sections: &[Section], max_chars: usize, warnings: &mut Vec<Warning>) -> String {
    let mut ordered: Vec<&Section> = sections.iter().collect();
    ordered.sort_by_key(|s| s.order);

    let mut parts = Vec::with_capacity(ordered.len() * 3);
    for section in ordered {
        parts.push(format!("=== {} ===", section.title.to_uppercase()));
        parts.push(section.content.clone());
        parts.push(String::new());
    }
    let joined = parts.join("\n");

    let (full_text, clipped) = text::clip(joined.trim(), max_chars);
    if clipped {
        warnings.push(truncation_warning("full_summary", max_chars));
    }
    full_text
}

pub(crate) fn truncation_warning(field: &str, limit: usize) -> Warning {
    Warning::new(
        codes::TEXT_TRUNCATED,
        WarningLevel::Info,
        format!("Campo '{field}' truncado para {limit} caracteres"),
    )
    .with_field(field)
    .with_value(limit.to_string())
}

pub(crate) fn duplicate_warning(field: &str, removed: &[String]) -> Warning {
    let shown: Vec<&str> = removed
        .iter()
        .take(DUPLICATE_NAMES_SHOWN)
        .map(String::as_str)
        .collect();
    Warning::new(
        codes::DUPLICATE_REMOVED,
        WarningLevel::Info,
        format!("Duplicata(s) removida(s) de '{field}': {}", shown.join(", ")),
    )
    .with_field(field)
    .with_value(removed.len().to_string())
}

/// Truncate `raw` to `limit`, recording a warning for `field` when clipped.
pub(crate) fn truncate_field(raw: &str, field: &str, limit: usize, warnings: &mut Vec<Warning>) -> String {
    let (out, truncated) = text::truncate(raw, limit);
    if truncated {
        warnings.push(truncation_warning(field, limit));
    }
    out
}
