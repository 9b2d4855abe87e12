use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::models::{Section, Warning, WarningLevel};
use crate::reference::{codes, FORBIDDEN_DIAGNOSTIC_TERMS, GUARDRAIL_TERMS_SHOWN, REDACTION_PLACEHOLDER};

/// One case-insensitive alternation over every forbidden term, longest first,
/// so "confirmado" is redacted whole rather than as "confirma" + "do".
static FORBIDDEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let mut terms: Vec<&str> = FORBIDDEN_DIAGNOSTIC_TERMS.to_vec();
    terms.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));
    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)(?:{alternation})")).unwrap()
});

/// Sections after redaction plus the warnings describing what was removed.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardrailOutcome {
    pub sections: Vec<Section>,
    pub warnings: Vec<Warning>,
    pub redacted_sections: usize,
}

/// Canonical composition, so a base letter plus combining accent matches the
/// precomposed spelling in the vocabulary.
pub fn compose(text: &str) -> String {
    text.nfc().collect()
}

/// Forbidden terms present in `text`, in vocabulary order.
/// Matching is case-insensitive substring matching on the composed form.
pub fn scan_forbidden_terms(text: &str) -> Vec<&'static str> {
    let lowered = compose(text).to_lowercase();
    FORBIDDEN_DIAGNOSTIC_TERMS
        .iter()
        .copied()
        .filter(|term| lowered.contains(term))
        .collect()
}

/// Replace every forbidden term occurrence with the redaction placeholder.
/// The result is in composed form.
pub fn redact(text: &str) -> String {
    FORBIDDEN_PATTERN
        .replace_all(&compose(text), REDACTION_PLACEHOLDER)
        .into_owned()
}

/// Scan and redact AI-generated sections.
///
/// Each affected section gets one high-level warning naming up to three of the
/// matched terms; any redaction at all adds one aggregate medium warning.
pub fn apply_guardrails(sections: Vec<Section>) -> GuardrailOutcome {
    let mut warnings = Vec::new();
    let mut redacted_sections = 0usize;
    let mut total_terms = 0usize;

    let sections = sections
        .into_iter()
        .map(|mut section| {
            section.title = compose(&section.title);
            section.content = compose(&section.content);

            let mut found = scan_forbidden_terms(&section.content);
            for term in scan_forbidden_terms(&section.title) {
                if !found.contains(&term) {
                    found.push(term);
                }
            }
            if found.is_empty() {
                return section;
            }

            redacted_sections += 1;
            total_terms += found.len();
            let shown: Vec<&str> = found.iter().copied().take(GUARDRAIL_TERMS_SHOWN).collect();
            warnings.push(
                Warning::new(
                    codes::LLM_DIAGNOSTIC_TERMS_DETECTED,
                    WarningLevel::High,
                    format!(
                        "Termos diagnósticos detectados na seção '{}': {}",
                        redact(&section.title),
                        shown.join(", ")
                    ),
                )
                .with_field(format!("sections.{}", section.code)),
            );

            section.content = redact(&section.content);
            section.title = redact(&section.title);
            section
        })
        .collect();

    if redacted_sections > 0 {
        warnings.push(Warning::new(
            codes::LLM_GUARDRAILS_TRIGGERED,
            WarningLevel::Medium,
            "Guardrails acionados - termos diagnósticos foram removidos",
        ));
        tracing::info!(
            redacted_sections,
            matched_terms = total_terms,
            "Guardrails redacted diagnostic vocabulary from AI output"
        );
    }

    GuardrailOutcome {
        sections,
        warnings,
        redacted_sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SectionCode;

    fn section(code: SectionCode, title: &str, content: &str) -> Section {
        Section {
            title: title.into(),
            code,
            content: content.into(),
            order: crate::reference::catalog_entry(code).order,
        }
    }

    #[test]
    fn clean_sections_pass_untouched() {
        let input = vec![section(SectionCode::Plan, "Plano", "Retorno em 7 dias")];
        let outcome = apply_guardrails(input.clone());
        assert_eq!(outcome.sections, input);
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.redacted_sections, 0);
    }

    #[test]
    fn diagnostic_term_redacted_with_two_warnings() {
        let outcome = apply_guardrails(vec![section(
            SectionCode::Assessment,
            "Avaliação",
            "Diagnóstico: enxaqueca.",
        )]);
        assert_eq!(outcome.sections[0].content, "[REMOVIDO]: enxaqueca.");
        assert_eq!(outcome.warnings.len(), 2);
        assert_eq!(outcome.warnings[0].code, "LLM_DIAGNOSTIC_TERMS_DETECTED");
        assert_eq!(outcome.warnings[0].level, WarningLevel::High);
        assert_eq!(outcome.warnings[0].field.as_deref(), Some("sections.assessment"));
        assert_eq!(outcome.warnings[1].code, "LLM_GUARDRAILS_TRIGGERED");
        assert_eq!(outcome.warnings[1].level, WarningLevel::Medium);
    }

    #[test]
    fn every_occurrence_redacted_case_insensitively() {
        let redacted = redact("SUGERE x; sugere y; Compatível com z");
        assert_eq!(redacted, "[REMOVIDO] x; [REMOVIDO] y; [REMOVIDO] z");
        assert!(scan_forbidden_terms(&redacted).is_empty());
    }

    #[test]
    fn decomposed_accents_redacted() {
        let outcome = apply_guardrails(vec![section(
            SectionCode::Assessment,
            "Avaliação",
            "Diagno\u{301}stico: enxaqueca; doenc\u{327}a cro\u{302}nica",
        )]);
        assert_eq!(outcome.sections[0].content, "[REMOVIDO]: enxaqueca; [REMOVIDO] crônica");
        assert_eq!(outcome.redacted_sections, 1);
        assert_eq!(outcome.warnings.len(), 2);
        assert!(outcome.warnings[0].message.ends_with("diagnóstico, doença"), "{}", outcome.warnings[0].message);

        assert_eq!(scan_forbidden_terms("SUSPEITA DE gripe"), vec!["suspeita de"]);
        assert_eq!(redact("progno\u{301}stico reservado"), "[REMOVIDO] reservado");
    }

    #[test]
    fn vocabulary_is_composed() {
        for term in FORBIDDEN_DIAGNOSTIC_TERMS {
            assert_eq!(compose(term), *term);
        }
    }

    #[test]
    fn clean_decomposed_text_is_recomposed() {
        let outcome = apply_guardrails(vec![section(SectionCode::Plan, "Plano", "Retorno em 7 dias; orientac\u{327}o\u{303}es")]);
        assert_eq!(outcome.sections[0].content, "Retorno em 7 dias; orientações");
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn redaction_leaves_no_term_behind() {
        for term in FORBIDDEN_DIAGNOSTIC_TERMS {
            let text = format!("antes {} depois {}", term.to_uppercase(), term);
            let redacted = redact(&text);
            assert!(scan_forbidden_terms(&redacted).is_empty(), "{term}: {redacted}");
        }
    }

    #[test]
    fn longest_term_wins() {
        assert_eq!(redact("achado confirmado"), "achado [REMOVIDO]");
        assert_eq!(redact("quadro clínico de febre"), "[REMOVIDO] febre");
    }

    #[test]
    fn english_terms_detected() {
        assert_eq!(scan_forbidden_terms("Findings consistent with flu"), vec!["consistent with"]);
    }

    #[test]
    fn warning_names_at_most_three_terms() {
        let outcome = apply_guardrails(vec![section(
            SectionCode::Assessment,
            "Avaliação",
            "sugere, indica, provável, possível",
        )]);
        let message = &outcome.warnings[0].message;
        assert!(message.ends_with("sugere, indica, provável"), "{message}");
    }

    #[test]
    fn one_detection_warning_per_affected_section() {
        let outcome = apply_guardrails(vec![
            section(SectionCode::ComplaintHistory, "Queixa", "sugere gripe"),
            section(SectionCode::Background, "Antecedentes", "sem alergias"),
            section(SectionCode::Assessment, "Avaliação", "provável virose"),
        ]);
        assert_eq!(outcome.redacted_sections, 2);
        let detected = outcome
            .warnings
            .iter()
            .filter(|w| w.code == "LLM_DIAGNOSTIC_TERMS_DETECTED")
            .count();
        assert_eq!(detected, 2);
        assert_eq!(outcome.warnings.len(), 3);
        assert_eq!(outcome.sections[1].content, "sem alergias");
    }

    #[test]
    fn titles_are_scanned_too() {
        let outcome = apply_guardrails(vec![section(SectionCode::Assessment, "Hipótese diagnóstica", "Consulta de retorno.")]);
        assert_eq!(outcome.sections[0].title, "[REMOVIDO]");
        assert_eq!(outcome.redacted_sections, 1);
    }

    #[test]
    fn substring_semantics_match_inside_words() {
        // "indica" inside "indicado" is still removed.
        assert_eq!(redact("repouso indicado"), "repouso [REMOVIDO]do");
    }
}
