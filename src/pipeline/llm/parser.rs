use crate::models::{Section, SectionCode, Warning, WarningLevel};
use crate::pipeline::summarizer::truncate_field;
use crate::reference::{codes, catalog_entry, SECTION_CODE_LIMIT, SECTION_TITLE_LIMIT};
use crate::text;

use super::LlmError;

/// Sections recovered from a model response, plus what was skipped on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSummary {
    pub sections: Vec<Section>,
    pub warnings: Vec<Warning>,
}

/// Parse the model's JSON into catalog sections.
///
/// Entries missing `title`, `code` or `content`, with a code outside the
/// catalog, or repeating an earlier code are skipped with an info warning.
/// Titles are clipped, content is truncated to `content_limit`, and `order`
/// always comes from the catalog regardless of what the model sent.
pub fn parse_summary_response(response: &str, content_limit: usize) -> Result<ParsedSummary, LlmError> {
    let json_str = strip_code_fences(response);

    let value: serde_json::Value =
        serde_json::from_str(json_str).map_err(|e| LlmError::JsonParsing(e.to_string()))?;

    let items = value
        .get("sections")
        .and_then(|s| s.as_array())
        .ok_or_else(|| LlmError::MalformedResponse("Response missing 'sections' array".into()))?;

    let mut sections: Vec<Section> = Vec::new();
    let mut warnings = Vec::new();

    for (idx, item) in items.iter().enumerate() {
        let (Some(title), Some(raw_code), Some(content)) = (
            field_text(item, "title"),
            field_text(item, "code"),
            field_text(item, "content"),
        ) else {
            warnings.push(skipped(idx, format!("Seção {idx} incompleta, ignorada")));
            continue;
        };

        let normalized = text::take_chars(&raw_code.trim().to_lowercase().replace(' ', "_"), SECTION_CODE_LIMIT);
        let Ok(code) = normalized.parse::<SectionCode>() else {
            warnings.push(skipped(idx, format!("Seção {idx} com código desconhecido '{normalized}', ignorada")));
            continue;
        };
        if sections.iter().any(|s| s.code == code) {
            warnings.push(skipped(idx, format!("Seção {idx} repete o código '{code}', ignorada")));
            continue;
        }

        let field = format!("sections.{code}");
        let content = truncate_field(&content, &field, content_limit, &mut warnings);

        sections.push(Section {
            title: text::take_chars(title.trim(), SECTION_TITLE_LIMIT),
            code,
            content,
            order: catalog_entry(code).order,
        });
    }

    if sections.is_empty() {
        return Err(LlmError::NoValidSections);
    }

    sections.sort_by_key(|s| s.order);
    Ok(ParsedSummary { sections, warnings })
}

/// Strip an optional Markdown code fence (``` or ```json) around the payload.
fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// String value of `key`; non-string scalars are rendered, null counts as absent.
fn field_text(item: &serde_json::Value, key: &str) -> Option<String> {
    match item.get(key)? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn skipped(idx: usize, message: String) -> Warning {
    Warning::new(codes::LLM_SECTION_INCOMPLETE, WarningLevel::Info, message)
        .with_field(format!("sections[{idx}]"))
}
