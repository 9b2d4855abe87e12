// Pure text helpers shared by the validator and the generators.
// Every function is deterministic and allocation-only; nothing here logs.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::reference::TRUNCATION_SUFFIX;

static INLINE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());
static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Trim and clip `text` to at most `max_chars` characters.
///
/// Returns the resulting text and whether it was clipped. A clipped result ends
/// with `...` and the suffix counts toward the limit. Lengths are measured in
/// characters, not bytes.
pub fn truncate(text: &str, max_chars: usize) -> (String, bool) {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return (trimmed.to_string(), false);
    }

    let keep = max_chars.saturating_sub(TRUNCATION_SUFFIX.chars().count());
    let head: String = trimmed.chars().take(keep).collect();
    (format!("{}{}", head.trim(), TRUNCATION_SUFFIX), true)
}

/// Hard clip without trimming. Used for the assembled full text, where the
/// boundary may fall anywhere.
pub fn clip(text: &str, max_chars: usize) -> (String, bool) {
    if text.chars().count() <= max_chars {
        return (text.to_string(), false);
    }
    let keep = max_chars.saturating_sub(TRUNCATION_SUFFIX.chars().count());
    let head: String = text.chars().take(keep).collect();
    (format!("{head}{TRUNCATION_SUFFIX}"), true)
}

/// First `max_chars` characters, no suffix.
pub fn take_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Collapse runs of spaces/tabs to one space and three or more newlines to a
/// single blank line, then trim.
pub fn normalize_whitespace(text: &str) -> String {
    let collapsed = INLINE_WHITESPACE.replace_all(text, " ");
    let collapsed = EXCESS_NEWLINES.replace_all(&collapsed, "\n\n");
    collapsed.trim().to_string()
}

/// Order-preserving, case-insensitive de-duplication.
///
/// Items are compared on their trimmed, lower-cased form; blank items are
/// dropped silently. Returns `(unique, removed)`, both trimmed.
pub fn remove_duplicates<S: AsRef<str>>(items: &[S]) -> (Vec<String>, Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    let mut unique = Vec::new();
    let mut removed = Vec::new();

    for item in items {
        let trimmed = item.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_lowercase()) {
            unique.push(trimmed.to_string());
        } else {
            removed.push(trimmed.to_string());
        }
    }

    (unique, removed)
}

/// DD/MM/YYYY.
pub fn format_date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Whole years between `birth` and `today`. `None` when birth is in the future.
pub fn calculate_age(birth: NaiveDate, today: NaiveDate) -> Option<i32> {
    if birth > today {
        return None;
    }
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    Some(age)
}

/// Partial CPF for display: `123.456.789-00` becomes `***.***.789-00`.
/// Shorter inputs are returned untouched.
pub fn mask_cpf(cpf: &str) -> String {
    if cpf.chars().count() < 14 {
        return cpf.to_string();
    }
    let tail: String = cpf.chars().skip(7).collect();
    format!("***.***{tail}")
}

/// Decimal rendering that always keeps a fractional digit for whole values
/// (`70.0`, not `70`).
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("  Hi  ", 10), ("Hi".to_string(), false));
    }

    #[test]
    fn truncate_clips_with_suffix() {
        assert_eq!(truncate("Hello World", 5), ("He...".to_string(), true));
    }

    #[test]
    fn truncate_long_text_hits_exact_limit() {
        let (out, truncated) = truncate(&"a".repeat(5000), 2000);
        assert!(truncated);
        assert_eq!(out.chars().count(), 2000);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let text = "é".repeat(10);
        let (out, truncated) = truncate(&text, 10);
        assert!(!truncated);
        assert_eq!(out, text);
    }

    #[test]
    fn truncate_strips_inner_boundary_whitespace() {
        let (out, _) = truncate("abc   defghijkl", 9);
        assert_eq!(out, "abc...");
    }

    #[test]
    fn clip_does_not_trim() {
        assert_eq!(clip("abcdef", 10), ("abcdef".to_string(), false));
        assert_eq!(clip("ab  cdefgh", 6), ("ab ...".to_string(), true));
    }

    #[test]
    fn normalize_collapses_spaces_and_blank_lines() {
        let raw = "  a  \t b\n\n\n\nc  ";
        assert_eq!(normalize_whitespace(raw), "a b\n\nc");
    }

    #[test]
    fn normalize_keeps_double_newline() {
        assert_eq!(normalize_whitespace("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn remove_duplicates_is_case_insensitive_and_ordered() {
        let (unique, removed) =
            remove_duplicates(&["HAS", "dm2", " has ", "", "DM2", "asma"]);
        assert_eq!(unique, vec!["HAS", "dm2", "asma"]);
        assert_eq!(removed, vec!["has", "DM2"]);
    }

    #[test]
    fn format_date_br_uses_day_first() {
        assert_eq!(format_date_br(date(1985, 3, 15)), "15/03/1985");
    }

    #[test]
    fn age_respects_birthday() {
        let birth = date(1985, 3, 15);
        assert_eq!(calculate_age(birth, date(2024, 3, 14)), Some(38));
        assert_eq!(calculate_age(birth, date(2024, 3, 15)), Some(39));
        assert_eq!(calculate_age(birth, date(1980, 1, 1)), None);
    }

    #[test]
    fn mask_cpf_hides_prefix() {
        assert_eq!(mask_cpf("123.456.789-00"), "***.***.789-00");
        assert_eq!(mask_cpf("12345"), "12345");
    }

    #[test]
    fn decimal_formatting_keeps_one_fraction_digit() {
        assert_eq!(format_decimal(70.0), "70.0");
        assert_eq!(format_decimal(36.5), "36.5");
        assert_eq!(format_decimal(37.25), "37.25");
    }
}
