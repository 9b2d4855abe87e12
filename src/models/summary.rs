use serde::{Deserialize, Serialize};

use super::enums::{SectionCode, StrategyUsed, WarningLevel};

/// A non-blocking advisory produced while validating or summarizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub code: String,
    pub level: WarningLevel,
    pub message: String,
    pub field: Option<String>,
    pub value: Option<String>,
}

impl Warning {
    pub fn new(code: impl Into<String>, level: WarningLevel, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            level,
            message: message.into(),
            field: None,
            value: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// One titled block of the generated summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub code: SectionCode,
    pub content: String,
    pub order: u8,
}

/// Everything a generator hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub sections: Vec<Section>,
    pub full_text: String,
    pub warnings: Vec<Warning>,
    pub strategy_used: StrategyUsed,
}

impl SummaryResult {
    pub fn section(&self, code: SectionCode) -> Option<&Section> {
        self.sections.iter().find(|s| s.code == code)
    }

    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    pub fn warnings_with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Warning> + 'a {
        self.warnings.iter().filter(move |w| w.code == code)
    }
}
