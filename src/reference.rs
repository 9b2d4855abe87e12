//! Static clinical reference data.
//!
//! Vital-sign ranges, the warning catalog, the section catalog and the guardrail
//! vocabulary. All tables are immutable for the lifetime of the process and safe
//! to read from any thread.
//!
//! The vital-sign ranges describe healthy adults. Pediatric, geriatric and
//! condition-specific ranges differ.

use serde::Serialize;

use crate::models::SectionCode;

/// Version of the deterministic rule set, reported in audit metadata.
pub const RULE_ENGINE_VERSION: &str = "1.0.0";

/// Placeholder that replaces guardrail matches in AI-generated content.
pub const REDACTION_PLACEHOLDER: &str = "[REMOVIDO]";

/// Suffix appended by every truncation.
pub const TRUNCATION_SUFFIX: &str = "...";

// ═══════════════════════════════════════════════════════════
// Vital signs
// ═══════════════════════════════════════════════════════════

/// The six continuously-valued vital signs checked against reference ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalSignKind {
    SystolicBp,
    DiastolicBp,
    HeartRate,
    RespiratoryRate,
    TemperatureCelsius,
    OxygenSaturation,
}

impl VitalSignKind {
    pub const ALL: [VitalSignKind; 6] = [
        Self::SystolicBp,
        Self::DiastolicBp,
        Self::HeartRate,
        Self::RespiratoryRate,
        Self::TemperatureCelsius,
        Self::OxygenSaturation,
    ];

    /// Field name on the record, also the stem of warning codes.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::SystolicBp => "systolic_bp",
            Self::DiastolicBp => "diastolic_bp",
            Self::HeartRate => "heart_rate",
            Self::RespiratoryRate => "respiratory_rate",
            Self::TemperatureCelsius => "temperature_celsius",
            Self::OxygenSaturation => "oxygen_saturation",
        }
    }

    /// Human label used in warning messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::SystolicBp => "Pressão sistólica",
            Self::DiastolicBp => "Pressão diastólica",
            Self::HeartRate => "Frequência cardíaca",
            Self::RespiratoryRate => "Frequência respiratória",
            Self::TemperatureCelsius => "Temperatura",
            Self::OxygenSaturation => "Saturação O2",
        }
    }

    pub fn range(self) -> &'static VitalSignRange {
        match self {
            Self::SystolicBp => &SYSTOLIC_BP_RANGE,
            Self::DiastolicBp => &DIASTOLIC_BP_RANGE,
            Self::HeartRate => &HEART_RATE_RANGE,
            Self::RespiratoryRate => &RESPIRATORY_RATE_RANGE,
            Self::TemperatureCelsius => &TEMPERATURE_RANGE,
            Self::OxygenSaturation => &OXYGEN_SATURATION_RANGE,
        }
    }

    /// Warning code prefix, e.g. `SYSTOLIC_BP`.
    pub fn code_prefix(self) -> String {
        self.field_name().to_uppercase()
    }
}

/// Four-tier reference range: `min_critical < min_normal < max_normal <= max_critical`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VitalSignRange {
    pub min_critical: f64,
    pub min_normal: f64,
    pub max_normal: f64,
    pub max_critical: f64,
    pub unit: &'static str,
}

/// Where a measurement falls relative to its reference range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBand {
    CriticalLow,
    Low,
    Normal,
    High,
    CriticalHigh,
}

impl VitalSignRange {
    pub fn classify(&self, value: f64) -> RangeBand {
        if value < self.min_critical {
            RangeBand::CriticalLow
        } else if value < self.min_normal {
            RangeBand::Low
        } else if value > self.max_critical {
            RangeBand::CriticalHigh
        } else if value > self.max_normal {
            RangeBand::High
        } else {
            RangeBand::Normal
        }
    }
}

pub const SYSTOLIC_BP_RANGE: VitalSignRange = VitalSignRange {
    min_critical: 70.0,
    min_normal: 90.0,
    max_normal: 120.0,
    max_critical: 180.0,
    unit: "mmHg",
};

pub const DIASTOLIC_BP_RANGE: VitalSignRange = VitalSignRange {
    min_critical: 40.0,
    min_normal: 60.0,
    max_normal: 80.0,
    max_critical: 120.0,
    unit: "mmHg",
};

pub const HEART_RATE_RANGE: VitalSignRange = VitalSignRange {
    min_critical: 40.0,
    min_normal: 60.0,
    max_normal: 100.0,
    max_critical: 150.0,
    unit: "bpm",
};

pub const RESPIRATORY_RATE_RANGE: VitalSignRange = VitalSignRange {
    min_critical: 8.0,
    min_normal: 12.0,
    max_normal: 20.0,
    max_critical: 30.0,
    unit: "irpm",
};

pub const TEMPERATURE_RANGE: VitalSignRange = VitalSignRange {
    min_critical: 35.0,
    min_normal: 36.0,
    max_normal: 37.5,
    max_critical: 40.0,
    unit: "°C",
};

pub const OXYGEN_SATURATION_RANGE: VitalSignRange = VitalSignRange {
    min_critical: 90.0,
    min_normal: 95.0,
    max_normal: 100.0,
    max_critical: 100.0,
    unit: "%",
};

/// Pulse pressure below this is flagged as narrow (mmHg).
pub const PULSE_PRESSURE_MIN: i32 = 25;
/// Pulse pressure above this is flagged as wide (mmHg).
pub const PULSE_PRESSURE_MAX: i32 = 60;

pub const PREGNANCY_MIN_AGE: i32 = 14;
pub const PREGNANCY_ADVANCED_AGE: i32 = 45;
pub const GESTATIONAL_WEEKS_MAX: u32 = 42;

pub const PEDIATRIC_HR_AGE_LIMIT: i32 = 12;
pub const PEDIATRIC_HR_MIN: i32 = 70;

/// Assessment flags: under 18 is pediatric, 65 and over is elderly.
pub const PEDIATRIC_AGE_LIMIT: i32 = 18;
pub const ELDERLY_AGE: i32 = 65;

// ═══════════════════════════════════════════════════════════
// Text limits
// ═══════════════════════════════════════════════════════════

pub const DEFAULT_HPI_LIMIT: usize = 2000;
pub const DEFAULT_PHYSICAL_EXAM_LIMIT: usize = 2000;
pub const DEFAULT_TREATMENT_PLAN_LIMIT: usize = 2000;
pub const DEFAULT_ADDITIONAL_NOTES_LIMIT: usize = 1000;
pub const DEFAULT_SOCIAL_HISTORY_LIMIT: usize = 500;
pub const DEFAULT_SECTION_CONTENT_LIMIT: usize = 3000;
pub const DEFAULT_FULL_SUMMARY_LIMIT: usize = 15000;

/// AI-generated section titles and codes are clipped to these lengths.
pub const SECTION_TITLE_LIMIT: usize = 100;
pub const SECTION_CODE_LIMIT: usize = 50;

/// Duplicate warnings name at most this many removed entries.
pub const DUPLICATE_NAMES_SHOWN: usize = 3;

/// Guardrail warnings name at most this many matched terms.
pub const GUARDRAIL_TERMS_SHOWN: usize = 3;

/// Fallback reasons are clipped to this many characters.
pub const FALLBACK_REASON_LIMIT: usize = 100;

// ═══════════════════════════════════════════════════════════
// Warning catalog
// ═══════════════════════════════════════════════════════════

pub mod codes {
    pub const MISSING_VITAL_SIGNS: &str = "MISSING_VITAL_SIGNS";
    pub const BP_INCONSISTENT: &str = "BP_INCONSISTENT";
    pub const PULSE_PRESSURE_LOW: &str = "PULSE_PRESSURE_LOW";
    pub const PULSE_PRESSURE_HIGH: &str = "PULSE_PRESSURE_HIGH";
    pub const PREGNANCY_YOUNG_AGE: &str = "PREGNANCY_YOUNG_AGE";
    pub const PREGNANCY_ADVANCED_AGE: &str = "PREGNANCY_ADVANCED_AGE";
    pub const GESTATIONAL_WEEKS_HIGH: &str = "GESTATIONAL_WEEKS_HIGH";
    pub const PEDIATRIC_HR_LOW: &str = "PEDIATRIC_HR_LOW";
    pub const MEDICATION_NO_START_DATE: &str = "MEDICATION_NO_START_DATE";
    pub const MEDICATION_ENDED: &str = "MEDICATION_ENDED";
    pub const SEVERE_ALLERGIES_PRESENT: &str = "SEVERE_ALLERGIES_PRESENT";
    pub const UNCONFIRMED_ALLERGIES: &str = "UNCONFIRMED_ALLERGIES";
    pub const MISSING_FAMILY_HISTORY: &str = "MISSING_FAMILY_HISTORY";
    pub const MISSING_PAST_HISTORY: &str = "MISSING_PAST_HISTORY";
    pub const EMERGENCY_NO_VITALS: &str = "EMERGENCY_NO_VITALS";
    pub const TEXT_TRUNCATED: &str = "TEXT_TRUNCATED";
    pub const DUPLICATE_REMOVED: &str = "DUPLICATE_REMOVED";
    pub const LLM_SECTION_INCOMPLETE: &str = "LLM_SECTION_INCOMPLETE";
    pub const LLM_DIAGNOSTIC_TERMS_DETECTED: &str = "LLM_DIAGNOSTIC_TERMS_DETECTED";
    pub const LLM_GUARDRAILS_TRIGGERED: &str = "LLM_GUARDRAILS_TRIGGERED";
    pub const LLM_FALLBACK_ACTIVATED: &str = "LLM_FALLBACK_ACTIVATED";
}

// ═══════════════════════════════════════════════════════════
// Section catalog
// ═══════════════════════════════════════════════════════════

/// One entry of the fixed section catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionEntry {
    pub code: SectionCode,
    pub title: &'static str,
    pub order: u8,
}

pub static SECTION_CATALOG: [SectionEntry; 7] = [
    SectionEntry { code: SectionCode::Identification, title: "Identificação", order: 1 },
    SectionEntry { code: SectionCode::ComplaintHistory, title: "Queixa e História", order: 2 },
    SectionEntry { code: SectionCode::VitalSigns, title: "Sinais Vitais", order: 3 },
    SectionEntry { code: SectionCode::Background, title: "Antecedentes e Segurança", order: 4 },
    SectionEntry { code: SectionCode::PhysicalExam, title: "Exame Físico", order: 5 },
    SectionEntry { code: SectionCode::Assessment, title: "Avaliação", order: 6 },
    SectionEntry { code: SectionCode::Plan, title: "Plano", order: 7 },
];

pub fn catalog_entry(code: SectionCode) -> &'static SectionEntry {
    // Catalog is indexed by declaration order of SectionCode.
    &SECTION_CATALOG[code as usize]
}

// ═══════════════════════════════════════════════════════════
// Guardrail vocabulary
// ═══════════════════════════════════════════════════════════

/// Diagnostic, prognostic and inferential vocabulary that must never appear in
/// AI-generated content. Portuguese first, then English.
pub const FORBIDDEN_DIAGNOSTIC_TERMS: &[&str] = &[
    "diagnóstico",
    "diagnostico",
    "diagnosticado",
    "hipótese diagnóstica",
    "hipotese diagnostica",
    "suspeita de",
    "sugere",
    "indica",
    "compatível com",
    "compativel com",
    "provável",
    "provavel",
    "possível",
    "possivel",
    "confirma",
    "confirmado",
    "conclusão",
    "conclusao",
    "parece ser",
    "aparenta ser",
    "quadro de",
    "quadro clínico de",
    "quadro clinico de",
    "característico de",
    "caracteristico de",
    "típico de",
    "tipico de",
    "condizente com",
    "sugestivo de",
    "indicativo de",
    "evidencia",
    "evidência de",
    "aponta para",
    "apresenta sinais de",
    "síndrome de",
    "sindrome de",
    "doença",
    "doenca",
    "patologia",
    "etiologia",
    "prognóstico",
    "prognostico",
    "diagnosis",
    "diagnosed",
    "suspected",
    "suggests",
    "indicates",
    "compatible with",
    "probable",
    "possible",
    "confirms",
    "confirmed",
    "conclusion",
    "consistent with",
    "suggestive of",
    "indicative of",
    "disease",
    "pathology",
    "etiology",
    "prognosis",
    "syndrome",
];
