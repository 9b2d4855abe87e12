use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a string does not name any variant of a model enum.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value '{value}' for {field}")]
pub struct ParseEnumError {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The string literal doubles as the serde wire name.
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ParseEnumError {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(
    /// Sex assigned at birth, not gender identity.
    BiologicalSex {
        Male => "male",
        Female => "female",
        Intersex => "intersex",
    }
);

str_enum!(BloodType {
    APositive => "A+",
    ANegative => "A-",
    BPositive => "B+",
    BNegative => "B-",
    AbPositive => "AB+",
    AbNegative => "AB-",
    OPositive => "O+",
    ONegative => "O-",
});

str_enum!(ConsultationType {
    FirstVisit => "first_visit",
    FollowUp => "follow_up",
    Emergency => "emergency",
    Telemedicine => "telemedicine",
    Routine => "routine",
});

str_enum!(MedicationFrequency {
    OnceDaily => "1x/day",
    TwiceDaily => "2x/day",
    ThreeTimesDaily => "3x/day",
    FourTimesDaily => "4x/day",
    Every6Hours => "q6h",
    Every8Hours => "q8h",
    Every12Hours => "q12h",
    AsNeeded => "prn",
    OnceWeekly => "1x/week",
    Continuous => "continuous",
});

str_enum!(MedicationRoute {
    Oral => "oral",
    Sublingual => "sublingual",
    Intravenous => "iv",
    Intramuscular => "im",
    Subcutaneous => "sc",
    Topical => "topical",
    Inhalation => "inhalation",
    Ophthalmic => "ophthalmic",
    Otic => "otic",
    Nasal => "nasal",
    Rectal => "rectal",
    Transdermal => "transdermal",
});

str_enum!(ReactionType {
    Allergic => "allergic",
    Intolerance => "intolerance",
    Adverse => "adverse",
});

str_enum!(AllergySeverity {
    Mild => "mild",
    Moderate => "moderate",
    Severe => "severe",
    LifeThreatening => "life_threatening",
});

str_enum!(
    /// Severity of a non-blocking advisory warning.
    WarningLevel {
        Info => "info",
        Low => "low",
        Medium => "medium",
        High => "high",
    }
);

str_enum!(
    /// Strategy a caller (or the configuration) asks for.
    SummaryStrategy {
        RuleBased => "rule_based",
        LlmBased => "llm_based",
    }
);

str_enum!(
    /// Strategy that actually produced a result.
    StrategyUsed {
        RuleBased => "rule_based",
        LlmBased => "llm_based",
        LlmFallback => "llm_fallback",
    }
);

str_enum!(SectionCode {
    Identification => "identification",
    ComplaintHistory => "complaint_history",
    VitalSigns => "vital_signs",
    Background => "background",
    PhysicalExam => "physical_exam",
    Assessment => "assessment",
    Plan => "plan",
});

impl Default for ConsultationType {
    fn default() -> Self {
        Self::FirstVisit
    }
}

impl AllergySeverity {
    /// Severe and life-threatening reactions are surfaced prominently.
    pub fn is_severe(&self) -> bool {
        matches!(self, Self::Severe | Self::LifeThreatening)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn wire_names_round_trip_through_from_str() {
        assert_eq!(BloodType::from_str("AB-").unwrap(), BloodType::AbNegative);
        assert_eq!(MedicationFrequency::from_str("q8h").unwrap().as_str(), "q8h");
        assert_eq!(StrategyUsed::LlmFallback.as_str(), "llm_fallback");
    }

    #[test]
    fn unknown_literal_is_rejected() {
        let err = SummaryStrategy::from_str("neural").unwrap_err();
        assert_eq!(err.field, "SummaryStrategy");
        assert_eq!(err.value, "neural");
    }

    #[test]
    fn serde_uses_literal_names() {
        let json = serde_json::to_string(&AllergySeverity::LifeThreatening).unwrap();
        assert_eq!(json, "\"life_threatening\"");
        let parsed: MedicationRoute = serde_json::from_str("\"iv\"").unwrap();
        assert_eq!(parsed, MedicationRoute::Intravenous);
    }

    #[test]
    fn severity_classification() {
        assert!(AllergySeverity::Severe.is_severe());
        assert!(AllergySeverity::LifeThreatening.is_severe());
        assert!(!AllergySeverity::Moderate.is_severe());
    }

    #[test]
    fn consultation_type_defaults_to_first_visit() {
        assert_eq!(ConsultationType::default(), ConsultationType::FirstVisit);
    }
}
