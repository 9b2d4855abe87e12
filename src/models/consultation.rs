use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{ConsultationType, SummaryStrategy};
use super::medication::{Allergy, Medication};
use super::patient::{Patient, VitalSigns};

/// A structured clinical-encounter record.
///
/// The record reaches the engine already schema-validated (field presence, ranges,
/// pregnancy/sex consistency). The engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultationRecord {
    pub patient: Patient,

    pub consultation_date: NaiveDate,
    #[serde(default)]
    pub consultation_type: ConsultationType,
    #[serde(default)]
    pub facility_name: Option<String>,

    pub chief_complaint: String,
    #[serde(default)]
    pub history_present_illness: Option<String>,

    #[serde(default)]
    pub vital_signs: Option<VitalSigns>,
    #[serde(default)]
    pub physical_examination: Option<String>,

    #[serde(default)]
    pub current_medications: Vec<Medication>,
    #[serde(default)]
    pub allergies: Vec<Allergy>,
    #[serde(default)]
    pub past_medical_history: Vec<String>,
    #[serde(default)]
    pub family_history: Vec<String>,
    #[serde(default)]
    pub social_history: Option<String>,

    pub professional_name: String,
    #[serde(default)]
    pub professional_council_id: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub treatment_plan: Option<String>,
    #[serde(default)]
    pub additional_notes: Option<String>,

    /// Strategy requested for this record; `None` defers to configuration.
    #[serde(default)]
    pub strategy: Option<SummaryStrategy>,
}

impl ConsultationRecord {
    /// Vital signs, if at least one measurement was recorded.
    pub fn vitals(&self) -> Option<&VitalSigns> {
        self.vital_signs.as_ref().filter(|v| !v.is_empty())
    }

    pub fn has_vitals(&self) -> bool {
        self.vitals().is_some()
    }
}

/// Returns the text only when it carries something besides whitespace.
pub(crate) fn non_blank(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{complete_record, minimal_record};

    #[test]
    fn minimal_json_record_deserializes_with_defaults() {
        let record: ConsultationRecord = serde_json::from_str(
            r#"{
                "patient": {
                    "full_name": "Maria Silva Santos",
                    "cpf": "123.456.789-00",
                    "birth_date": "1985-03-15",
                    "biological_sex": "female"
                },
                "consultation_date": "2024-01-15",
                "chief_complaint": "Dor de cabeça persistente há 3 dias",
                "professional_name": "Dr. João Pedro Oliveira"
            }"#,
        )
        .unwrap();

        assert_eq!(record.consultation_type, ConsultationType::FirstVisit);
        assert!(record.current_medications.is_empty());
        assert!(record.strategy.is_none());
        assert!(!record.has_vitals());
    }

    #[test]
    fn empty_vitals_block_counts_as_absent() {
        let mut record = minimal_record();
        record.vital_signs = Some(VitalSigns::default());
        assert!(record.vitals().is_none());
    }

    #[test]
    fn complete_record_has_vitals() {
        assert!(complete_record().has_vitals());
    }

    #[test]
    fn non_blank_filters_whitespace() {
        assert_eq!(non_blank(&Some("  ".into())), None);
        assert_eq!(non_blank(&None), None);
        assert_eq!(non_blank(&Some("x".into())), Some("x"));
    }
}
