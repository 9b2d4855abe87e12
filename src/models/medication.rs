use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{AllergySeverity, MedicationFrequency, MedicationRoute, ReactionType};

/// A medication the patient is currently taking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    pub active_ingredient: String,
    #[serde(default)]
    pub commercial_name: Option<String>,
    pub dosage: String,
    pub frequency: MedicationFrequency,
    pub route: MedicationRoute,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub prescriber: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A known allergy or intolerance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allergy {
    pub allergen: String,
    pub reaction_type: ReactionType,
    pub severity: AllergySeverity,
    #[serde(default)]
    pub reaction_description: Option<String>,
    #[serde(default)]
    pub diagnosed_date: Option<NaiveDate>,
    #[serde(default)]
    pub confirmed: bool,
}
