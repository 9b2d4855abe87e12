use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{BiologicalSex, BloodType};

/// Identification and demographics of the patient seen in the consultation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub full_name: String,
    /// CPF in `XXX.XXX.XXX-XX` form.
    pub cpf: String,
    pub birth_date: NaiveDate,
    pub biological_sex: BiologicalSex,
    #[serde(default)]
    pub blood_type: Option<BloodType>,
    #[serde(default)]
    pub is_pregnant: bool,
    #[serde(default)]
    pub gestational_weeks: Option<u32>,
}

/// Vital-sign measurements taken during the consultation. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    #[serde(default)]
    pub systolic_bp: Option<i32>,
    #[serde(default)]
    pub diastolic_bp: Option<i32>,
    #[serde(default)]
    pub heart_rate: Option<i32>,
    #[serde(default)]
    pub respiratory_rate: Option<i32>,
    #[serde(default)]
    pub temperature_celsius: Option<f64>,
    #[serde(default)]
    pub oxygen_saturation: Option<i32>,
    #[serde(default)]
    pub pain_scale: Option<i32>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub height_cm: Option<f64>,
}

impl VitalSigns {
    /// True when no measurement at all was recorded.
    pub fn is_empty(&self) -> bool {
        self.systolic_bp.is_none()
            && self.diastolic_bp.is_none()
            && self.heart_rate.is_none()
            && self.respiratory_rate.is_none()
            && self.temperature_celsius.is_none()
            && self.oxygen_saturation.is_none()
            && self.pain_scale.is_none()
            && self.weight_kg.is_none()
            && self.height_cm.is_none()
    }

    /// Body-mass index when both weight and height are known.
    pub fn body_mass_index(&self) -> Option<f64> {
        let weight = self.weight_kg?;
        let height_m = self.height_cm? / 100.0;
        if height_m <= 0.0 {
            return None;
        }
        Some(weight / (height_m * height_m))
    }
}
