//! Shared test records.

use chrono::NaiveDate;

use super::*;

/// Fixed "today" used by tests so ages and end dates never drift.
pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn adult_patient() -> Patient {
    Patient {
        full_name: "Maria Silva Santos".into(),
        cpf: "123.456.789-00".into(),
        birth_date: date(1985, 3, 15),
        biological_sex: BiologicalSex::Female,
        blood_type: Some(BloodType::OPositive),
        is_pregnant: false,
        gestational_weeks: None,
    }
}

/// Only the required fields.
pub fn minimal_record() -> ConsultationRecord {
    ConsultationRecord {
        patient: adult_patient(),
        consultation_date: date(2024, 1, 15),
        consultation_type: ConsultationType::FirstVisit,
        facility_name: None,
        chief_complaint: "Dor de cabeça persistente há 3 dias".into(),
        history_present_illness: None,
        vital_signs: None,
        physical_examination: None,
        current_medications: vec![],
        allergies: vec![],
        past_medical_history: vec![],
        family_history: vec![],
        social_history: None,
        professional_name: "Dr. João Pedro Oliveira".into(),
        professional_council_id: None,
        specialty: None,
        treatment_plan: None,
        additional_notes: None,
        strategy: None,
    }
}

pub fn normal_vitals() -> VitalSigns {
    VitalSigns {
        systolic_bp: Some(118),
        diastolic_bp: Some(78),
        heart_rate: Some(72),
        respiratory_rate: Some(16),
        temperature_celsius: Some(36.5),
        oxygen_saturation: Some(98),
        pain_scale: Some(3),
        weight_kg: Some(70.0),
        height_cm: Some(175.0),
    }
}

pub fn medication(name: &str) -> Medication {
    Medication {
        active_ingredient: name.into(),
        commercial_name: None,
        dosage: "50mg".into(),
        frequency: MedicationFrequency::OnceDaily,
        route: MedicationRoute::Oral,
        start_date: Some(date(2023, 1, 10)),
        end_date: None,
        prescriber: None,
        notes: None,
    }
}

pub fn allergy(allergen: &str, severity: AllergySeverity, confirmed: bool) -> Allergy {
    Allergy {
        allergen: allergen.into(),
        reaction_type: ReactionType::Allergic,
        severity,
        reaction_description: None,
        diagnosed_date: None,
        confirmed,
    }
}

/// Every section populated, all values inside reference ranges.
pub fn complete_record() -> ConsultationRecord {
    ConsultationRecord {
        consultation_type: ConsultationType::FollowUp,
        facility_name: Some("Hospital São Lucas".into()),
        history_present_illness: Some(
            "Paciente refere cefaleia holocraniana de intensidade moderada (6/10) \
             iniciada há 3 dias.   Piora no final do dia."
                .into(),
        ),
        vital_signs: Some(normal_vitals()),
        physical_examination: Some(
            "BEG, corada, hidratada.\tACV: RCR 2T BNF sem sopros. AR: MV+ bilateral sem RA."
                .into(),
        ),
        current_medications: vec![medication("losartana potássica")],
        allergies: vec![allergy("dipirona", AllergySeverity::Moderate, true)],
        past_medical_history: vec!["Hipertensão arterial sistêmica (2018)".into()],
        family_history: vec!["Mãe: AVC aos 65 anos".into(), "Pai: Diabetes tipo 2".into()],
        social_history: Some("Não tabagista. Etilismo social. Sedentária.".into()),
        professional_council_id: Some("CRM-SP 123456".into()),
        specialty: Some("Clínica Médica".into()),
        treatment_plan: Some(
            "1. Orientações sobre higiene do sono\n2. Paracetamol 750mg VO 6/6h se dor\n\n\n\n3. Retorno em 7 dias"
                .into(),
        ),
        additional_notes: Some("Paciente orientada a manter diário de sintomas.".into()),
        ..minimal_record()
    }
}
