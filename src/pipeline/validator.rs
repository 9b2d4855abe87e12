//! Clinical validator: deterministic, non-blocking advisory checks.
//!
//! Seven independent checks run in a fixed order and append to one warning
//! list. No check depends on another's output and none can fail.

use chrono::NaiveDate;

use crate::models::{ConsultationRecord, ConsultationType, VitalSigns, Warning, WarningLevel};
use crate::reference::{self, codes, RangeBand, VitalSignKind};
use crate::text;

/// Run every check against `record`, using `today` for age and end-date logic.
pub fn validate(record: &ConsultationRecord, today: NaiveDate) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let age = text::calculate_age(record.patient.birth_date, today);

    check_vital_ranges(record.vitals(), &mut warnings);
    check_blood_pressure(record.vitals(), &mut warnings);
    check_pregnancy(record, age, &mut warnings);
    check_age_specific(record.vitals(), age, &mut warnings);
    check_medications(record, today, &mut warnings);
    check_allergies(record, &mut warnings);
    check_missing_data(record, &mut warnings);

    tracing::debug!(warning_count = warnings.len(), "Clinical validation complete");
    warnings
}

/// Numeric reading plus its display form (integers stay integers).
fn reading(vitals: &VitalSigns, kind: VitalSignKind) -> Option<(f64, String)> {
    let int = |v: Option<i32>| v.map(|n| (f64::from(n), n.to_string()));
    match kind {
        VitalSignKind::SystolicBp => int(vitals.systolic_bp),
        VitalSignKind::DiastolicBp => int(vitals.diastolic_bp),
        VitalSignKind::HeartRate => int(vitals.heart_rate),
        VitalSignKind::RespiratoryRate => int(vitals.respiratory_rate),
        VitalSignKind::OxygenSaturation => int(vitals.oxygen_saturation),
        VitalSignKind::TemperatureCelsius => vitals
            .temperature_celsius
            .map(|t| (t, text::format_decimal(t))),
    }
}

// ═══════════════════════════════════════════════════════════
// 1. Vital-sign ranges
// ═══════════════════════════════════════════════════════════

fn check_vital_ranges(vitals: Option<&VitalSigns>, warnings: &mut Vec<Warning>) {
    let Some(vitals) = vitals else {
        warnings.push(Warning::new(
            codes::MISSING_VITAL_SIGNS,
            WarningLevel::Info,
            "Sinais vitais não informados na consulta",
        ));
        return;
    };

    for kind in VitalSignKind::ALL {
        let Some((value, shown)) = reading(vitals, kind) else {
            continue;
        };
        let range = kind.range();
        let (suffix, level, qualifier) = match range.classify(value) {
            RangeBand::Normal => continue,
            RangeBand::CriticalLow => ("CRITICAL_LOW", WarningLevel::High, "criticamente baixa"),
            RangeBand::Low => ("LOW", WarningLevel::Medium, "abaixo do esperado"),
            RangeBand::High => ("HIGH", WarningLevel::Low, "acima do esperado"),
            RangeBand::CriticalHigh => ("CRITICAL_HIGH", WarningLevel::High, "criticamente elevada"),
        };

        warnings.push(
            Warning::new(
                format!("{}_{suffix}", kind.code_prefix()),
                level,
                format!("{} {qualifier}: {shown} {}", kind.label(), range.unit),
            )
            .with_field(format!("vital_signs.{}", kind.field_name()))
            .with_value(shown),
        );
    }
}

// ═══════════════════════════════════════════════════════════
// 2. Blood-pressure consistency
// ═══════════════════════════════════════════════════════════

fn check_blood_pressure(vitals: Option<&VitalSigns>, warnings: &mut Vec<Warning>) {
    let Some((systolic, diastolic)) = vitals.and_then(|v| Some((v.systolic_bp?, v.diastolic_bp?)))
    else {
        return;
    };

    if systolic <= diastolic {
        warnings.push(
            Warning::new(
                codes::BP_INCONSISTENT,
                WarningLevel::High,
                format!("Pressão sistólica ({systolic}) deve ser maior que diastólica ({diastolic})"),
            )
            .with_field("vital_signs")
            .with_value(format!("{systolic}/{diastolic}")),
        );
    }

    let pulse_pressure = systolic - diastolic;
    if pulse_pressure < reference::PULSE_PRESSURE_MIN {
        warnings.push(
            Warning::new(
                codes::PULSE_PRESSURE_LOW,
                WarningLevel::Medium,
                format!("Pressão de pulso baixa: {pulse_pressure} mmHg"),
            )
            .with_field("vital_signs")
            .with_value(pulse_pressure.to_string()),
        );
    } else if pulse_pressure > reference::PULSE_PRESSURE_MAX {
        warnings.push(
            Warning::new(
                codes::PULSE_PRESSURE_HIGH,
                WarningLevel::Low,
                format!("Pressão de pulso elevada: {pulse_pressure} mmHg"),
            )
            .with_field("vital_signs")
            .with_value(pulse_pressure.to_string()),
        );
    }
}

// ═══════════════════════════════════════════════════════════
// 3. Pregnancy
// ═══════════════════════════════════════════════════════════

fn check_pregnancy(record: &ConsultationRecord, age: Option<i32>, warnings: &mut Vec<Warning>) {
    let patient = &record.patient;
    if !patient.is_pregnant {
        return;
    }

    match age {
        Some(age) if age < reference::PREGNANCY_MIN_AGE => warnings.push(
            Warning::new(
                codes::PREGNANCY_YOUNG_AGE,
                WarningLevel::High,
                format!("Gravidez em paciente com {age} anos requer atenção especial"),
            )
            .with_field("patient.is_pregnant")
            .with_value(age.to_string()),
        ),
        Some(age) if age > reference::PREGNANCY_ADVANCED_AGE => warnings.push(
            Warning::new(
                codes::PREGNANCY_ADVANCED_AGE,
                WarningLevel::Medium,
                format!("Gravidez em paciente com {age} anos (idade materna avançada)"),
            )
            .with_field("patient.is_pregnant")
            .with_value(age.to_string()),
        ),
        _ => {}
    }

    if let Some(weeks) = patient.gestational_weeks.filter(|w| *w > reference::GESTATIONAL_WEEKS_MAX) {
        warnings.push(
            Warning::new(
                codes::GESTATIONAL_WEEKS_HIGH,
                WarningLevel::High,
                format!("Idade gestacional de {weeks} semanas (pós-termo)"),
            )
            .with_field("patient.gestational_weeks")
            .with_value(weeks.to_string()),
        );
    }
}

// ═══════════════════════════════════════════════════════════
// 4. Age-specific
// ═══════════════════════════════════════════════════════════

fn check_age_specific(vitals: Option<&VitalSigns>, age: Option<i32>, warnings: &mut Vec<Warning>) {
    let (Some(age), Some(heart_rate)) = (age, vitals.and_then(|v| v.heart_rate)) else {
        return;
    };

    if age < reference::PEDIATRIC_HR_AGE_LIMIT && heart_rate < reference::PEDIATRIC_HR_MIN {
        warnings.push(
            Warning::new(
                codes::PEDIATRIC_HR_LOW,
                WarningLevel::Medium,
                format!("FC de {heart_rate} bpm pode ser baixa para paciente pediátrico ({age} anos)"),
            )
            .with_field("vital_signs.heart_rate")
            .with_value(heart_rate.to_string()),
        );
    }
}

// ═══════════════════════════════════════════════════════════
// 5. Medications
// ═══════════════════════════════════════════════════════════

fn check_medications(record: &ConsultationRecord, today: NaiveDate, warnings: &mut Vec<Warning>) {
    for (idx, med) in record.current_medications.iter().enumerate() {
        if med.start_date.is_none() {
            warnings.push(
                Warning::new(
                    codes::MEDICATION_NO_START_DATE,
                    WarningLevel::Info,
                    format!("Medicamento '{}' sem data de início", med.active_ingredient),
                )
                .with_field(format!("current_medications[{idx}].start_date"))
                .with_value("null"),
            );
        }

        if let Some(end) = med.end_date.filter(|end| *end < today) {
            warnings.push(
                Warning::new(
                    codes::MEDICATION_ENDED,
                    WarningLevel::Low,
                    format!(
                        "Medicamento '{}' com data de término no passado ({end})",
                        med.active_ingredient
                    ),
                )
                .with_field(format!("current_medications[{idx}].end_date"))
                .with_value(end.to_string()),
            );
        }
    }
}

// ═══════════════════════════════════════════════════════════
// 6. Allergies
// ═══════════════════════════════════════════════════════════

fn check_allergies(record: &ConsultationRecord, warnings: &mut Vec<Warning>) {
    let severe: Vec<&str> = record
        .allergies
        .iter()
        .filter(|a| a.severity.is_severe())
        .map(|a| a.allergen.as_str())
        .collect();

    if !severe.is_empty() {
        warnings.push(
            Warning::new(
                codes::SEVERE_ALLERGIES_PRESENT,
                WarningLevel::Medium,
                format!("Paciente possui alergias graves: {}", severe.join(", ")),
            )
            .with_field("allergies")
            .with_value(severe.len().to_string()),
        );
    }

    let unconfirmed = record.allergies.iter().filter(|a| !a.confirmed).count();
    if unconfirmed > 0 {
        warnings.push(
            Warning::new(
                codes::UNCONFIRMED_ALLERGIES,
                WarningLevel::Info,
                format!("{unconfirmed} alergia(s) não confirmada(s) por exame"),
            )
            .with_field("allergies")
            .with_value(unconfirmed.to_string()),
        );
    }
}

// ═══════════════════════════════════════════════════════════
// 7. Missing data
// ═══════════════════════════════════════════════════════════

fn check_missing_data(record: &ConsultationRecord, warnings: &mut Vec<Warning>) {
    if record.family_history.is_empty() {
        warnings.push(
            Warning::new(
                codes::MISSING_FAMILY_HISTORY,
                WarningLevel::Info,
                "Histórico familiar não informado",
            )
            .with_field("family_history")
            .with_value("[]"),
        );
    }

    if record.past_medical_history.is_empty() {
        warnings.push(
            Warning::new(
                codes::MISSING_PAST_HISTORY,
                WarningLevel::Info,
                "Antecedentes patológicos não informados",
            )
            .with_field("past_medical_history")
            .with_value("[]"),
        );
    }

    if record.consultation_type == ConsultationType::Emergency && !record.has_vitals() {
        warnings.push(
            Warning::new(
                codes::EMERGENCY_NO_VITALS,
                WarningLevel::Medium,
                "Consulta de emergência sem sinais vitais registrados",
            )
            .with_field("vital_signs")
            .with_value("null"),
        );
    }
}
