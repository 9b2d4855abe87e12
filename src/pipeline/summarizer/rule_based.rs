//! Deterministic rule-based summarizer.
//!
//! Reorganizes and normalizes what the record already says. It never infers,
//! and given a fixed reference date the same record always yields the same
//! result.

use chrono::NaiveDate;

use crate::config::TextLimits;
use crate::models::consultation::non_blank;
use crate::models::{
    AllergySeverity, BiologicalSex, ConsultationRecord, ConsultationType, Section, SectionCode,
    StrategyUsed, SummaryResult, VitalSigns, Warning,
};
use crate::pipeline::validator;
use crate::reference::{self, catalog_entry};
use crate::text;

use super::{build_full_text, duplicate_warning, truncate_field, Summarizer};

#[derive(Debug, Clone, Default)]
pub struct RuleBasedSummarizer {
    limits: TextLimits,
    reference_date: Option<NaiveDate>,
}

impl RuleBasedSummarizer {
    pub fn new(limits: TextLimits) -> Self {
        Self {
            limits,
            reference_date: None,
        }
    }

    /// Pin "today" (ages, medication end dates) instead of reading the clock.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

impl Summarizer for RuleBasedSummarizer {
    fn summarize(&self, record: &ConsultationRecord) -> SummaryResult {
        let today = self.today();
        let mut warnings = validator::validate(record, today);
        let age = text::calculate_age(record.patient.birth_date, today);

        let mut sections = vec![
            identification(record, age),
            complaint_history(record, &self.limits, &mut warnings),
        ];
        if let Some(vitals) = record.vitals() {
            sections.push(vital_signs(vitals));
        }
        sections.push(background(record, &self.limits, &mut warnings));
        if let Some(exam) = non_blank(&record.physical_examination) {
            sections.push(physical_exam(exam, &self.limits, &mut warnings));
        }
        sections.push(assessment(record, age, &self.limits, &mut warnings));
        if let Some(plan) = non_blank(&record.treatment_plan) {
            sections.push(plan_section(plan, &self.limits, &mut warnings));
        }

        let full_text = build_full_text(&sections, self.limits.full_summary, &mut warnings);

        tracing::debug!(
            section_count = sections.len(),
            warning_count = warnings.len(),
            "Rule-based summary built"
        );

        SummaryResult {
            sections,
            full_text,
            warnings,
            strategy_used: StrategyUsed::RuleBased,
        }
    }
}

fn section(code: SectionCode, content: String) -> Section {
    let entry = catalog_entry(code);
    Section {
        title: entry.title.to_string(),
        code,
        content,
        order: entry.order,
    }
}

fn sex_label(sex: BiologicalSex) -> &'static str {
    match sex {
        BiologicalSex::Male => "Masculino",
        BiologicalSex::Female => "Feminino",
        BiologicalSex::Intersex => "Intersexo",
    }
}

fn consultation_type_label(kind: ConsultationType) -> &'static str {
    match kind {
        ConsultationType::FirstVisit => "Primeira consulta",
        ConsultationType::FollowUp => "Retorno",
        ConsultationType::Emergency => "Emergência",
        ConsultationType::Telemedicine => "Teleconsulta",
        ConsultationType::Routine => "Rotina",
    }
}

fn severity_label(severity: AllergySeverity) -> &'static str {
    match severity {
        AllergySeverity::Mild => "leve",
        AllergySeverity::Moderate => "moderada",
        AllergySeverity::Severe => "GRAVE",
        AllergySeverity::LifeThreatening => "RISCO DE VIDA",
    }
}

fn gestational_weeks(weeks: Option<u32>) -> String {
    weeks.map_or_else(|| "?".to_string(), |w| w.to_string())
}

// ═══════════════════════════════════════════════════════════
// Sections
// ═══════════════════════════════════════════════════════════

fn identification(record: &ConsultationRecord, age: Option<i32>) -> Section {
    let patient = &record.patient;
    let age_suffix = age.map(|a| format!(" ({a} anos)")).unwrap_or_default();

    let mut lines = vec![
        format!("Paciente: {}", patient.full_name),
        format!("CPF: {}", patient.cpf),
        format!("Nascimento: {}{age_suffix}", text::format_date_br(patient.birth_date)),
        format!("Sexo biológico: {}", sex_label(patient.biological_sex)),
    ];
    if let Some(blood_type) = patient.blood_type {
        lines.push(format!("Tipo sanguíneo: {blood_type}"));
    }
    if patient.is_pregnant {
        lines.push(format!("Gestante: {} semanas", gestational_weeks(patient.gestational_weeks)));
    }

    lines.push(format!("Data da consulta: {}", text::format_date_br(record.consultation_date)));
    lines.push(format!("Tipo: {}", consultation_type_label(record.consultation_type)));
    if let Some(facility) = non_blank(&record.facility_name) {
        lines.push(format!("Local: {facility}"));
    }
    lines.push(format!("Profissional: {}", record.professional_name));
    if let Some(council_id) = non_blank(&record.professional_council_id) {
        lines.push(format!("Registro: {council_id}"));
    }
    if let Some(specialty) = non_blank(&record.specialty) {
        lines.push(format!("Especialidade: {specialty}"));
    }

    section(SectionCode::Identification, lines.join(" | "))
}

fn complaint_history(record: &ConsultationRecord, limits: &TextLimits, warnings: &mut Vec<Warning>) -> Section {
    let mut parts = vec![format!("Queixa principal: {}", record.chief_complaint.trim())];

    if let Some(hpi) = non_blank(&record.history_present_illness) {
        let hpi = truncate_field(hpi, "history_present_illness", limits.history_present_illness, warnings);
        parts.push(format!("\nHDA: {}", text::normalize_whitespace(&hpi)));
    }

    section(SectionCode::ComplaintHistory, parts.join("\n"))
}

fn vital_signs(vitals: &VitalSigns) -> Section {
    let mut parts = Vec::new();

    match (vitals.systolic_bp, vitals.diastolic_bp) {
        (Some(s), Some(d)) => parts.push(format!("PA: {s}x{d} mmHg")),
        (Some(s), None) => parts.push(format!("PAS: {s} mmHg")),
        (None, Some(d)) => parts.push(format!("PAD: {d} mmHg")),
        (None, None) => {}
    }
    if let Some(hr) = vitals.heart_rate {
        parts.push(format!("FC: {hr} bpm"));
    }
    if let Some(rr) = vitals.respiratory_rate {
        parts.push(format!("FR: {rr} irpm"));
    }
    if let Some(temp) = vitals.temperature_celsius {
        parts.push(format!("Tax: {}°C", text::format_decimal(temp)));
    }
    if let Some(spo2) = vitals.oxygen_saturation {
        parts.push(format!("SpO2: {spo2}%"));
    }
    if let Some(pain) = vitals.pain_scale {
        parts.push(format!("Dor: {pain}/10"));
    }
    if let Some(weight) = vitals.weight_kg {
        parts.push(format!("Peso: {} kg", text::format_decimal(weight)));
    }
    if let Some(height) = vitals.height_cm {
        parts.push(format!("Altura: {} cm", text::format_decimal(height)));
    }
    if let Some(bmi) = vitals.body_mass_index() {
        parts.push(format!("IMC: {bmi:.1} kg/m²"));
    }

    section(SectionCode::VitalSigns, parts.join(" | "))
}

fn background(record: &ConsultationRecord, limits: &TextLimits, warnings: &mut Vec<Warning>) -> Section {
    let mut parts = Vec::new();

    if record.allergies.is_empty() {
        parts.push("Alergias: Não informadas".to_string());
    } else {
        let items: Vec<String> = record
            .allergies
            .iter()
            .map(|a| {
                let marker = if a.confirmed { "✓" } else { "?" };
                format!("{} ({}) {marker}", a.allergen, severity_label(a.severity))
            })
            .collect();
        parts.push(format!("⚠️ ALERGIAS: {}", items.join("; ")));
    }

    let mut seen = std::collections::HashSet::new();
    let mut medications = Vec::new();
    let mut duplicates = Vec::new();
    for med in &record.current_medications {
        if seen.insert(med.active_ingredient.trim().to_lowercase()) {
            let line = format!("{} {} {}", med.active_ingredient, med.dosage, med.frequency);
            medications.push(line.trim().to_string());
        } else {
            duplicates.push(med.active_ingredient.clone());
        }
    }
    if !duplicates.is_empty() {
        warnings.push(duplicate_warning("current_medications", &duplicates));
    }
    if medications.is_empty() {
        parts.push("Medicamentos em uso: Nenhum informado".to_string());
    } else {
        parts.push(format!("Medicamentos em uso: {}", medications.join("; ")));
    }

    let (past, removed) = text::remove_duplicates(&record.past_medical_history);
    if !removed.is_empty() {
        warnings.push(duplicate_warning("past_medical_history", &removed));
    }
    if past.is_empty() {
        parts.push("Antecedentes pessoais: Não informados".to_string());
    } else {
        parts.push(format!("Antecedentes pessoais: {}", past.join("; ")));
    }

    let (family, removed) = text::remove_duplicates(&record.family_history);
    if !removed.is_empty() {
        warnings.push(duplicate_warning("family_history", &removed));
    }
    if !family.is_empty() {
        parts.push(format!("Antecedentes familiares: {}", family.join("; ")));
    }

    if let Some(social) = non_blank(&record.social_history) {
        let social = truncate_field(social, "social_history", limits.social_history, warnings);
        parts.push(format!("História social: {social}"));
    }

    section(SectionCode::Background, parts.join("\n"))
}

fn physical_exam(exam: &str, limits: &TextLimits, warnings: &mut Vec<Warning>) -> Section {
    let exam = truncate_field(exam, "physical_examination", limits.physical_examination, warnings);
    let content = text::normalize_whitespace(&exam);
    section(SectionCode::PhysicalExam, content)
}

/// Context only. Nothing here may read as a clinical conclusion.
fn assessment(
    record: &ConsultationRecord,
    age: Option<i32>,
    limits: &TextLimits,
    warnings: &mut Vec<Warning>,
) -> Section {
    let mut parts = vec![format!(
        "Consulta do tipo {} realizada em {}.",
        consultation_type_label(record.consultation_type).to_lowercase(),
        text::format_date_br(record.consultation_date)
    )];

    match age {
        Some(age) if age < reference::PEDIATRIC_AGE_LIMIT => {
            parts.push(format!("Paciente pediátrico ({age} anos)."));
        }
        Some(age) if age >= reference::ELDERLY_AGE => {
            parts.push(format!("Paciente idoso ({age} anos)."));
        }
        _ => {}
    }

    if record.patient.is_pregnant {
        parts.push(format!(
            "Gestante de {} semanas.",
            gestational_weeks(record.patient.gestational_weeks)
        ));
    }

    let severe = record.allergies.iter().filter(|a| a.severity.is_severe()).count();
    if severe > 0 {
        parts.push(format!("ATENÇÃO: {severe} alergia(s) grave(s) documentada(s)."));
    }

    if let Some(notes) = non_blank(&record.additional_notes) {
        let notes = truncate_field(notes, "additional_notes", limits.additional_notes, warnings);
        parts.push(format!("Observações: {notes}"));
    }

    section(SectionCode::Assessment, parts.join(" "))
}

fn plan_section(plan: &str, limits: &TextLimits, warnings: &mut Vec<Warning>) -> Section {
    let plan = truncate_field(plan, "treatment_plan", limits.treatment_plan, warnings);
    section(SectionCode::Plan, text::normalize_whitespace(&plan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::*;
    use crate::models::{BloodType, WarningLevel};

    fn summarizer() -> RuleBasedSummarizer {
        RuleBasedSummarizer::default().with_reference_date(reference_date())
    }

    fn codes(result: &SummaryResult) -> Vec<SectionCode> {
        result.sections.iter().map(|s| s.code).collect()
    }

    #[test]
    fn minimal_record_has_four_sections_in_order() {
        let result = summarizer().summarize(&minimal_record());
        assert_eq!(result.strategy_used, StrategyUsed::RuleBased);
        assert_eq!(
            codes(&result),
            vec![
                SectionCode::Identification,
                SectionCode::ComplaintHistory,
                SectionCode::Background,
                SectionCode::Assessment,
            ]
        );
        let orders: Vec<u8> = result.sections.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 4, 6]);
    }

    #[test]
    fn complete_record_has_all_sections() {
        let result = summarizer().summarize(&complete_record());
        assert_eq!(result.sections.len(), 7);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn identification_line() {
        let result = summarizer().summarize(&complete_record());
        let id = result.section(SectionCode::Identification).unwrap();
        assert_eq!(
            id.content,
            "Paciente: Maria Silva Santos | CPF: 123.456.789-00 | Nascimento: 15/03/1985 (39 anos) \
             | Sexo biológico: Feminino | Tipo sanguíneo: O+ | Data da consulta: 15/01/2024 \
             | Tipo: Retorno | Local: Hospital São Lucas | Profissional: Dr. João Pedro Oliveira \
             | Registro: CRM-SP 123456 | Especialidade: Clínica Médica"
        );
    }

    #[test]
    fn pregnancy_without_weeks_shows_placeholder() {
        let mut record = minimal_record();
        record.patient.is_pregnant = true;
        record.patient.blood_type = Some(BloodType::ANegative);
        let result = summarizer().summarize(&record);
        let id = result.section(SectionCode::Identification).unwrap();
        assert!(id.content.contains("Tipo sanguíneo: A- | Gestante: ? semanas"));
        let assessment = result.section(SectionCode::Assessment).unwrap();
        assert!(assessment.content.contains("Gestante de ? semanas."));
    }

    #[test]
    fn complaint_and_normalized_hpi() {
        let result = summarizer().summarize(&complete_record());
        let complaint = result.section(SectionCode::ComplaintHistory).unwrap();
        assert_eq!(
            complaint.content,
            "Queixa principal: Dor de cabeça persistente há 3 dias\n\nHDA: Paciente refere cefaleia \
             holocraniana de intensidade moderada (6/10) iniciada há 3 dias. Piora no final do dia."
        );
    }

    #[test]
    fn vital_signs_line_with_bmi() {
        let result = summarizer().summarize(&complete_record());
        let vitals = result.section(SectionCode::VitalSigns).unwrap();
        assert_eq!(
            vitals.content,
            "PA: 118x78 mmHg | FC: 72 bpm | FR: 16 irpm | Tax: 36.5°C | SpO2: 98% | Dor: 3/10 \
             | Peso: 70.0 kg | Altura: 175.0 cm | IMC: 22.9 kg/m²"
        );
    }

    #[test]
    fn single_pressure_value_uses_specific_label() {
        let mut record = minimal_record();
        record.vital_signs = Some(VitalSigns {
            diastolic_bp: Some(70),
            ..Default::default()
        });
        let result = summarizer().summarize(&record);
        assert_eq!(result.section(SectionCode::VitalSigns).unwrap().content, "PAD: 70 mmHg");
    }

    #[test]
    fn empty_vitals_block_omits_section() {
        let mut record = complete_record();
        record.vital_signs = Some(VitalSigns::default());
        let result = summarizer().summarize(&record);
        assert!(result.section(SectionCode::VitalSigns).is_none());
        assert!(result.has_warning("MISSING_VITAL_SIGNS"));
    }

    #[test]
    fn background_for_complete_record() {
        let result = summarizer().summarize(&complete_record());
        let background = result.section(SectionCode::Background).unwrap();
        assert_eq!(
            background.content,
            "⚠️ ALERGIAS: dipirona (moderada) ✓\n\
             Medicamentos em uso: losartana potássica 50mg 1x/day\n\
             Antecedentes pessoais: Hipertensão arterial sistêmica (2018)\n\
             Antecedentes familiares: Mãe: AVC aos 65 anos; Pai: Diabetes tipo 2\n\
             História social: Não tabagista. Etilismo social. Sedentária."
        );
    }

    #[test]
    fn background_defaults_when_empty() {
        let result = summarizer().summarize(&minimal_record());
        let background = result.section(SectionCode::Background).unwrap();
        assert_eq!(
            background.content,
            "Alergias: Não informadas\nMedicamentos em uso: Nenhum informado\nAntecedentes pessoais: Não informados"
        );
    }

    #[test]
    fn medications_deduplicated_case_insensitively() {
        let mut record = complete_record();
        record.current_medications =
            vec![medication("losartana potássica"), medication("Losartana Potássica")];
        let result = summarizer().summarize(&record);

        let background = result.section(SectionCode::Background).unwrap();
        assert_eq!(background.content.matches("otássica").count(), 1);

        let dups: Vec<_> = result.warnings_with_code("DUPLICATE_REMOVED").collect();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].field.as_deref(), Some("current_medications"));
        assert_eq!(dups[0].value.as_deref(), Some("1"));
        assert_eq!(dups[0].level, WarningLevel::Info);
    }

    #[test]
    fn histories_deduplicated_with_one_warning_each() {
        let mut record = complete_record();
        record.past_medical_history = vec!["HAS".into(), "has".into(), "DM2".into()];
        record.family_history = vec!["Mãe: HAS".into(), "mãe: has".into()];
        let result = summarizer().summarize(&record);
        let fields: Vec<_> = result
            .warnings_with_code("DUPLICATE_REMOVED")
            .filter_map(|w| w.field.as_deref())
            .collect();
        assert_eq!(fields, vec!["past_medical_history", "family_history"]);
    }

    #[test]
    fn long_hpi_truncated_to_limit() {
        let mut record = complete_record();
        record.history_present_illness = Some("a".repeat(5000));
        let result = summarizer().summarize(&record);

        let complaint = result.section(SectionCode::ComplaintHistory).unwrap();
        let hpi = complaint.content.split("HDA: ").nth(1).unwrap();
        assert_eq!(hpi.chars().count(), 2000);
        assert!(hpi.ends_with("..."));

        let truncated: Vec<_> = result.warnings_with_code("TEXT_TRUNCATED").collect();
        assert_eq!(truncated.len(), 1);
        assert_eq!(truncated[0].field.as_deref(), Some("history_present_illness"));
        assert_eq!(truncated[0].value.as_deref(), Some("2000"));
    }

    #[test]
    fn social_history_uses_shorter_limit() {
        let mut record = complete_record();
        record.social_history = Some("b".repeat(600));
        let result = summarizer().summarize(&record);
        let w: Vec<_> = result.warnings_with_code("TEXT_TRUNCATED").collect();
        assert_eq!(w.len(), 1);
        assert_eq!(w[0].field.as_deref(), Some("social_history"));
        assert_eq!(w[0].value.as_deref(), Some("500"));
    }

    #[test]
    fn plan_and_exam_normalized() {
        let result = summarizer().summarize(&complete_record());
        assert_eq!(
            result.section(SectionCode::Plan).unwrap().content,
            "1. Orientações sobre higiene do sono\n2. Paracetamol 750mg VO 6/6h se dor\n\n3. Retorno em 7 dias"
        );
        assert_eq!(
            result.section(SectionCode::PhysicalExam).unwrap().content,
            "BEG, corada, hidratada. ACV: RCR 2T BNF sem sopros. AR: MV+ bilateral sem RA."
        );
    }

    #[test]
    fn blank_optional_narratives_omit_sections() {
        let mut record = complete_record();
        record.physical_examination = Some("   ".into());
        record.treatment_plan = Some("\n\t".into());
        let result = summarizer().summarize(&record);
        assert!(result.section(SectionCode::PhysicalExam).is_none());
        assert!(result.section(SectionCode::Plan).is_none());
    }

    #[test]
    fn assessment_context_flags() {
        let mut record = minimal_record();
        record.patient.birth_date = date(1950, 1, 1);
        record.allergies = vec![allergy("penicilina", AllergySeverity::Severe, true)];
        record.additional_notes = Some("Acompanhada pela filha.".into());
        let result = summarizer().summarize(&record);
        assert_eq!(
            result.section(SectionCode::Assessment).unwrap().content,
            "Consulta do tipo primeira consulta realizada em 15/01/2024. Paciente idoso (74 anos). \
             ATENÇÃO: 1 alergia(s) grave(s) documentada(s). Observações: Acompanhada pela filha."
        );
    }

    #[test]
    fn pediatric_flag() {
        let mut record = minimal_record();
        record.patient.birth_date = date(2015, 7, 1);
        let result = summarizer().summarize(&record);
        assert!(result
            .section(SectionCode::Assessment)
            .unwrap()
            .content
            .contains("Paciente pediátrico (8 anos)."));
    }

    #[test]
    fn full_text_headers_in_order() {
        let result = summarizer().summarize(&minimal_record());
        assert!(result.full_text.starts_with("=== IDENTIFICAÇÃO ===\nPaciente: Maria Silva Santos"));
        let headers: Vec<&str> = result
            .full_text
            .lines()
            .filter(|l| l.starts_with("=== "))
            .collect();
        assert_eq!(
            headers,
            vec![
                "=== IDENTIFICAÇÃO ===",
                "=== QUEIXA E HISTÓRIA ===",
                "=== ANTECEDENTES E SEGURANÇA ===",
                "=== AVALIAÇÃO ===",
            ]
        );
        assert!(!result.full_text.ends_with('\n'));
    }

    #[test]
    fn summary_is_deterministic() {
        let s = summarizer();
        let record = complete_record();
        assert_eq!(s.summarize(&record), s.summarize(&record));
    }

    #[test]
    fn oversized_record_hits_global_cap() {
        let limits = TextLimits {
            full_summary: 300,
            ..TextLimits::default()
        };
        let s = RuleBasedSummarizer::new(limits).with_reference_date(reference_date());
        let result = s.summarize(&complete_record());
        assert_eq!(result.full_text.chars().count(), 300);
        let last = result.warnings.last().unwrap();
        assert_eq!(last.field.as_deref(), Some("full_summary"));
    }
}
