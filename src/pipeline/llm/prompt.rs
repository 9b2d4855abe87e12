use chrono::NaiveDate;
use serde::Serialize;

use crate::models::ConsultationRecord;

use super::LlmError;

pub const SUMMARY_SYSTEM_PROMPT: &str = r#"Você é um assistente de documentação médica. Sua função é APENAS reorganizar e formatar dados clínicos fornecidos.

REGRAS OBRIGATÓRIAS - VIOLAÇÃO RESULTA EM REJEIÇÃO:

1. NUNCA inferir, sugerir ou mencionar diagnósticos
2. NUNCA usar termos como: "diagnóstico", "suspeita de", "sugere", "indica", "compatível com", "provável", "possível"
3. NUNCA criar hipóteses diagnósticas
4. NUNCA inventar dados não fornecidos
5. NUNCA adicionar interpretações clínicas
6. APENAS reorganizar os dados EXATAMENTE como fornecidos
7. APENAS formatar e estruturar as informações

Você deve retornar um JSON com a seguinte estrutura:
{
  "sections": [
    {"title": "string", "code": "string", "content": "string", "order": number}
  ]
}

Seções esperadas (em ordem):
1. identification - Identificação do paciente
2. complaint_history - Queixa e história
3. vital_signs - Sinais vitais (se fornecidos)
4. background - Antecedentes e segurança
5. physical_exam - Exame físico (se fornecido)
6. assessment - Avaliação (APENAS contexto, SEM diagnóstico)
7. plan - Plano (se fornecido)

IMPORTANTE: A seção "assessment" deve conter APENAS um resumo do contexto da consulta, NUNCA diagnósticos ou hipóteses."#;

// Portuguese keys keep the payload in the same language as the instructions.

#[derive(Serialize)]
struct PromptPayload<'a> {
    paciente: PatientPayload<'a>,
    consulta: EncounterPayload<'a>,
    queixa_principal: &'a str,
    historia_doenca_atual: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sinais_vitais: Option<VitalsPayload>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    medicamentos: Vec<MedicationPayload<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    alergias: Vec<AllergyPayload<'a>>,
    antecedentes_pessoais: &'a [String],
    antecedentes_familiares: &'a [String],
    historia_social: Option<&'a str>,
    exame_fisico: Option<&'a str>,
    plano_tratamento: Option<&'a str>,
    observacoes: Option<&'a str>,
}

#[derive(Serialize)]
struct PatientPayload<'a> {
    nome: &'a str,
    cpf: String,
    data_nascimento: NaiveDate,
    sexo_biologico: &'static str,
    tipo_sanguineo: Option<&'static str>,
    gestante: bool,
    semanas_gestacionais: Option<u32>,
}

#[derive(Serialize)]
struct EncounterPayload<'a> {
    data: NaiveDate,
    tipo: &'static str,
    local: Option<&'a str>,
    profissional: &'a str,
    registro: Option<&'a str>,
    especialidade: Option<&'a str>,
}

#[derive(Serialize)]
struct VitalsPayload {
    pa_sistolica: Option<i32>,
    pa_diastolica: Option<i32>,
    frequencia_cardiaca: Option<i32>,
    frequencia_respiratoria: Option<i32>,
    temperatura: Option<f64>,
    saturacao_o2: Option<i32>,
    escala_dor: Option<i32>,
    peso_kg: Option<f64>,
    altura_cm: Option<f64>,
}

#[derive(Serialize)]
struct MedicationPayload<'a> {
    principio_ativo: &'a str,
    dosagem: &'a str,
    frequencia: &'static str,
    via: &'static str,
}

#[derive(Serialize)]
struct AllergyPayload<'a> {
    alergeno: &'a str,
    tipo: &'static str,
    gravidade: &'static str,
    confirmada: bool,
}

fn payload(record: &ConsultationRecord) -> PromptPayload<'_> {
    let patient = &record.patient;
    PromptPayload {
        paciente: PatientPayload {
            nome: &patient.full_name,
            cpf: crate::text::mask_cpf(&patient.cpf),
            data_nascimento: patient.birth_date,
            sexo_biologico: patient.biological_sex.as_str(),
            tipo_sanguineo: patient.blood_type.map(|b| b.as_str()),
            gestante: patient.is_pregnant,
            semanas_gestacionais: patient.gestational_weeks,
        },
        consulta: EncounterPayload {
            data: record.consultation_date,
            tipo: record.consultation_type.as_str(),
            local: record.facility_name.as_deref(),
            profissional: &record.professional_name,
            registro: record.professional_council_id.as_deref(),
            especialidade: record.specialty.as_deref(),
        },
        queixa_principal: &record.chief_complaint,
        historia_doenca_atual: record.history_present_illness.as_deref(),
        sinais_vitais: record.vitals().map(|v| VitalsPayload {
            pa_sistolica: v.systolic_bp,
            pa_diastolica: v.diastolic_bp,
            frequencia_cardiaca: v.heart_rate,
            frequencia_respiratoria: v.respiratory_rate,
            temperatura: v.temperature_celsius,
            saturacao_o2: v.oxygen_saturation,
            escala_dor: v.pain_scale,
            peso_kg: v.weight_kg,
            altura_cm: v.height_cm,
        }),
        medicamentos: record
            .current_medications
            .iter()
            .map(|m| MedicationPayload {
                principio_ativo: &m.active_ingredient,
                dosagem: &m.dosage,
                frequencia: m.frequency.as_str(),
                via: m.route.as_str(),
            })
            .collect(),
        alergias: record
            .allergies
            .iter()
            .map(|a| AllergyPayload {
                alergeno: &a.allergen,
                tipo: a.reaction_type.as_str(),
                gravidade: a.severity.as_str(),
                confirmada: a.confirmed,
            })
            .collect(),
        antecedentes_pessoais: &record.past_medical_history,
        antecedentes_familiares: &record.family_history,
        historia_social: record.social_history.as_deref(),
        exame_fisico: record.physical_examination.as_deref(),
        plano_tratamento: record.treatment_plan.as_deref(),
        observacoes: record.additional_notes.as_deref(),
    }
}

/// Build the user prompt: instructions plus the full record as pretty JSON.
/// The CPF is masked before it leaves the process.
pub fn build_summary_prompt(record: &ConsultationRecord) -> Result<String, LlmError> {
    let data = serde_json::to_string_pretty(&payload(record))
        .map_err(|e| LlmError::JsonParsing(format!("prompt payload: {e}")))?;

    Ok(format!(
        "Reorganize os seguintes dados de consulta médica em um resumo estruturado.

LEMBRE-SE: Apenas reorganize os dados. NÃO faça inferências ou diagnósticos.

DADOS DA CONSULTA:
{data}

Retorne APENAS o JSON com as seções, sem texto adicional."
    ))
}
