//! The typed visit record.
//!
//! A `Visit` holds one named field per logical column group. Groups that do
//! not apply to a given cohort or visit kind are `None`; they become empty
//! cells when the record is flattened at the workbook boundary.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    cohort::{Cohort, Flag, Serology, Sex, VisitKind},
    patient::{Comorbidities, PatientId, PsoriasisAreas, Regimen},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitIdentity {
    pub patient_id: PatientId,
    pub name: String,
    pub sex: Sex,
    pub date: NaiveDate,
    pub kind: VisitKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub clinician: String,
    pub primary: Cohort,
    pub hla_b27: Serology,
    pub rheumatoid_factor: Option<Flag>,
    pub anti_ccp: Option<Flag>,
}

/// Baseline history taken at the first visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anamnesis {
    /// Year-month of symptom onset, e.g. `2023-06`.
    pub symptom_onset: String,
    pub psoriasis_onset: Option<String>,
    pub axial_pain: Flag,
    pub morning_stiffness: String,
    pub stiffness_duration: String,
    pub buttock_radiation: Flag,
    pub axial_involvement: Flag,
}

/// Examined joints, as indices into `JOINT_SITES`.
///
/// `tender` is always a subset of `swollen`. The swollen set fills the
/// `NAD_*` columns and the tender set fills the `NAT_*` columns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JointExam {
    pub swollen: BTreeSet<usize>,
    pub tender: BTreeSet<usize>,
}

/// Digits with dactylitis, as indices into `DIGIT_SITES`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DigitExam {
    pub affected: BTreeSet<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anthropometrics {
    pub weight_kg: u32,
    pub height_cm: u32,
    pub bmi: f64,
    pub systolic: u32,
    pub diastolic: u32,
}

impl Anthropometrics {
    /// Blood pressure as written to `TA`, e.g. `125/80`.
    pub fn blood_pressure(&self) -> String {
        format!("{}/{}", self.systolic, self.diastolic)
    }
}

/// Patient-reported outcomes on 0-10 visual analogue scales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientReported {
    pub global: f64,
    pub pain: f64,
    pub fatigue: f64,
    pub morning_stiffness_min: u32,
    pub night_pain: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraArticular {
    pub digestive: Flag,
    pub uveitis: Flag,
    pub psoriasis: Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToxicHabits {
    pub tobacco: Flag,
    pub alcohol: Flag,
    pub drugs: Flag,
}

/// Enthesitis sites: Achilles, plantar fascia, lateral epicondyle, medial
/// epicondyle and greater trochanter on the right, then the same on the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enthesitis {
    pub right: [Flag; 5],
    pub left: [Flag; 5],
    pub other: Flag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Labs {
    /// C-reactive protein, mg/L.
    pub crp: f64,
    /// Erythrocyte sedimentation rate, mm/h.
    pub esr: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Basdai {
    /// Six questions scored 1-7.
    pub questions: [u8; 6],
    pub result: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asdas {
    pub back_pain: f64,
    pub stiffness: f64,
    pub patient_global: f64,
    pub crp_result: f64,
    pub esr_result: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrology {
    pub schober_cm: f64,
    pub cervical_rotation_deg: u32,
    pub occiput_wall_cm: f64,
    pub tragus_wall_cm: f64,
    pub chest_expansion_cm: f64,
    pub intermalleolar_cm: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasiAssessment {
    pub score: u32,
    pub bsa_percentage: f64,
    pub description: String,
}

/// HAQ-DI: eight category scores in `[0, 3]` and their mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Haq {
    pub categories: [f64; 8],
    pub total: f64,
}

/// Leeds Enthesitis Index: six sites scored 0/1 and their sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lei {
    pub sites: [u8; 6],
    pub score: u8,
}

/// Minimal Disease Activity inputs and outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mda {
    pub tender: usize,
    pub swollen: usize,
    pub pasi: u32,
    pub pain_mm: f64,
    pub global_mm: f64,
    pub haq: f64,
    pub enthesitis: u8,
    pub met: Flag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rapid3 {
    pub function: f64,
    pub pain: f64,
    pub global: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentStatus {
    pub current: String,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continuation {
    pub adherence: Flag,
    pub adjustment: Flag,
}

/// Decision recorded at the end of a follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TherapeuticDecision {
    Continue,
    IncreaseDose,
    Switch,
}

impl TherapeuticDecision {
    pub fn label(self) -> &'static str {
        match self {
            TherapeuticDecision::Continue => "CONTINUAR",
            TherapeuticDecision::IncreaseDose => "AUMENTAR_DOSIS",
            TherapeuticDecision::Switch => "CAMBIAR",
        }
    }
}

/// One row of a cohort sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub identity: VisitIdentity,
    pub diagnosis: Diagnosis,
    pub anamnesis: Option<Anamnesis>,
    pub joints: JointExam,
    pub dactylitis: DigitExam,
    pub anthropometrics: Anthropometrics,
    pub patient_reported: Option<PatientReported>,
    pub psoriasis_areas: Option<PsoriasisAreas>,
    pub extra_articular: ExtraArticular,
    pub comorbidities: Comorbidities,
    pub toxic_habits: Option<ToxicHabits>,
    pub enthesitis: Option<Enthesitis>,
    pub labs: Option<Labs>,
    pub basdai: Option<Basdai>,
    pub asdas: Option<Asdas>,
    pub metrology: Option<Metrology>,
    pub pasi: Option<PasiAssessment>,
    pub haq: Option<Haq>,
    pub lei: Option<Lei>,
    pub mda: Option<Mda>,
    pub rapid3: Option<Rapid3>,
    pub treatment: TreatmentStatus,
    pub continuation: Option<Continuation>,
    pub follow_up_decision: Option<TherapeuticDecision>,
    pub initial_treatment: Option<Regimen>,
    pub next_review: NaiveDate,
}

impl Visit {
    pub fn kind(&self) -> VisitKind {
        self.identity.kind
    }

    pub fn cohort(&self) -> Cohort {
        self.identity.patient_id.cohort
    }
}
