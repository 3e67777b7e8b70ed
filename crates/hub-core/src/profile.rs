//! Per-cohort draw probabilities and value ranges.

use std::ops::RangeInclusive;

use hub_contracts::cohort::Cohort;

/// Comorbidity prevalence, in `Comorbidities` field order: hypertension,
/// diabetes, dyslipidaemia, cardiovascular, gastritis, obesity, osteoporosis,
/// gout.
pub const COMORBIDITY_RATES: [f64; 8] = [0.35, 0.2, 0.4, 0.05, 0.1, 0.3, 0.15, 0.05];

/// Tobacco, alcohol and other drugs.
pub const TOXIC_HABIT_RATES: [f64; 3] = [0.3, 0.2, 0.1];

/// Chance that the symptom onset is `2024-01` rather than `2023-06`.
pub const RECENT_ONSET_RATE: f64 = 0.5;

/// Chance of each positive Leeds site at a follow-up.
pub const LEI_SITE_RATE: f64 = 0.15;

pub const ADHERENCE_RATE: f64 = 0.6;
pub const ADJUSTMENT_RATE: f64 = 0.3;

/// Chance that a follow-up keeps the current treatment.
pub const CONTINUE_RATE: f64 = 0.6;

/// Morning-stiffness text recorded at the first visit.
pub const MORNING_STIFFNESS: &str = "30";
pub const STIFFNESS_DURATION: &str = "45";

pub const SYSTOLIC_MM_HG: RangeInclusive<u32> = 110..=140;
pub const DIASTOLIC_MM_HG: RangeInclusive<u32> = 70..=90;

/// Days from a visit to its scheduled review.
pub const REVIEW_INTERVAL_DAYS: u64 = 180;

/// Probabilities and ranges that differ between the two cohorts.
#[derive(Debug)]
pub struct CohortProfile {
    /// Chance of a positive HLA-B27.
    pub hla_b27: f64,
    /// Rheumatoid factor and anti-CCP, for cohorts that record them.
    pub serology: Option<[f64; 2]>,
    /// Scalp, nail, extensor, folds and palmoplantar involvement.
    pub psoriasis_areas: Option<[f64; 5]>,
    /// Chance that psoriasis started `2023-06` rather than `2022-12`.
    pub psoriasis_onset: Option<f64>,
    pub axial_pain: f64,
    pub buttock_radiation: f64,
    pub axial_involvement: f64,
    /// Digestive, uveitis and psoriasis extra-articular involvement.
    pub extra_articular: [f64; 3],
    /// Right side (Achilles, plantar fascia, lateral and medial epicondyle,
    /// greater trochanter), then left side, then other sites.
    pub enthesitis: [f64; 11],
    pub weight_kg: RangeInclusive<u32>,
    pub height_cm: RangeInclusive<u32>,
}

static ESPA: CohortProfile = CohortProfile {
    hla_b27: 0.8,
    serology: None,
    psoriasis_areas: None,
    psoriasis_onset: None,
    axial_pain: 0.4,
    buttock_radiation: 0.6,
    axial_involvement: 0.7,
    extra_articular: [0.1, 0.15, 0.0],
    enthesitis: [0.2, 0.15, 0.1, 0.08, 0.05, 0.2, 0.15, 0.1, 0.08, 0.05, 0.1],
    weight_kg: 60..=95,
    height_cm: 160..=185,
};

static APS: CohortProfile = CohortProfile {
    hla_b27: 0.3,
    serology: Some([0.3, 0.4]),
    psoriasis_areas: Some([0.7, 0.4, 0.6, 0.3, 0.2]),
    psoriasis_onset: Some(0.7),
    axial_pain: 0.3,
    buttock_radiation: 0.4,
    axial_involvement: 0.5,
    extra_articular: [0.1, 0.05, 0.2],
    enthesitis: [0.2, 0.15, 0.15, 0.1, 0.08, 0.2, 0.15, 0.15, 0.1, 0.08, 0.1],
    weight_kg: 55..=95,
    height_cm: 155..=185,
};

pub fn profile(cohort: Cohort) -> &'static CohortProfile {
    match cohort {
        Cohort::Espa => &ESPA,
        Cohort::Aps => &APS,
    }
}
