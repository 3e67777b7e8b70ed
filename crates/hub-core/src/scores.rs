//! Standard score formulas and activity cut-offs.
//!
//! These compute composite columns from their inputs. The generator uses them
//! so that a composite always agrees with the sub-scores on the same row; they
//! are public so callers can score hand-entered data the same way.

use serde::{Deserialize, Serialize};

use crate::indices::round_to;

// ── BASDAI ───────────────────────────────────────────────────────────────────

/// Mean of the six BASDAI questions, one decimal. This is the composite the
/// generator writes to `BASDAI_Result`.
pub fn basdai_mean(questions: &[u8; 6]) -> f64 {
    let sum: u32 = questions.iter().map(|q| u32::from(*q)).sum();
    round_to(f64::from(sum) / 6.0, 1)
}

/// Standard BASDAI on 0-10 answers, with question 6 given in hours of
/// morning stiffness (two hours or more scores 10). Two decimals.
pub fn basdai_standard(q1: f64, q2: f64, q3: f64, q4: f64, q5: f64, q6_hours: f64) -> f64 {
    let q6 = (q6_hours / 2.0 * 10.0).min(10.0);
    round_to((q1 + q2 + q3 + q4 + (q5 + q6) / 2.0) / 5.0, 2)
}

// ── ASDAS ────────────────────────────────────────────────────────────────────

/// ASDAS inputs: back pain, stiffness duration and patient global on 0-10,
/// plus the swollen joint count.
#[derive(Debug, Clone, Copy)]
pub struct AsdasInputs {
    pub back_pain: f64,
    pub stiffness: f64,
    pub patient_global: f64,
    pub swollen: usize,
}

/// ASDAS with C-reactive protein in mg/L. Two decimals.
pub fn asdas_crp(inputs: &AsdasInputs, crp: f64) -> f64 {
    round_to(
        0.121 * inputs.back_pain
            + 0.058 * inputs.stiffness
            + 0.110 * inputs.patient_global
            + 0.073 * inputs.swollen as f64
            + 0.579 * (crp + 1.0).ln(),
        2,
    )
}

/// ASDAS with erythrocyte sedimentation rate in mm/h. Two decimals.
pub fn asdas_esr(inputs: &AsdasInputs, esr: u32) -> f64 {
    round_to(
        0.08 * inputs.back_pain
            + 0.07 * inputs.stiffness
            + 0.11 * inputs.patient_global
            + 0.09 * inputs.swollen as f64
            + 0.29 * f64::from(esr).sqrt(),
        2,
    )
}

// ── HAQ-DI, LEI, RAPID3 ──────────────────────────────────────────────────────

/// HAQ-DI: mean of the eight category scores, two decimals. A category whose
/// flag in `uses_aids` is set counts as at least 2.
pub fn haq_di(categories: &[f64; 8], uses_aids: &[bool; 8]) -> f64 {
    let sum: f64 = categories
        .iter()
        .zip(uses_aids)
        .map(|(score, aided)| if *aided { score.max(2.0) } else { *score })
        .sum();
    round_to(sum / 8.0, 2)
}

/// Leeds Enthesitis Index: count of positive sites.
pub fn lei(sites: &[u8; 6]) -> u8 {
    sites.iter().filter(|s| **s > 0).count() as u8
}

/// RAPID3 components, each on 0-10.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rapid3Parts {
    pub function: f64,
    pub pain: f64,
    pub global: f64,
    pub score: f64,
}

/// RAPID3 from HAQ-DI, pain and patient global. Function is HAQ scaled to
/// 0-10; the score is the sum of the three, one decimal.
pub fn rapid3(haq: f64, pain: f64, global: f64) -> Rapid3Parts {
    let function = round_to(haq * 3.33, 1);
    Rapid3Parts {
        function,
        pain,
        global,
        score: round_to(function + pain + global, 1),
    }
}

// ── MDA ──────────────────────────────────────────────────────────────────────

/// Inputs to the Minimal Disease Activity criteria. Pain and global are in
/// millimetres on a 0-100 scale.
#[derive(Debug, Clone, Copy)]
pub struct MdaInputs {
    pub tender: usize,
    pub swollen: usize,
    pub pasi: f64,
    pub bsa: f64,
    pub lei: u8,
    pub pain_mm: f64,
    pub global_mm: f64,
    pub haq: f64,
}

/// Number of MDA criteria met, out of seven.
pub fn mda_criteria(inputs: &MdaInputs) -> usize {
    [
        inputs.tender <= 1,
        inputs.swollen <= 1,
        inputs.pasi <= 1.0 || inputs.bsa <= 3.0,
        inputs.lei <= 1,
        inputs.pain_mm <= 15.0,
        inputs.global_mm <= 20.0,
        inputs.haq <= 0.5,
    ]
    .iter()
    .filter(|met| **met)
    .count()
}

/// MDA is met when at least five of the seven criteria hold.
pub fn mda_met(inputs: &MdaInputs) -> bool {
    mda_criteria(inputs) >= 5
}

// ── BMI ──────────────────────────────────────────────────────────────────────

/// Body-mass index, one decimal.
pub fn bmi(weight_kg: u32, height_cm: u32) -> f64 {
    let height_m = f64::from(height_cm) / 100.0;
    round_to(f64::from(weight_kg) / (height_m * height_m), 1)
}

// ── Activity categories ──────────────────────────────────────────────────────

/// Four-step activity scale shared by every score. For HAQ-DI the steps read
/// remission, mild, moderate and severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Remission,
    Low,
    Moderate,
    High,
}

impl ActivityCategory {
    pub fn label(self) -> &'static str {
        match self {
            ActivityCategory::Remission => "Remisión",
            ActivityCategory::Low => "Baja Actividad",
            ActivityCategory::Moderate => "Actividad Moderada",
            ActivityCategory::High => "Actividad Alta",
        }
    }
}

/// BASDAI has no remission band: below 4 is low activity.
pub fn basdai_category(value: f64) -> ActivityCategory {
    if value < 4.0 {
        ActivityCategory::Low
    } else if value < 6.0 {
        ActivityCategory::Moderate
    } else {
        ActivityCategory::High
    }
}

pub fn asdas_category(value: f64) -> ActivityCategory {
    if value < 1.3 {
        ActivityCategory::Remission
    } else if value < 2.1 {
        ActivityCategory::Low
    } else if value < 3.5 {
        ActivityCategory::Moderate
    } else {
        ActivityCategory::High
    }
}

pub fn haq_category(value: f64) -> ActivityCategory {
    if value < 0.5 {
        ActivityCategory::Remission
    } else if value < 1.5 {
        ActivityCategory::Low
    } else if value < 2.0 {
        ActivityCategory::Moderate
    } else {
        ActivityCategory::High
    }
}

/// RAPID3 bands are closed on the right: 3 is still remission.
pub fn rapid3_category(value: f64) -> ActivityCategory {
    if value <= 3.0 {
        ActivityCategory::Remission
    } else if value <= 6.0 {
        ActivityCategory::Low
    } else if value <= 12.0 {
        ActivityCategory::Moderate
    } else {
        ActivityCategory::High
    }
}

/// LEI bands: up to one site is remission, up to three low, up to five
/// moderate.
pub fn lei_category(value: u8) -> ActivityCategory {
    match value {
        0..=1 => ActivityCategory::Remission,
        2..=3 => ActivityCategory::Low,
        4..=5 => ActivityCategory::Moderate,
        _ => ActivityCategory::High,
    }
}

/// Patient-global VAS on 0-10.
pub fn global_vas_category(value: f64) -> ActivityCategory {
    vas_category(value, 2.0, 4.0)
}

/// Pain VAS on 0-10. Pain reaches the mild band sooner than global.
pub fn pain_vas_category(value: f64) -> ActivityCategory {
    vas_category(value, 1.0, 3.0)
}

fn vas_category(value: f64, remission: f64, mild: f64) -> ActivityCategory {
    if value < remission {
        ActivityCategory::Remission
    } else if value < mild {
        ActivityCategory::Low
    } else if value < 6.0 {
        ActivityCategory::Moderate
    } else {
        ActivityCategory::High
    }
}
