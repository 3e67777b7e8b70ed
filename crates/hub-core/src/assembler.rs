//! The visit assembler.
//!
//! One function builds every visit. Which optional field groups it fills is
//! decided by a strategy table keyed on `(cohort, visit kind)`; groups left
//! out of the table stay `None` and are written as empty cells.
//!
//! Follow-ups derive their patient-reported and composite columns from a
//! single base index (disease activity for ESPA, functional disability for
//! APS), so the columns of one row stay consistent with each other.

use std::ops::RangeInclusive;

use chrono::NaiveDate;
use rand::Rng;
use rand_distr::Distribution;

use hub_contracts::{
    cohort::{Cohort, Flag, VisitKind},
    error::HubResult,
    patient::{BaselineMarkers, Patient},
    schema::FieldGroup,
    visit::{
        Anamnesis, Anthropometrics, Asdas, Basdai, Continuation, Diagnosis, Enthesitis,
        ExtraArticular, Haq, JointExam, Labs, Lei, Mda, Metrology, PasiAssessment,
        PatientReported, Rapid3, TherapeuticDecision, ToxicHabits, TreatmentStatus, Visit,
        VisitIdentity,
    },
};

use crate::{
    indices::{self, round_to},
    patient::add_days,
    profile::{self, profile, CohortProfile},
    sampling::{flag, flags, pick, sample_dactylitis, sample_joints},
    scores::{self, AsdasInputs, MdaInputs},
};

// ── Strategy table ───────────────────────────────────────────────────────────

/// Groups filled on every visit of every cohort.
pub const ALWAYS_ACTIVE: [FieldGroup; 11] = [
    FieldGroup::Identification,
    FieldGroup::Diagnosis,
    FieldGroup::SwollenJoints,
    FieldGroup::TenderJoints,
    FieldGroup::Dactylitis,
    FieldGroup::Totals,
    FieldGroup::Anthropometrics,
    FieldGroup::ExtraArticular,
    FieldGroup::Comorbidities,
    FieldGroup::Treatment,
    FieldGroup::Scheduling,
];

/// Optional groups filled for `cohort` on a visit of `kind`.
pub fn active_groups(cohort: Cohort, kind: VisitKind) -> &'static [FieldGroup] {
    match (cohort, kind) {
        (Cohort::Espa, VisitKind::FirstVisit) => &[
            FieldGroup::Anamnesis,
            FieldGroup::ToxicHabits,
            FieldGroup::Enthesitis,
            FieldGroup::InitialTreatment,
        ],
        (Cohort::Espa, VisitKind::FollowUp) => &[
            FieldGroup::PatientReported,
            FieldGroup::Labs,
            FieldGroup::Basdai,
            FieldGroup::Asdas,
            FieldGroup::Metrology,
            FieldGroup::Continuation,
            FieldGroup::FollowUpDecision,
        ],
        (Cohort::Aps, VisitKind::FirstVisit) => &[
            FieldGroup::Anamnesis,
            FieldGroup::PsoriasisAreas,
            FieldGroup::ToxicHabits,
            FieldGroup::Enthesitis,
            FieldGroup::Pasi,
            FieldGroup::InitialTreatment,
        ],
        (Cohort::Aps, VisitKind::FollowUp) => &[
            FieldGroup::PatientReported,
            FieldGroup::Labs,
            FieldGroup::Pasi,
            FieldGroup::Haq,
            FieldGroup::Lei,
            FieldGroup::Mda,
            FieldGroup::Rapid3,
            FieldGroup::Continuation,
            FieldGroup::FollowUpDecision,
        ],
    }
}

pub fn is_active(cohort: Cohort, kind: VisitKind, group: FieldGroup) -> bool {
    ALWAYS_ACTIVE.contains(&group) || active_groups(cohort, kind).contains(&group)
}

/// Groups that are never filled for `cohort`, whatever the visit kind.
pub fn never_active(cohort: Cohort) -> Vec<FieldGroup> {
    FieldGroup::ALL
        .into_iter()
        .filter(|g| {
            !is_active(cohort, VisitKind::FirstVisit, *g)
                && !is_active(cohort, VisitKind::FollowUp, *g)
        })
        .collect()
}

/// Groups that `cohort` fills on follow-ups but leaves empty on first visits.
pub fn follow_up_only(cohort: Cohort) -> Vec<FieldGroup> {
    FieldGroup::ALL
        .into_iter()
        .filter(|g| {
            !is_active(cohort, VisitKind::FirstVisit, *g)
                && is_active(cohort, VisitKind::FollowUp, *g)
        })
        .collect()
}

// ── Derivation constants ─────────────────────────────────────────────────────

const VAS: RangeInclusive<f64> = 0.0..=10.0;
const BASDAI_QUESTION: RangeInclusive<f64> = 1.0..=7.0;
const HAQ_CATEGORY: RangeInclusive<f64> = 0.0..=3.0;

/// Ratio of each BASDAI question to the disease-activity index.
pub const BASDAI_RATIOS: [f64; 6] = [1.0, 0.9, 1.1, 0.8, 1.0, 0.7];
pub const BASDAI_JITTER: f64 = 1.0;

/// Ratio of each HAQ category to the functional-disability index.
pub const HAQ_RATIOS: [f64; 8] = [1.0, 0.9, 1.1, 0.8, 0.95, 1.05, 0.85, 1.15];
pub const HAQ_JITTER: f64 = 0.15;

/// Jitter on patient-reported and ASDAS sub-scores.
pub const SUBSCORE_JITTER: f64 = 0.3;

/// Body-surface-area percentage per swollen joint.
const BSA_PER_JOINT_FIRST: f64 = 2.0;
const BSA_PER_JOINT_FOLLOW_UP: f64 = 1.5;

// ── Assembly ─────────────────────────────────────────────────────────────────

/// What kind of visit to build, and when.
#[derive(Debug, Clone, Copy)]
pub struct VisitPlan {
    pub kind: VisitKind,
    pub date: NaiveDate,
    /// Upper bound on the swollen-joint count for this cohort.
    pub max_swollen: usize,
}

/// Build one visit of `patient` according to `plan`.
pub fn assemble_visit<R: Rng + ?Sized>(
    rng: &mut R,
    patient: &Patient,
    plan: &VisitPlan,
) -> HubResult<Visit> {
    let cohort = patient.cohort();
    let kind = plan.kind;
    let rates = profile(cohort);
    let active = |group: FieldGroup| is_active(cohort, kind, group);

    let identity = VisitIdentity {
        patient_id: patient.id().clone(),
        name: patient.name().to_string(),
        sex: patient.sex(),
        date: plan.date,
        kind,
    };
    let diagnosis = build_diagnosis(patient);
    let anamnesis = if active(FieldGroup::Anamnesis) {
        Some(draw_anamnesis(rng, rates))
    } else {
        None
    };

    let joints = sample_joints(rng, plan.max_swollen)?;
    let dactylitis = sample_dactylitis(rng);
    let anthropometrics = draw_anthropometrics(rng, rates);

    // The base index every derived follow-up column hangs off.
    let base = match kind {
        VisitKind::FirstVisit => None,
        VisitKind::FollowUp => Some(match cohort {
            Cohort::Espa => indices::disease_activity(rng, true)?,
            Cohort::Aps => indices::functional_disability(rng, true)?,
        }),
    };

    let patient_reported = match base {
        Some(base) if active(FieldGroup::PatientReported) => {
            Some(draw_patient_reported(rng, cohort, base))
        }
        _ => None,
    };

    let psoriasis_areas = match patient.markers() {
        BaselineMarkers::Psoriatic { psoriasis, .. } if active(FieldGroup::PsoriasisAreas) => {
            Some(*psoriasis)
        }
        _ => None,
    };

    let [digestive, uveitis, psoriasis] = flags(rng, &rates.extra_articular);
    let extra_articular = ExtraArticular {
        digestive,
        uveitis,
        psoriasis,
    };

    let toxic_habits = if active(FieldGroup::ToxicHabits) {
        let [tobacco, alcohol, drugs] = flags(rng, &profile::TOXIC_HABIT_RATES);
        Some(ToxicHabits {
            tobacco,
            alcohol,
            drugs,
        })
    } else {
        None
    };

    let enthesitis = if active(FieldGroup::Enthesitis) {
        let [r0, r1, r2, r3, r4, l0, l1, l2, l3, l4, other] = flags(rng, &rates.enthesitis);
        Some(Enthesitis {
            right: [r0, r1, r2, r3, r4],
            left: [l0, l1, l2, l3, l4],
            other,
        })
    } else {
        None
    };

    let labs = if active(FieldGroup::Labs) {
        Some(draw_labs(rng)?)
    } else {
        None
    };

    let basdai = match base {
        Some(base) if active(FieldGroup::Basdai) => Some(draw_basdai(rng, base)),
        _ => None,
    };

    let asdas = match (base, &patient_reported, &labs) {
        (Some(base), Some(reported), Some(labs)) if active(FieldGroup::Asdas) => {
            Some(draw_asdas(rng, base, reported, labs, &joints))
        }
        _ => None,
    };

    let metrology = if active(FieldGroup::Metrology) {
        Some(draw_metrology(rng))
    } else {
        None
    };

    let pasi = if active(FieldGroup::Pasi) {
        Some(draw_pasi(rng, kind, &joints))
    } else {
        None
    };

    let haq = match base {
        Some(base) if active(FieldGroup::Haq) => Some(draw_haq(rng, base)),
        _ => None,
    };

    let lei = if active(FieldGroup::Lei) {
        let mut sites = [0u8; 6];
        for site in sites.iter_mut() {
            *site = u8::from(flag(rng, profile::LEI_SITE_RATE).is_yes());
        }
        Some(Lei {
            sites,
            score: scores::lei(&sites),
        })
    } else {
        None
    };

    let rapid3 = match (&haq, &patient_reported) {
        (Some(haq), Some(reported)) if active(FieldGroup::Rapid3) => {
            let parts = scores::rapid3(haq.total, reported.pain, reported.global);
            Some(Rapid3 {
                function: parts.function,
                pain: parts.pain,
                global: parts.global,
                score: parts.score,
            })
        }
        _ => None,
    };

    let mda = match (&haq, &patient_reported, &pasi, &lei) {
        (Some(haq), Some(reported), Some(pasi), Some(lei)) if active(FieldGroup::Mda) => {
            Some(score_mda(&joints, haq, reported, pasi, lei))
        }
        _ => None,
    };

    let treatment = TreatmentStatus {
        current: patient.current_treatment().to_string(),
        start_date: patient.treatment_start(),
    };

    let continuation = if active(FieldGroup::Continuation) {
        Some(Continuation {
            adherence: flag(rng, profile::ADHERENCE_RATE),
            adjustment: flag(rng, profile::ADJUSTMENT_RATE),
        })
    } else {
        None
    };

    let follow_up_decision = if active(FieldGroup::FollowUpDecision) {
        Some(draw_decision(rng)?)
    } else {
        None
    };

    let initial_treatment = if active(FieldGroup::InitialTreatment) {
        Some(patient.regimen().clone())
    } else {
        None
    };

    Ok(Visit {
        identity,
        diagnosis,
        anamnesis,
        joints,
        dactylitis,
        anthropometrics,
        patient_reported,
        psoriasis_areas,
        extra_articular,
        comorbidities: *patient.comorbidities(),
        toxic_habits,
        enthesitis,
        labs,
        basdai,
        asdas,
        metrology,
        pasi,
        haq,
        lei,
        mda,
        rapid3,
        treatment,
        continuation,
        follow_up_decision,
        initial_treatment,
        next_review: add_days(plan.date, profile::REVIEW_INTERVAL_DAYS)?,
    })
}

// ── Group builders ───────────────────────────────────────────────────────────

fn build_diagnosis(patient: &Patient) -> Diagnosis {
    let (rheumatoid_factor, anti_ccp) = match patient.markers() {
        BaselineMarkers::Psoriatic {
            rheumatoid_factor,
            anti_ccp,
            ..
        } => (Some(*rheumatoid_factor), Some(*anti_ccp)),
        BaselineMarkers::Axial { .. } => (None, None),
    };
    Diagnosis {
        clinician: patient.clinician().to_string(),
        primary: patient.cohort(),
        hla_b27: patient.markers().hla_b27(),
        rheumatoid_factor,
        anti_ccp,
    }
}

fn draw_anamnesis<R: Rng + ?Sized>(rng: &mut R, rates: &CohortProfile) -> Anamnesis {
    let symptom_onset = if rng.random_bool(profile::RECENT_ONSET_RATE) {
        "2024-01"
    } else {
        "2023-06"
    };
    let psoriasis_onset = rates
        .psoriasis_onset
        .map(|p| if rng.random_bool(p) { "2023-06" } else { "2022-12" }.to_string());
    Anamnesis {
        symptom_onset: symptom_onset.to_string(),
        psoriasis_onset,
        axial_pain: flag(rng, rates.axial_pain),
        morning_stiffness: profile::MORNING_STIFFNESS.to_string(),
        stiffness_duration: profile::STIFFNESS_DURATION.to_string(),
        buttock_radiation: flag(rng, rates.buttock_radiation),
        axial_involvement: flag(rng, rates.axial_involvement),
    }
}

fn draw_anthropometrics<R: Rng + ?Sized>(rng: &mut R, rates: &CohortProfile) -> Anthropometrics {
    let weight_kg = rng.random_range(rates.weight_kg.clone());
    let height_cm = rng.random_range(rates.height_cm.clone());
    Anthropometrics {
        weight_kg,
        height_cm,
        bmi: scores::bmi(weight_kg, height_cm),
        systolic: rng.random_range(profile::SYSTOLIC_MM_HG),
        diastolic: rng.random_range(profile::DIASTOLIC_MM_HG),
    }
}

fn draw_patient_reported<R: Rng + ?Sized>(rng: &mut R, cohort: Cohort, base: f64) -> PatientReported {
    let (global, pain, fatigue) = match cohort {
        Cohort::Espa => (
            base,
            indices::derive(rng, base, 0.7, SUBSCORE_JITTER, &VAS),
            indices::derive(rng, base, 0.8, SUBSCORE_JITTER, &VAS),
        ),
        Cohort::Aps => (
            indices::derive(rng, base, 1.2, SUBSCORE_JITTER, &VAS),
            indices::derive(rng, base, 1.0, SUBSCORE_JITTER, &VAS),
            indices::derive(rng, base, 0.8, SUBSCORE_JITTER, &VAS),
        ),
    };
    PatientReported {
        global: round_to(global, 1),
        pain: round_to(pain, 1),
        fatigue: round_to(fatigue, 1),
        morning_stiffness_min: rng.random_range(10..=60),
        night_pain: round_to(rng.random_range(2.0..=8.0), 1),
    }
}

fn draw_labs<R: Rng + ?Sized>(rng: &mut R) -> HubResult<Labs> {
    let crp: f64 = indices::normal(5.0, 3.0)?.sample(rng);
    let esr: f64 = indices::normal(12.0, 8.0)?.sample(rng);
    Ok(Labs {
        crp: round_to(crp.max(0.0), 1),
        esr: esr.round().max(1.0) as u32,
    })
}

fn draw_basdai<R: Rng + ?Sized>(rng: &mut R, base: f64) -> Basdai {
    let mut questions = [0u8; 6];
    for (question, ratio) in questions.iter_mut().zip(BASDAI_RATIOS) {
        *question = indices::derive(rng, base, ratio, BASDAI_JITTER, &BASDAI_QUESTION).round() as u8;
    }
    Basdai {
        questions,
        result: scores::basdai_mean(&questions),
    }
}

fn draw_asdas<R: Rng + ?Sized>(
    rng: &mut R,
    base: f64,
    reported: &PatientReported,
    labs: &Labs,
    joints: &JointExam,
) -> Asdas {
    let inputs = AsdasInputs {
        back_pain: round_to(indices::derive(rng, base, 0.9, SUBSCORE_JITTER, &VAS), 1),
        stiffness: round_to(indices::derive(rng, base, 0.8, SUBSCORE_JITTER, &VAS), 1),
        patient_global: reported.global,
        swollen: joints.swollen.len(),
    };
    Asdas {
        back_pain: inputs.back_pain,
        stiffness: inputs.stiffness,
        patient_global: inputs.patient_global,
        crp_result: scores::asdas_crp(&inputs, labs.crp),
        esr_result: scores::asdas_esr(&inputs, labs.esr),
    }
}

fn draw_metrology<R: Rng + ?Sized>(rng: &mut R) -> Metrology {
    Metrology {
        schober_cm: round_to(rng.random_range(3.0..=7.0), 1),
        cervical_rotation_deg: rng.random_range(40..=80),
        occiput_wall_cm: round_to(rng.random_range(5.0..=25.0), 1),
        tragus_wall_cm: round_to(rng.random_range(40.0..=80.0), 1),
        chest_expansion_cm: round_to(rng.random_range(2.0..=5.0), 1),
        intermalleolar_cm: rng.random_range(30..=50),
    }
}

fn draw_pasi<R: Rng + ?Sized>(rng: &mut R, kind: VisitKind, joints: &JointExam) -> PasiAssessment {
    let (score, bsa_per_joint) = match kind {
        VisitKind::FirstVisit => (indices::skin_involvement(rng), BSA_PER_JOINT_FIRST),
        VisitKind::FollowUp => (
            indices::skin_involvement_follow_up(rng),
            BSA_PER_JOINT_FOLLOW_UP,
        ),
    };
    let severity = if score < 10 {
        "leve"
    } else if score < 15 {
        "moderada"
    } else {
        "grave"
    };
    PasiAssessment {
        score,
        bsa_percentage: round_to(joints.swollen.len() as f64 * bsa_per_joint, 1),
        description: format!("Afectación {}", severity),
    }
}

fn draw_haq<R: Rng + ?Sized>(rng: &mut R, base: f64) -> Haq {
    let mut categories = [0.0; 8];
    for (category, ratio) in categories.iter_mut().zip(HAQ_RATIOS) {
        *category = round_to(indices::derive(rng, base, ratio, HAQ_JITTER, &HAQ_CATEGORY), 2);
    }
    Haq {
        categories,
        total: scores::haq_di(&categories, &[false; 8]),
    }
}

fn score_mda(
    joints: &JointExam,
    haq: &Haq,
    reported: &PatientReported,
    pasi: &PasiAssessment,
    lei: &Lei,
) -> Mda {
    let inputs = MdaInputs {
        tender: joints.tender.len(),
        swollen: joints.swollen.len(),
        pasi: f64::from(pasi.score),
        bsa: pasi.bsa_percentage,
        lei: lei.score,
        pain_mm: round_to(reported.pain * 10.0, 0),
        global_mm: round_to(reported.global * 10.0, 0),
        haq: haq.total,
    };
    Mda {
        tender: inputs.tender,
        swollen: inputs.swollen,
        pasi: pasi.score,
        pain_mm: inputs.pain_mm,
        global_mm: inputs.global_mm,
        haq: inputs.haq,
        enthesitis: inputs.lei,
        met: Flag::from(scores::mda_met(&inputs)),
    }
}

fn draw_decision<R: Rng + ?Sized>(rng: &mut R) -> HubResult<TherapeuticDecision> {
    if rng.random_bool(profile::CONTINUE_RATE) {
        Ok(TherapeuticDecision::Continue)
    } else {
        pick(
            rng,
            &[TherapeuticDecision::IncreaseDose, TherapeuticDecision::Switch],
            "therapeutic decision",
        )
        .copied()
    }
}
