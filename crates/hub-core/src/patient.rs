//! Patient construction, treatment escalation and visit scheduling.
//!
//! Everything about a patient is drawn once, here, before its first visit is
//! assembled. Follow-ups may only change the current treatment, through
//! `TreatmentSwitch`.

use chrono::{Days, NaiveDate};
use rand::{
    distr::{Bernoulli, Distribution},
    Rng,
};

use hub_contracts::{
    cohort::{Cohort, Serology, Sex},
    error::{HubError, HubResult},
    patient::{
        BaselineMarkers, Comorbidities, EscalationTier, NewPatient, Patient, PatientId,
        PsoriasisAreas, Regimen,
    },
};

use crate::{
    catalog::{self, CLINICIANS, FIRST_NAMES, SURNAMES},
    profile::{profile, COMORBIDITY_RATES},
    sampling::{flags, pick},
};

/// Identifier years, drawn uniformly.
pub const ID_YEARS: [u16; 2] = [2024, 2025];

/// First visits fall within this many days after 1 January 2024.
pub const FIRST_VISIT_SPREAD_DAYS: u64 = 365;

/// Draw the escalation tier from one uniform value.
pub fn draw_tier<R: Rng + ?Sized>(rng: &mut R) -> EscalationTier {
    EscalationTier::from_draw(rng.random::<f64>())
}

/// Build patient number `sequence` of `cohort` with a freshly drawn tier.
pub fn build_patient<R: Rng + ?Sized>(
    rng: &mut R,
    cohort: Cohort,
    sequence: u16,
) -> HubResult<Patient> {
    let tier = draw_tier(rng);
    build_patient_with_tier(rng, cohort, sequence, tier)
}

/// Build patient number `sequence` of `cohort` on a given tier.
pub fn build_patient_with_tier<R: Rng + ?Sized>(
    rng: &mut R,
    cohort: Cohort,
    sequence: u16,
    tier: EscalationTier,
) -> HubResult<Patient> {
    let year = *pick(rng, &ID_YEARS, "identifier year")?;
    let name = format!(
        "{} {} {}",
        pick(rng, FIRST_NAMES, "first name")?,
        pick(rng, SURNAMES, "surname")?,
        pick(rng, SURNAMES, "surname")?
    );
    let sex = if rng.random_bool(0.5) { Sex::Male } else { Sex::Female };
    let first_visit = add_days(baseline_date()?, rng.random_range(0..=FIRST_VISIT_SPREAD_DAYS))?;
    let clinician = pick(rng, &CLINICIANS, "clinician")?.to_string();
    let markers = draw_markers(rng, cohort);
    let comorbidities = draw_comorbidities(rng);
    let regimen = draw_regimen(rng, cohort, tier)?;

    Patient::new(NewPatient {
        id: PatientId::new(cohort, year, sequence),
        name,
        sex,
        clinician,
        markers,
        comorbidities,
        regimen,
        treatment_start: first_visit,
    })
}

fn draw_markers<R: Rng + ?Sized>(rng: &mut R, cohort: Cohort) -> BaselineMarkers {
    let profile = profile(cohort);
    let hla_b27 = Serology::from(rng.random_bool(profile.hla_b27));
    match (profile.serology, profile.psoriasis_areas) {
        (Some(serology), Some(areas)) => {
            let [rheumatoid_factor, anti_ccp] = flags(rng, &serology);
            let [scalp, nail, extensor, folds, palmoplantar] = flags(rng, &areas);
            BaselineMarkers::Psoriatic {
                hla_b27,
                rheumatoid_factor,
                anti_ccp,
                psoriasis: PsoriasisAreas {
                    scalp,
                    nail,
                    extensor,
                    folds,
                    palmoplantar,
                },
            }
        }
        _ => BaselineMarkers::Axial { hla_b27 },
    }
}

fn draw_comorbidities<R: Rng + ?Sized>(rng: &mut R) -> Comorbidities {
    let [hypertension, diabetes, dyslipidaemia, cardiovascular, gastritis, obesity, osteoporosis, gout] =
        flags(rng, &COMORBIDITY_RATES);
    Comorbidities {
        hypertension,
        diabetes,
        dyslipidaemia,
        cardiovascular,
        gastritis,
        obesity,
        osteoporosis,
        gout,
    }
}

/// Draw the initial regimen of `tier` from the cohort's catalogue.
///
/// Every tier gets an anti-inflammatory; tier 2 adds a conventional agent and
/// tier 3 a biologic.
pub fn draw_regimen<R: Rng + ?Sized>(
    rng: &mut R,
    cohort: Cohort,
    tier: EscalationTier,
) -> HubResult<Regimen> {
    let drugs = catalog::drugs(cohort);
    let systemic = catalog::prescription(pick(rng, drugs.nsaids, "anti-inflammatory")?);
    let (conventional, biologic) = match tier {
        EscalationTier::NsaidOnly => (None, None),
        EscalationTier::Conventional => (
            Some(catalog::prescription(pick(rng, drugs.conventional, "conventional agent")?)),
            None,
        ),
        EscalationTier::Biologic => (
            None,
            Some(catalog::prescription(pick(rng, drugs.biologics, "biologic")?)),
        ),
    };
    Ok(Regimen {
        tier,
        systemic,
        conventional,
        biologic,
    })
}

/// The per-follow-up treatment switch.
///
/// On each follow-up, with the configured probability, the current treatment
/// becomes a random biologic of the patient's cohort. Otherwise it goes back
/// to the initial regimen, so a switch only lasts for the visit that drew it.
#[derive(Debug, Clone, Copy)]
pub struct TreatmentSwitch {
    chance: Bernoulli,
}

impl TreatmentSwitch {
    pub fn new(probability: f64) -> HubResult<Self> {
        let chance = Bernoulli::new(probability).map_err(|e| HubError::InvalidParameter {
            reason: format!("switch probability {}: {}", probability, e),
        })?;
        Ok(Self { chance })
    }

    /// Update `patient`'s current treatment for one follow-up. Returns true
    /// when a biologic switch was drawn.
    pub fn apply<R: Rng + ?Sized>(&self, rng: &mut R, patient: &mut Patient) -> HubResult<bool> {
        if self.chance.sample(rng) {
            let biologics = catalog::drugs(patient.cohort()).biologics;
            let biologic = catalog::prescription(pick(rng, biologics, "biologic")?);
            patient.set_current_treatment(biologic.to_string());
            Ok(true)
        } else {
            let initial = patient.regimen().summary();
            patient.set_current_treatment(initial);
            Ok(false)
        }
    }
}

// ── Scheduling ───────────────────────────────────────────────────────────────

/// 1 January 2024, the start of the first-visit window.
pub fn baseline_date() -> HubResult<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 1, 1).ok_or_else(|| HubError::InvalidParameter {
        reason: "baseline date 2024-01-01 is not representable".to_string(),
    })
}

/// Date of follow-up `index` (1-based): `first` plus U[90 + 90i, 180 + 90i]
/// days.
pub fn follow_up_date<R: Rng + ?Sized>(
    rng: &mut R,
    first: NaiveDate,
    index: u32,
) -> HubResult<NaiveDate> {
    let offset = 90 * u64::from(index);
    add_days(first, rng.random_range(90 + offset..=180 + offset))
}

pub fn add_days(date: NaiveDate, days: u64) -> HubResult<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| HubError::InvalidParameter {
            reason: format!("{} plus {} days is out of range", date, days),
        })
}
