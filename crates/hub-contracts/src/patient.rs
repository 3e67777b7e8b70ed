//! Patient records and treatment-escalation types.
//!
//! A `Patient` is created once, before any of its visits is emitted. All of
//! its attributes are fixed from then on except the current treatment, which
//! a follow-up visit may overwrite.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    cohort::{Cohort, Flag, Serology, Sex},
    error::{HubError, HubResult},
};

/// Cohort-scoped patient identifier, rendered as `ESP-2024-001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientId {
    pub cohort: Cohort,
    pub year: u16,
    /// 1-based position within the cohort.
    pub sequence: u16,
}

impl PatientId {
    pub fn new(cohort: Cohort, year: u16, sequence: u16) -> Self {
        Self { cohort, year, sequence }
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{:03}", self.cohort.id_code(), self.year, self.sequence)
    }
}

/// Psoriasis involvement by body area, recorded at baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsoriasisAreas {
    pub scalp: Flag,
    pub nail: Flag,
    pub extensor: Flag,
    pub folds: Flag,
    pub palmoplantar: Flag,
}

/// Comorbidity flags. Drawn once per patient and repeated on every visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comorbidities {
    pub hypertension: Flag,
    pub diabetes: Flag,
    pub dyslipidaemia: Flag,
    pub cardiovascular: Flag,
    pub gastritis: Flag,
    pub obesity: Flag,
    pub osteoporosis: Flag,
    pub gout: Flag,
}

/// Baseline markers whose shape depends on the cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaselineMarkers {
    Axial {
        hla_b27: Serology,
    },
    Psoriatic {
        hla_b27: Serology,
        rheumatoid_factor: Flag,
        anti_ccp: Flag,
        psoriasis: PsoriasisAreas,
    },
}

impl BaselineMarkers {
    /// The cohort these markers belong to.
    pub fn cohort(&self) -> Cohort {
        match self {
            BaselineMarkers::Axial { .. } => Cohort::Espa,
            BaselineMarkers::Psoriatic { .. } => Cohort::Aps,
        }
    }

    pub fn hla_b27(&self) -> Serology {
        match self {
            BaselineMarkers::Axial { hla_b27 } | BaselineMarkers::Psoriatic { hla_b27, .. } => {
                *hla_b27
            }
        }
    }
}

/// Treatment strategy fixed at patient creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EscalationTier {
    /// Anti-inflammatory only.
    NsaidOnly,
    /// Anti-inflammatory plus a conventional agent.
    Conventional,
    /// Anti-inflammatory plus a biologic agent.
    Biologic,
}

impl EscalationTier {
    /// Map one uniform draw in `[0, 1)` onto a tier: 40% / 30% / 30%.
    pub fn from_draw(u: f64) -> Self {
        if u < 0.4 {
            EscalationTier::NsaidOnly
        } else if u < 0.7 {
            EscalationTier::Conventional
        } else {
            EscalationTier::Biologic
        }
    }

    /// 1-based tier number.
    pub fn level(self) -> u8 {
        match self {
            EscalationTier::NsaidOnly => 1,
            EscalationTier::Conventional => 2,
            EscalationTier::Biologic => 3,
        }
    }
}

/// A drug with its dose string, e.g. `Adalimumab` / `40mg/2sem`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    pub drug: String,
    pub dose: String,
}

impl Prescription {
    pub fn new(drug: impl Into<String>, dose: impl Into<String>) -> Self {
        Self {
            drug: drug.into(),
            dose: dose.into(),
        }
    }
}

impl fmt::Display for Prescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.drug, self.dose)
    }
}

/// The initial treatment of a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regimen {
    pub tier: EscalationTier,
    pub systemic: Prescription,
    pub conventional: Option<Prescription>,
    pub biologic: Option<Prescription>,
}

impl Regimen {
    /// Text written to `Tratamiento_Actual` on the first visit, e.g.
    /// `Naproxeno 500mg/12h + Metotrexato 15mg/sem`.
    pub fn summary(&self) -> String {
        match (&self.conventional, &self.biologic) {
            (Some(add_on), _) | (None, Some(add_on)) => format!("{} + {}", self.systemic, add_on),
            (None, None) => self.systemic.to_string(),
        }
    }

    fn check(&self) -> HubResult<()> {
        let consistent = match self.tier {
            EscalationTier::NsaidOnly => self.conventional.is_none() && self.biologic.is_none(),
            EscalationTier::Conventional => self.conventional.is_some() && self.biologic.is_none(),
            EscalationTier::Biologic => self.conventional.is_none() && self.biologic.is_some(),
        };
        if consistent {
            Ok(())
        } else {
            Err(HubError::InvalidPatient {
                reason: format!(
                    "tier {} regimen has conventional={} biologic={}",
                    self.tier.level(),
                    self.conventional.is_some(),
                    self.biologic.is_some()
                ),
            })
        }
    }
}

/// Everything needed to construct a [`Patient`].
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub id: PatientId,
    pub name: String,
    pub sex: Sex,
    pub clinician: String,
    pub markers: BaselineMarkers,
    pub comorbidities: Comorbidities,
    pub regimen: Regimen,
    pub treatment_start: NaiveDate,
}

/// A synthetic patient.
#[derive(Debug, Clone, Serialize)]
pub struct Patient {
    id: PatientId,
    name: String,
    sex: Sex,
    clinician: String,
    markers: BaselineMarkers,
    comorbidities: Comorbidities,
    regimen: Regimen,
    treatment_start: NaiveDate,
    current_treatment: String,
}

impl Patient {
    /// Validate `fields` and build the patient.
    ///
    /// The identifier and baseline markers must agree on the cohort, and the
    /// regimen's drug fields must match its tier. The current treatment
    /// starts out as the initial regimen summary.
    pub fn new(fields: NewPatient) -> HubResult<Self> {
        if fields.id.cohort != fields.markers.cohort() {
            return Err(HubError::InvalidPatient {
                reason: format!(
                    "identifier {} belongs to {} but markers belong to {}",
                    fields.id,
                    fields.id.cohort,
                    fields.markers.cohort()
                ),
            });
        }
        if fields.id.sequence == 0 || fields.id.sequence > 999 {
            return Err(HubError::InvalidPatient {
                reason: format!("sequence {} does not fit three digits", fields.id.sequence),
            });
        }
        if fields.name.trim().is_empty() || fields.clinician.trim().is_empty() {
            return Err(HubError::InvalidPatient {
                reason: format!("patient {} has an empty name or clinician", fields.id),
            });
        }
        fields.regimen.check()?;

        let current_treatment = fields.regimen.summary();
        Ok(Self {
            id: fields.id,
            name: fields.name,
            sex: fields.sex,
            clinician: fields.clinician,
            markers: fields.markers,
            comorbidities: fields.comorbidities,
            regimen: fields.regimen,
            treatment_start: fields.treatment_start,
            current_treatment,
        })
    }

    pub fn id(&self) -> &PatientId {
        &self.id
    }

    pub fn cohort(&self) -> Cohort {
        self.id.cohort
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn clinician(&self) -> &str {
        &self.clinician
    }

    pub fn markers(&self) -> &BaselineMarkers {
        &self.markers
    }

    pub fn comorbidities(&self) -> &Comorbidities {
        &self.comorbidities
    }

    pub fn regimen(&self) -> &Regimen {
        &self.regimen
    }

    pub fn treatment_start(&self) -> NaiveDate {
        self.treatment_start
    }

    pub fn current_treatment(&self) -> &str {
        &self.current_treatment
    }

    /// Overwrite the current treatment. Nothing else about the patient changes.
    pub fn set_current_treatment(&mut self, treatment: impl Into<String>) {
        self.current_treatment = treatment.into();
    }
}
