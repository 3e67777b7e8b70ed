//! Generator configuration schema.
//!
//! Every key is optional in TOML; a missing key takes the value the hub has
//! always used (30 patients per cohort, two to five visits each, a 40%
//! treatment-switch chance at follow-ups).
//!
//! Example:
//! ```toml
//! workbook = "Hub_Clinico_Maestro.xlsx"
//! seed = 42
//! switch_probability = 0.4
//!
//! [visits]
//! min = 2
//! max = 5
//!
//! [espa]
//! patients = 30
//! max_swollen_joints = 12
//! ```

use serde::{Deserialize, Serialize};

use hub_contracts::cohort::Cohort;

/// Workbook path used when neither the config nor the command line names one.
pub const DEFAULT_WORKBOOK: &str = "Hub_Clinico_Maestro.xlsx";

/// Top-level generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Workbook to initialize and populate.
    pub workbook: String,

    /// Seed for the random source. `None` draws a seed from the OS.
    pub seed: Option<u64>,

    /// Chance that a follow-up switches the current treatment to a biologic.
    pub switch_probability: f64,

    /// Number of visits per patient, first visit included.
    pub visits: VisitRange,

    pub espa: CohortSettings,
    pub aps: CohortSettings,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            workbook: DEFAULT_WORKBOOK.to_string(),
            seed: None,
            switch_probability: 0.4,
            visits: VisitRange::default(),
            espa: CohortSettings::default(),
            aps: CohortSettings::default(),
        }
    }
}

impl GeneratorConfig {
    /// Settings for `cohort`.
    pub fn cohort(&self, cohort: Cohort) -> &CohortSettings {
        match cohort {
            Cohort::Espa => &self.espa,
            Cohort::Aps => &self.aps,
        }
    }

    /// Upper bound on swollen joints per visit for `cohort`.
    pub fn max_swollen(&self, cohort: Cohort) -> usize {
        self.cohort(cohort)
            .max_swollen_joints
            .unwrap_or_else(|| cohort.default_max_swollen())
    }
}

/// Inclusive bounds on visits per patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitRange {
    pub min: u32,
    pub max: u32,
}

impl Default for VisitRange {
    fn default() -> Self {
        Self { min: 2, max: 5 }
    }
}

/// Per-cohort population settings.
///
/// An unset joint cap falls back to the cohort's own default, so a partial
/// `[aps]` table still caps at 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CohortSettings {
    pub patients: u32,
    pub max_swollen_joints: Option<usize>,
}

impl Default for CohortSettings {
    fn default() -> Self {
        Self {
            patients: 30,
            max_swollen_joints: None,
        }
    }
}
