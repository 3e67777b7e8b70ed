//! Loading and validating a `GeneratorConfig`.

use std::path::Path;

use tracing::debug;

use hub_contracts::{
    cohort::Cohort,
    error::{HubError, HubResult},
    schema::JOINT_SITES,
};

use crate::config::GeneratorConfig;

/// Identifiers carry a three-digit sequence.
pub const MAX_PATIENTS: u32 = 999;

impl GeneratorConfig {
    /// Parse `s` as TOML and validate the result.
    ///
    /// Returns `HubError::ConfigError` if the TOML is malformed, does not
    /// match the schema, or holds out-of-range values.
    pub fn from_toml_str(s: &str) -> HubResult<Self> {
        let config: GeneratorConfig = toml::from_str(s).map_err(|e| HubError::ConfigError {
            reason: format!("failed to parse generator TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as generator configuration.
    pub fn from_file(path: &Path) -> HubResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| HubError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        debug!(path = %path.display(), "loaded generator config");
        Self::from_toml_str(&contents)
    }

    /// Check every value the generator would otherwise choke on.
    pub fn validate(&self) -> HubResult<()> {
        if self.workbook.trim().is_empty() {
            return Err(config_error("workbook path is empty".to_string()));
        }
        if self.visits.min < 1 {
            return Err(config_error("visits.min must be at least 1".to_string()));
        }
        if self.visits.min > self.visits.max {
            return Err(config_error(format!(
                "visits.min ({}) exceeds visits.max ({})",
                self.visits.min, self.visits.max
            )));
        }
        if !(0.0..=1.0).contains(&self.switch_probability) {
            return Err(config_error(format!(
                "switch_probability {} is outside [0, 1]",
                self.switch_probability
            )));
        }
        for cohort in Cohort::ALL {
            let settings = self.cohort(cohort);
            if settings.patients > MAX_PATIENTS {
                return Err(config_error(format!(
                    "{}.patients ({}) exceeds {}",
                    cohort.sheet_name().to_lowercase(),
                    settings.patients,
                    MAX_PATIENTS
                )));
            }
            let cap = self.max_swollen(cohort);
            if cap > JOINT_SITES.len() {
                return Err(config_error(format!(
                    "max_swollen_joints for {} is {} but only {} joints are examined",
                    cohort,
                    cap,
                    JOINT_SITES.len()
                )));
            }
        }
        Ok(())
    }
}

fn config_error(reason: String) -> HubError {
    HubError::ConfigError { reason }
}
