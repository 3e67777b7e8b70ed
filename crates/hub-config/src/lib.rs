//! # hub-config
//!
//! TOML-driven configuration for the clinical hub generator.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use hub_config::GeneratorConfig;
//!
//! let config = GeneratorConfig::from_file(Path::new("hub.toml"))?;
//! // or GeneratorConfig::default() for the stock 30 + 30 patient run.
//! ```
//!
//! All keys are optional. Loaded values are validated before they reach the
//! generator, so sampling never sees an empty visit range or a probability
//! outside `[0, 1]`.

pub mod config;
pub mod loader;

pub use config::{CohortSettings, GeneratorConfig, VisitRange, DEFAULT_WORKBOOK};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::io::Write;

    use hub_contracts::{cohort::Cohort, error::HubError};

    use crate::GeneratorConfig;

    fn expect_config_error(toml: &str, needle: &str) {
        match GeneratorConfig::from_toml_str(toml) {
            Err(HubError::ConfigError { reason }) => {
                assert!(reason.contains(needle), "expected '{needle}' in reason, got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    // ── 1. defaults ───────────────────────────────────────────────────────────

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = GeneratorConfig::from_toml_str("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.workbook, "Hub_Clinico_Maestro.xlsx");
        assert_eq!(config.seed, None);
        assert_eq!(config.visits.min, 2);
        assert_eq!(config.visits.max, 5);
        assert_eq!(config.switch_probability, 0.4);
        assert_eq!(config.cohort(Cohort::Espa).patients, 30);
        assert_eq!(config.cohort(Cohort::Aps).patients, 30);
        assert_eq!(config.max_swollen(Cohort::Espa), 12);
        assert_eq!(config.max_swollen(Cohort::Aps), 10);
    }

    // ── 2. overrides ──────────────────────────────────────────────────────────

    #[test]
    fn test_full_document_overrides_everything() {
        let toml = r#"
            workbook = "out/hub.xlsx"
            seed = 42
            switch_probability = 0.25

            [visits]
            min = 1
            max = 3

            [espa]
            patients = 5
            max_swollen_joints = 8

            [aps]
            patients = 7
            max_swollen_joints = 6
        "#;

        let config = GeneratorConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.workbook, "out/hub.xlsx");
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.switch_probability, 0.25);
        assert_eq!((config.visits.min, config.visits.max), (1, 3));
        assert_eq!(config.espa.patients, 5);
        assert_eq!(config.max_swollen(Cohort::Espa), 8);
        assert_eq!(config.aps.patients, 7);
        assert_eq!(config.max_swollen(Cohort::Aps), 6);
    }

    #[test]
    fn test_partial_cohort_table_keeps_cohort_joint_cap() {
        let toml = r#"
            [aps]
            patients = 12
        "#;

        let config = GeneratorConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.aps.patients, 12);
        assert_eq!(config.max_swollen(Cohort::Aps), 10);
        assert_eq!(config.espa.patients, 30);
    }

    // ── 3. validation ─────────────────────────────────────────────────────────

    #[test]
    fn test_zero_minimum_visits_rejected() {
        expect_config_error("[visits]\nmin = 0\nmax = 3\n", "visits.min must be at least 1");
    }

    #[test]
    fn test_inverted_visit_range_rejected() {
        expect_config_error("[visits]\nmin = 4\nmax = 2\n", "exceeds visits.max");
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        expect_config_error("switch_probability = 1.5\n", "outside [0, 1]");
        expect_config_error("switch_probability = -0.1\n", "outside [0, 1]");
    }

    #[test]
    fn test_joint_cap_above_site_count_rejected() {
        expect_config_error("[espa]\nmax_swollen_joints = 29\n", "only 28 joints");
    }

    #[test]
    fn test_patient_count_above_three_digits_rejected() {
        expect_config_error("[aps]\npatients = 1000\n", "aps.patients (1000) exceeds 999");
    }

    // ── 4. parse and read errors ──────────────────────────────────────────────

    #[test]
    fn test_toml_parse_error() {
        expect_config_error("this is not valid toml ][[[", "failed to parse generator TOML");
    }

    #[test]
    fn test_unknown_type_rejected() {
        expect_config_error("seed = \"forty-two\"\n", "failed to parse generator TOML");
    }

    #[test]
    fn test_from_file_reads_and_validates() {
        let dir = std::env::temp_dir().join(format!("hub-config-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("hub.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "seed = 7\n[visits]\nmin = 3\nmax = 3").unwrap();
        drop(file);

        let config = GeneratorConfig::from_file(&path).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.visits.min, 3);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_from_file_missing_path() {
        let result = GeneratorConfig::from_file(std::path::Path::new("/nonexistent/hub.toml"));
        match result {
            Err(HubError::ConfigError { reason }) => {
                assert!(reason.contains("failed to read config file"));
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }
}
