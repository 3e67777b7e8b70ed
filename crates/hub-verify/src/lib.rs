//! # hub-verify
//!
//! Verification of populated clinical hub sheets.
//!
//! This crate provides [`engine::SheetVerifier`], which implements the
//! [`hub_core::traits::Verifier`] trait, and [`rules::default_rules`], the
//! checks every generated cohort sheet must pass: header match, identifier
//! pattern, flag columns, tender-within-swollen, the cohort's blank groups,
//! value ranges and composite means.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use hub_core::traits::Verifier;
//! use hub_verify::{default_rules, SheetVerifier};
//!
//! let verifier = SheetVerifier::with_hub_rules();
//! let sheet = hub_workbook::read_sheet("Hub_Clinico_Maestro.xlsx", "ESPA")?;
//! let report = verifier.verify(&sheet, &default_rules(Cohort::Espa))?;
//! ```

pub mod engine;
pub mod rules;

pub use engine::{CustomRuleFn, SheetVerifier};
pub use rules::{default_rules, register_hub_rules, RAPID3_SUM};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use hub_config::GeneratorConfig;
    use hub_contracts::{
        cell::Cell,
        cohort::{Cohort, Flag, VisitKind},
        sheet::SheetRows,
        verify::VerificationRuleType,
    };
    use hub_core::{generate, traits::Verifier};
    use hub_workbook::InMemoryHub;

    use super::{default_rules, SheetVerifier};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn generated(seed: u64) -> InMemoryHub {
        let mut hub = InMemoryHub::new();
        generate(&GeneratorConfig::default(), &mut StdRng::seed_from_u64(seed), &mut hub).unwrap();
        hub
    }

    fn set(sheet: &mut SheetRows, row: usize, header: &str, value: Cell) {
        let col = sheet.column(header).unwrap();
        sheet.rows[row][col] = value;
    }

    fn first_follow_up(sheet: &SheetRows) -> usize {
        (0..sheet.rows.len())
            .find(|i| sheet.cell(*i, "Tipo_Visita").and_then(Cell::as_str) == Some(VisitKind::FollowUp.label()))
            .unwrap()
    }

    // ── Generated data ────────────────────────────────────────────────────────

    #[test]
    fn test_generated_sheets_pass_default_rules() {
        let verifier = SheetVerifier::with_hub_rules();
        for seed in [1, 2, 3] {
            let hub = generated(seed);
            for cohort in Cohort::ALL {
                let report = verifier.verify(hub.sheet(cohort), &default_rules(cohort)).unwrap();
                assert!(
                    report.passed,
                    "seed {seed} {cohort}: {:?}",
                    &report.failures[..report.failures.len().min(5)]
                );
                assert_eq!(report.sheet, cohort.sheet_name());
                assert_eq!(report.rows_checked, hub.sheet(cohort).rows.len());
            }
        }
    }

    #[test]
    fn test_injected_tender_without_swollen_is_reported() {
        let verifier = SheetVerifier::with_hub_rules();
        let mut sheet = generated(4).sheet(Cohort::Espa).clone();
        set(&mut sheet, 0, "NAD_codo_derecho", Cell::from(Flag::No));
        set(&mut sheet, 0, "NAT_codo_derecho", Cell::from(Flag::Si));

        let report = verifier.verify(&sheet, &default_rules(Cohort::Espa)).unwrap();
        assert!(!report.passed);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].rule_id, "tender-within-swollen");
        assert_eq!(report.failures[0].row, Some(2));
        assert!(report.failures[0].message.contains("NAT_codo_derecho"));
    }

    #[test]
    fn test_injected_basdai_result_is_reported() {
        let verifier = SheetVerifier::with_hub_rules();
        let mut sheet = generated(5).sheet(Cohort::Espa).clone();
        let row = first_follow_up(&sheet);
        set(&mut sheet, row, "BASDAI_Result", Cell::Number(9.9));

        let report = verifier.verify(&sheet, &default_rules(Cohort::Espa)).unwrap();
        let failure = report
            .failures
            .iter()
            .find(|f| f.rule_id == "basdai-mean")
            .unwrap();
        assert_eq!(failure.row, Some(row + 2));
    }

    #[test]
    fn test_filled_follow_up_column_on_first_visit_is_reported() {
        let verifier = SheetVerifier::with_hub_rules();
        let mut sheet = generated(6).sheet(Cohort::Aps).clone();
        set(&mut sheet, 0, "HAQ_Comer", Cell::Number(1.0));

        let report = verifier.verify(&sheet, &default_rules(Cohort::Aps)).unwrap();
        let rules: Vec<&str> = report.failures.iter().map(|f| f.rule_id.as_str()).collect();
        assert!(rules.contains(&"first-visit-blanks"), "{rules:?}");
    }

    #[test]
    fn test_cross_cohort_column_is_reported() {
        let verifier = SheetVerifier::with_hub_rules();
        let mut sheet = generated(7).sheet(Cohort::Espa).clone();
        let row = first_follow_up(&sheet);
        set(&mut sheet, row, "PASI_Score", Cell::Integer(5));

        let report = verifier.verify(&sheet, &default_rules(Cohort::Espa)).unwrap();
        let failure = report
            .failures
            .iter()
            .find(|f| f.rule_id == "cohort-blanks")
            .unwrap();
        assert_eq!(failure.row, Some(row + 2));
    }

    #[test]
    fn test_duplicated_first_visit_is_reported() {
        let verifier = SheetVerifier::with_hub_rules();
        let mut sheet = generated(9).sheet(Cohort::Espa).clone();
        let first = sheet.rows[0].clone();
        sheet.rows.insert(1, first);

        let report = verifier.verify(&sheet, &default_rules(Cohort::Espa)).unwrap();
        assert_eq!(report.failures.len(), 1, "{:?}", report.failures);
        assert_eq!(report.failures[0].rule_id, "visit-sequence");
        assert_eq!(report.failures[0].row, Some(3));
    }

    #[test]
    fn test_follow_up_before_first_visit_is_reported() {
        let verifier = SheetVerifier::with_hub_rules();
        let mut sheet = generated(10).sheet(Cohort::Aps).clone();
        sheet.rows.swap(0, 1);

        let report = verifier.verify(&sheet, &default_rules(Cohort::Aps)).unwrap();
        assert_eq!(report.failures.len(), 1, "{:?}", report.failures);
        assert_eq!(report.failures[0].rule_id, "visit-sequence");
        assert_eq!(report.failures[0].row, Some(2));
    }

    // ── Rule sets ─────────────────────────────────────────────────────────────

    #[test]
    fn test_aps_rules_need_registered_functions() {
        let hub = generated(8);
        let plain = SheetVerifier::new();
        let report = plain.verify(hub.sheet(Cohort::Aps), &default_rules(Cohort::Aps)).unwrap();
        assert!(!report.passed);
        assert!(report.failures.iter().all(|f| f.rule_id == "rapid3-sum" && f.row.is_none()));

        // ESPA uses only built-in rule types.
        assert!(default_rules(Cohort::Espa)
            .iter()
            .all(|r| !matches!(r.rule_type, VerificationRuleType::Custom { .. })));
    }

    #[test]
    fn test_rule_ids_are_unique() {
        for cohort in Cohort::ALL {
            let rules = default_rules(cohort);
            let mut ids: Vec<&str> = rules.iter().map(|r| r.rule_id.as_str()).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), rules.len(), "{cohort}");
        }
    }
}
