//! The default rule set for a generated cohort sheet.
//!
//! Blank-column rules are derived from the assembler's strategy table, so a
//! group added to or removed from a cohort's template is picked up here
//! without a second list to keep in sync.

use hub_contracts::{
    cohort::Cohort,
    schema::{FieldGroup, JOINT_SITES},
    sheet::SheetRows,
    verify::{VerificationRule, VerificationRuleType},
};
use hub_core::{assembler, indices::round_to, sampling::MAX_DACTYLITIS};

use crate::engine::SheetVerifier;

/// Name of the custom check for `RAPID3_Score = Funcion + Dolor + Global`.
pub const RAPID3_SUM: &str = "rapid3-sum";

/// The rules every generated sheet of `cohort` must satisfy.
pub fn default_rules(cohort: Cohort) -> Vec<VerificationRule> {
    let mut rules = vec![
        VerificationRule::new(
            "header-match",
            "header row equals the hub schema",
            VerificationRuleType::HeaderMatch,
        ),
        VerificationRule::new(
            "identifier-pattern",
            format!("identifiers follow {}-YYYY-NNN", cohort.id_code()),
            VerificationRuleType::IdentifierPattern { cohort },
        ),
        VerificationRule::new(
            "visit-sequence",
            "one first visit per patient, before its follow-ups",
            VerificationRuleType::VisitSequence,
        ),
        VerificationRule::new(
            "exam-flags",
            "joint, dactylitis and comorbidity columns hold SI or NO",
            VerificationRuleType::FlagColumns {
                columns: headers(&[
                    FieldGroup::SwollenJoints,
                    FieldGroup::TenderJoints,
                    FieldGroup::Dactylitis,
                    FieldGroup::ExtraArticular,
                    FieldGroup::Comorbidities,
                ]),
            },
        ),
        VerificationRule::new(
            "tender-within-swollen",
            "a tender joint is always swollen",
            VerificationRuleType::FlagSubset {
                subset: headers(&[FieldGroup::TenderJoints]),
                superset: headers(&[FieldGroup::SwollenJoints]),
            },
        ),
        VerificationRule::new(
            "first-visit-blanks",
            "follow-up groups are empty on first visits",
            VerificationRuleType::BlankOnFirstVisit {
                columns: headers(&assembler::follow_up_only(cohort)),
            },
        ),
        VerificationRule::new(
            "cohort-blanks",
            format!("groups outside the {} template are empty", cohort),
            VerificationRuleType::AlwaysBlank {
                columns: headers(&assembler::never_active(cohort)),
            },
        ),
        range("swollen-total", "NAD_Total", 0.0, JOINT_SITES.len() as f64),
        range("tender-total", "NAT_Total", 0.0, JOINT_SITES.len() as f64),
        range("dactylitis-total", "Dactilitis_Total", 0.0, MAX_DACTYLITIS as f64),
        range("global-vas", "EVA_Global", 0.0, 10.0),
        range("pain-vas", "EVA_Dolor", 0.0, 10.0),
        range("crp", "PCR", 0.0, 100.0),
    ];

    match cohort {
        Cohort::Espa => {
            let questions: Vec<String> = (1..=6).map(|i| format!("BASDAI_P{}", i)).collect();
            for (i, q) in questions.iter().enumerate() {
                rules.push(range(&format!("basdai-p{}", i + 1), q, 1.0, 7.0));
            }
            rules.push(VerificationRule::new(
                "basdai-mean",
                "BASDAI_Result is the mean of the six questions",
                VerificationRuleType::MeanOf {
                    result: "BASDAI_Result".to_string(),
                    components: questions,
                    decimals: 1,
                },
            ));
        }
        Cohort::Aps => {
            let mut categories = headers(&[FieldGroup::Haq]);
            categories.pop();
            for c in &categories {
                rules.push(range(&c.to_lowercase().replace('_', "-"), c, 0.0, 3.0));
            }
            rules.push(VerificationRule::new(
                "haq-mean",
                "HAQ_Total is the mean of the eight categories",
                VerificationRuleType::MeanOf {
                    result: "HAQ_Total".to_string(),
                    components: categories,
                    decimals: 2,
                },
            ));
            rules.push(range("pasi-score", "PASI_Score", 1.0, 20.0));
            rules.push(range("lei-score", "LEI_Score", 0.0, 6.0));
            rules.push(VerificationRule::new(
                "rapid3-sum",
                "RAPID3_Score is the sum of its three components",
                VerificationRuleType::Custom {
                    function_name: RAPID3_SUM.to_string(),
                },
            ));
        }
    }

    rules
}

/// Register the custom checks referenced by `default_rules`.
pub fn register_hub_rules(verifier: &mut SheetVerifier) {
    verifier.register_rule(RAPID3_SUM, Box::new(check_rapid3_sum));
}

impl SheetVerifier {
    /// A verifier with the hub's custom checks registered.
    pub fn with_hub_rules() -> Self {
        let mut verifier = Self::new();
        register_hub_rules(&mut verifier);
        verifier
    }
}

fn check_rapid3_sum(sheet: &SheetRows, row: usize) -> Option<String> {
    let value = |header: &str| sheet.cell(row, header).and_then(|c| c.as_f64());
    let score = value("RAPID3_Score")?;
    match (value("RAPID3_Funcion"), value("RAPID3_Dolor"), value("RAPID3_Global")) {
        (Some(f), Some(p), Some(g)) => {
            let expected = round_to(f + p + g, 1);
            ((score - expected).abs() > 1e-9)
                .then(|| format!("RAPID3_Score = {}, components sum to {}", score, expected))
        }
        _ => Some("RAPID3_Score is set but a component is missing".to_string()),
    }
}

fn headers(groups: &[FieldGroup]) -> Vec<String> {
    groups
        .iter()
        .flat_map(|g| g.headers())
        .map(|h| h.to_string())
        .collect()
}

fn range(rule_id: &str, column: &str, min: f64, max: f64) -> VerificationRule {
    VerificationRule::new(
        rule_id,
        format!("{} lies in [{}, {}]", column, min, max),
        VerificationRuleType::NumericRange {
            column: column.to_string(),
            min,
            max,
        },
    )
}
