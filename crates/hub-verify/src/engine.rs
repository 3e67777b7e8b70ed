//! Row-level sheet verifier.
//!
//! `SheetVerifier` implements the `Verifier` trait from `hub-core`. Each rule
//! is evaluated against every data row and all failures are collected before
//! returning, so operators see the full failure set in one pass.
//!
//! Column references are resolved against the sheet's own header row. A rule
//! naming a column the sheet lacks fails once at sheet level and is not run
//! row by row.
//!
//! Custom rules delegate to named functions registered via `register_rule`.

use std::collections::{HashMap, HashSet};

use regex::Regex;
use tracing::{debug, warn};

use hub_contracts::{
    cell::Cell,
    cohort::{Cohort, Flag, VisitKind},
    error::{HubError, HubResult},
    schema::HEADERS,
    sheet::SheetRows,
    verify::{VerificationFailure, VerificationReport, VerificationRule, VerificationRuleType},
};
use hub_core::{indices::round_to, patient::ID_YEARS, traits::Verifier};

/// A caller-supplied row check.
///
/// Receives the sheet and a 0-based data-row index. Returns `Some(message)`
/// when the row fails, or `None` on success.
pub type CustomRuleFn = Box<dyn Fn(&SheetRows, usize) -> Option<String> + Send + Sync>;

static EMPTY: Cell = Cell::Empty;

const VISIT_KIND_COLUMN: &str = "Tipo_Visita";
const ID_COLUMN: &str = "ID_Paciente";

/// The hub sheet verifier.
pub struct SheetVerifier {
    custom_rules: HashMap<String, CustomRuleFn>,
}

impl SheetVerifier {
    /// Create a verifier with no custom rules registered.
    pub fn new() -> Self {
        Self {
            custom_rules: HashMap::new(),
        }
    }

    /// Register a custom row check under `name`.
    ///
    /// The name must match the `function_name` of a
    /// `VerificationRuleType::Custom` rule. Registering the same name twice
    /// replaces the previous function.
    pub fn register_rule(&mut self, name: impl Into<String>, f: CustomRuleFn) {
        self.custom_rules.insert(name.into(), f);
    }

    /// Regex for the identifiers of `cohort`, e.g. `^ESP-(2024|2025)-\d{3}$`.
    pub fn identifier_regex(cohort: Cohort) -> HubResult<Regex> {
        let years: Vec<String> = ID_YEARS.iter().map(u16::to_string).collect();
        let pattern = format!(r"^{}-({})-\d{{3}}$", cohort.id_code(), years.join("|"));
        Regex::new(&pattern).map_err(|e| HubError::InvalidParameter {
            reason: format!("identifier pattern '{}': {}", pattern, e),
        })
    }

    /// Evaluate one rule. Returns sheet-level failures, or per-row failures
    /// as `(data row index, message)`.
    fn evaluate(
        &self,
        sheet: &SheetRows,
        rule_type: &VerificationRuleType,
    ) -> HubResult<Evaluation> {
        let eval = match rule_type {
            // ── HeaderMatch ───────────────────────────────────────────────────
            VerificationRuleType::HeaderMatch => {
                if sheet.headers.len() != HEADERS.len() {
                    Evaluation::Sheet(format!(
                        "expected {} headers, found {}",
                        HEADERS.len(),
                        sheet.headers.len()
                    ))
                } else {
                    match sheet.headers.iter().zip(HEADERS).position(|(h, e)| h != e) {
                        Some(i) => Evaluation::Sheet(format!(
                            "header {} is '{}', expected '{}'",
                            i + 1,
                            sheet.headers[i],
                            HEADERS[i]
                        )),
                        None => Evaluation::Rows(Vec::new()),
                    }
                }
            }

            // ── FlagColumns ───────────────────────────────────────────────────
            VerificationRuleType::FlagColumns { columns } => {
                let cols = match resolve(sheet, columns) {
                    Ok(cols) => cols,
                    Err(missing) => return Ok(missing),
                };
                per_row(sheet, |row| {
                    let bad: Vec<&str> = cols
                        .iter()
                        .filter(|(_, c)| !cell(row, *c).as_str().is_some_and(Flag::is_flag_text))
                        .map(|(name, _)| *name)
                        .collect();
                    (!bad.is_empty()).then(|| format!("not SI/NO: {}", bad.join(", ")))
                })
            }

            // ── FlagSubset ────────────────────────────────────────────────────
            VerificationRuleType::FlagSubset { subset, superset } => {
                if subset.len() != superset.len() {
                    return Ok(Evaluation::Sheet(format!(
                        "{} subset columns paired with {} superset columns",
                        subset.len(),
                        superset.len()
                    )));
                }
                let (sub, sup) = match (resolve(sheet, subset), resolve(sheet, superset)) {
                    (Ok(sub), Ok(sup)) => (sub, sup),
                    (Err(missing), _) | (_, Err(missing)) => return Ok(missing),
                };
                per_row(sheet, |row| {
                    let bad: Vec<&str> = sub
                        .iter()
                        .zip(&sup)
                        .filter(|((_, s), (_, p))| {
                            cell(row, *s).as_flag() == Some(Flag::Si)
                                && cell(row, *p).as_flag() != Some(Flag::Si)
                        })
                        .map(|((name, _), _)| *name)
                        .collect();
                    (!bad.is_empty()).then(|| format!("set without its superset: {}", bad.join(", ")))
                })
            }

            // ── BlankOnFirstVisit ─────────────────────────────────────────────
            VerificationRuleType::BlankOnFirstVisit { columns } => {
                let kind_col = match sheet.column(VISIT_KIND_COLUMN) {
                    Some(c) => c,
                    None => return Ok(missing_column(VISIT_KIND_COLUMN)),
                };
                let cols = match resolve(sheet, columns) {
                    Ok(cols) => cols,
                    Err(missing) => return Ok(missing),
                };
                per_row(sheet, |row| {
                    let kind = cell(row, kind_col).as_str().and_then(VisitKind::from_label);
                    if kind != Some(VisitKind::FirstVisit) {
                        return None;
                    }
                    non_empty(row, &cols).map(|bad| format!("filled on a first visit: {}", bad))
                })
            }

            // ── AlwaysBlank ───────────────────────────────────────────────────
            VerificationRuleType::AlwaysBlank { columns } => {
                let cols = match resolve(sheet, columns) {
                    Ok(cols) => cols,
                    Err(missing) => return Ok(missing),
                };
                per_row(sheet, |row| {
                    non_empty(row, &cols).map(|bad| format!("must be empty: {}", bad))
                })
            }

            // ── NumericRange ──────────────────────────────────────────────────
            VerificationRuleType::NumericRange { column, min, max } => {
                let col = match sheet.column(column) {
                    Some(c) => c,
                    None => return Ok(missing_column(column)),
                };
                per_row(sheet, |row| {
                    let value = cell(row, col);
                    if value.is_empty() {
                        return None;
                    }
                    match value.as_f64() {
                        Some(v) if v >= *min && v <= *max => None,
                        Some(v) => Some(format!("{} = {} is outside [{}, {}]", column, v, min, max)),
                        None => Some(format!("{} = {:?} is not numeric", column, value)),
                    }
                })
            }

            // ── MeanOf ────────────────────────────────────────────────────────
            VerificationRuleType::MeanOf {
                result,
                components,
                decimals,
            } => {
                let result_col = match sheet.column(result) {
                    Some(c) => c,
                    None => return Ok(missing_column(result)),
                };
                let cols = match resolve(sheet, components) {
                    Ok(cols) => cols,
                    Err(missing) => return Ok(missing),
                };
                per_row(sheet, |row| {
                    let value = cell(row, result_col);
                    if value.is_empty() {
                        return None;
                    }
                    let parts: Option<Vec<f64>> = cols.iter().map(|(_, c)| cell(row, *c).as_f64()).collect();
                    let (Some(actual), Some(parts)) = (value.as_f64(), parts) else {
                        return Some(format!("{} or its components are not numeric", result));
                    };
                    if parts.is_empty() {
                        return None;
                    }
                    let expected = round_to(parts.iter().sum::<f64>() / parts.len() as f64, *decimals);
                    ((actual - expected).abs() > 1e-9)
                        .then(|| format!("{} = {}, mean of components is {}", result, actual, expected))
                })
            }

            // ── IdentifierPattern ─────────────────────────────────────────────
            VerificationRuleType::IdentifierPattern { cohort } => {
                let pattern = Self::identifier_regex(*cohort)?;
                let col = match sheet.column(ID_COLUMN) {
                    Some(c) => c,
                    None => return Ok(missing_column(ID_COLUMN)),
                };
                per_row(sheet, |row| match cell(row, col).as_str() {
                    Some(id) if pattern.is_match(id) => None,
                    Some(id) => Some(format!("identifier '{}' does not match {}", id, pattern)),
                    None => Some(format!("{} is missing", ID_COLUMN)),
                })
            }

            // ── VisitSequence ─────────────────────────────────────────────────
            VerificationRuleType::VisitSequence => {
                let (id_col, kind_col) = match (sheet.column(ID_COLUMN), sheet.column(VISIT_KIND_COLUMN)) {
                    (Some(id), Some(kind)) => (id, kind),
                    (None, _) => return Ok(missing_column(ID_COLUMN)),
                    (_, None) => return Ok(missing_column(VISIT_KIND_COLUMN)),
                };
                let mut opened: HashSet<&str> = HashSet::new();
                let mut failures = Vec::new();
                for (i, row) in sheet.rows.iter().enumerate() {
                    // A missing identifier is reported by the pattern rule.
                    let Some(id) = cell(row, id_col).as_str() else {
                        continue;
                    };
                    let kind_cell = cell(row, kind_col);
                    match kind_cell.as_str().and_then(VisitKind::from_label) {
                        Some(VisitKind::FirstVisit) => {
                            if !opened.insert(id) {
                                failures.push((i, format!("{} already has a first visit", id)));
                            }
                        }
                        Some(VisitKind::FollowUp) => {
                            if !opened.contains(id) {
                                failures.push((i, format!("follow-up of {} before its first visit", id)));
                            }
                        }
                        None => failures.push((
                            i,
                            format!("{} = {:?} is not a visit kind", VISIT_KIND_COLUMN, kind_cell),
                        )),
                    }
                }
                Evaluation::Rows(failures)
            }

            // ── Custom ────────────────────────────────────────────────────────
            // An unregistered name is itself a failure so misconfigured rule
            // lists surface immediately.
            VerificationRuleType::Custom { function_name } => {
                match self.custom_rules.get(function_name.as_str()) {
                    Some(f) => Evaluation::Rows(
                        (0..sheet.rows.len())
                            .filter_map(|i| f(sheet, i).map(|m| (i, m)))
                            .collect(),
                    ),
                    None => Evaluation::Sheet(format!(
                        "no custom rule registered for function name '{}'",
                        function_name
                    )),
                }
            }
        };
        Ok(eval)
    }
}

impl Default for SheetVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Verifier for SheetVerifier {
    fn verify(&self, sheet: &SheetRows, rules: &[VerificationRule]) -> HubResult<VerificationReport> {
        let mut failures: Vec<VerificationFailure> = Vec::new();

        for rule in rules {
            debug!(
                sheet = %sheet.name,
                rule_id = %rule.rule_id,
                description = %rule.description,
                "evaluating verification rule"
            );

            match self.evaluate(sheet, &rule.rule_type)? {
                Evaluation::Sheet(message) => {
                    warn!(sheet = %sheet.name, rule_id = %rule.rule_id, %message, "sheet rule failed");
                    failures.push(VerificationFailure {
                        rule_id: rule.rule_id.clone(),
                        row: None,
                        message,
                    });
                }
                Evaluation::Rows(rows) => {
                    for (index, message) in rows {
                        // Header is row 1.
                        let row = index + 2;
                        warn!(sheet = %sheet.name, rule_id = %rule.rule_id, row, %message, "row rule failed");
                        failures.push(VerificationFailure {
                            rule_id: rule.rule_id.clone(),
                            row: Some(row),
                            message,
                        });
                    }
                }
            }
        }

        let passed = failures.is_empty();
        debug!(
            sheet = %sheet.name,
            rows = sheet.rows.len(),
            passed,
            failure_count = failures.len(),
            "verification complete"
        );

        Ok(VerificationReport {
            sheet: sheet.name.clone(),
            rows_checked: sheet.rows.len(),
            passed,
            failures,
        })
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

enum Evaluation {
    Sheet(String),
    Rows(Vec<(usize, String)>),
}

fn cell(row: &[Cell], col: usize) -> &Cell {
    row.get(col).unwrap_or(&EMPTY)
}

fn per_row<F>(sheet: &SheetRows, check: F) -> Evaluation
where
    F: Fn(&[Cell]) -> Option<String>,
{
    Evaluation::Rows(
        sheet
            .rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| check(row).map(|m| (i, m)))
            .collect(),
    )
}

fn missing_column(name: &str) -> Evaluation {
    Evaluation::Sheet(format!("column '{}' not found", name))
}

/// Header names paired with their column indices.
fn resolve<'a>(sheet: &SheetRows, columns: &'a [String]) -> Result<Vec<(&'a str, usize)>, Evaluation> {
    columns
        .iter()
        .map(|name| {
            sheet
                .column(name)
                .map(|c| (name.as_str(), c))
                .ok_or_else(|| missing_column(name))
        })
        .collect()
}

/// Names of the listed columns that hold a value, comma-separated.
fn non_empty(row: &[Cell], cols: &[(&str, usize)]) -> Option<String> {
    let filled: Vec<&str> = cols
        .iter()
        .filter(|(_, c)| !cell(row, *c).is_empty())
        .map(|(name, _)| *name)
        .collect();
    (!filled.is_empty()).then(|| filled.join(", "))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use hub_contracts::{
        cell::Cell,
        cohort::Cohort,
        error::HubError,
        schema::HEADERS,
        sheet::SheetRows,
        verify::{VerificationRule, VerificationRuleType},
    };
    use hub_core::traits::Verifier;

    use super::SheetVerifier;

    // ── Builder helpers ───────────────────────────────────────────────────────

    fn make_sheet(headers: &[&str], rows: Vec<Vec<Cell>>) -> SheetRows {
        let mut sheet = SheetRows::new("ESPA", headers.iter().map(|h| h.to_string()).collect());
        sheet.rows = rows;
        sheet
    }

    fn rule(id: &str, rule_type: VerificationRuleType) -> VerificationRule {
        VerificationRule::new(id, "test rule", rule_type)
    }

    fn names(columns: &[&str]) -> Vec<String> {
        columns.iter().map(|c| c.to_string()).collect()
    }

    fn text(s: &str) -> Cell {
        Cell::text(s)
    }

    // ── HeaderMatch ───────────────────────────────────────────────────────────

    #[test]
    fn test_header_match_pass_and_fail() {
        let verifier = SheetVerifier::new();
        let rules = [rule("headers", VerificationRuleType::HeaderMatch)];

        let good = make_sheet(&HEADERS, vec![]);
        assert!(verifier.verify(&good, &rules).unwrap().passed);

        let mut renamed = HEADERS;
        renamed[0] = "ID";
        let report = verifier.verify(&make_sheet(&renamed, vec![]), &rules).unwrap();
        assert!(!report.passed);
        assert_eq!(report.failures[0].row, None);
        assert!(report.failures[0].message.contains("ID_Paciente"));
    }

    // ── Flags ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_flag_columns_report_row_number() {
        let verifier = SheetVerifier::new();
        let sheet = make_sheet(
            &["A", "B"],
            vec![vec![text("SI"), text("NO")], vec![text("SI"), text("yes")]],
        );
        let rules = [rule(
            "flags",
            VerificationRuleType::FlagColumns {
                columns: names(&["A", "B"]),
            },
        )];
        let report = verifier.verify(&sheet, &rules).unwrap();
        assert!(!report.passed);
        assert_eq!(report.rows_checked, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].row, Some(3));
        assert!(report.failures[0].message.contains('B'));
    }

    #[test]
    fn test_flag_subset() {
        let verifier = SheetVerifier::new();
        let sheet = make_sheet(
            &["NAD_x", "NAT_x"],
            vec![
                vec![text("SI"), text("SI")],
                vec![text("SI"), text("NO")],
                vec![text("NO"), text("SI")],
            ],
        );
        let rules = [rule(
            "tender-within-swollen",
            VerificationRuleType::FlagSubset {
                subset: names(&["NAT_x"]),
                superset: names(&["NAD_x"]),
            },
        )];
        let report = verifier.verify(&sheet, &rules).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].row, Some(4));
    }

    // ── Blanks ────────────────────────────────────────────────────────────────

    #[test]
    fn test_blank_on_first_visit_only() {
        let verifier = SheetVerifier::new();
        let sheet = make_sheet(
            &["Tipo_Visita", "EVA_Global"],
            vec![
                vec![text("Primera Visita"), Cell::Empty],
                vec![text("Seguimiento"), Cell::Number(4.2)],
                vec![text("Primera Visita"), Cell::Number(3.0)],
            ],
        );
        let rules = [rule(
            "first-visit-blanks",
            VerificationRuleType::BlankOnFirstVisit {
                columns: names(&["EVA_Global"]),
            },
        )];
        let report = verifier.verify(&sheet, &rules).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].row, Some(4));
    }

    #[test]
    fn test_always_blank_treats_short_rows_as_empty() {
        let verifier = SheetVerifier::new();
        let sheet = make_sheet(&["A", "Cambio_Motivo"], vec![vec![text("x")]]);
        let rules = [rule(
            "blank",
            VerificationRuleType::AlwaysBlank {
                columns: names(&["Cambio_Motivo"]),
            },
        )];
        assert!(verifier.verify(&sheet, &rules).unwrap().passed);
    }

    // ── Numbers ───────────────────────────────────────────────────────────────

    #[test]
    fn test_numeric_range() {
        let verifier = SheetVerifier::new();
        let sheet = make_sheet(
            &["HAQ_Total"],
            vec![
                vec![Cell::Number(1.25)],
                vec![Cell::Empty],
                vec![Cell::Number(3.5)],
                vec![text("n/a")],
            ],
        );
        let rules = [rule(
            "haq-range",
            VerificationRuleType::NumericRange {
                column: "HAQ_Total".to_string(),
                min: 0.0,
                max: 3.0,
            },
        )];
        let report = verifier.verify(&sheet, &rules).unwrap();
        let rows: Vec<Option<usize>> = report.failures.iter().map(|f| f.row).collect();
        assert_eq!(rows, vec![Some(4), Some(5)]);
    }

    #[test]
    fn test_mean_of() {
        let verifier = SheetVerifier::new();
        let sheet = make_sheet(
            &["P1", "P2", "P3", "R"],
            vec![
                vec![Cell::Integer(2), Cell::Integer(3), Cell::Integer(3), Cell::Number(2.7)],
                vec![Cell::Integer(2), Cell::Integer(3), Cell::Integer(3), Cell::Number(2.6)],
                vec![Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty],
            ],
        );
        let rules = [rule(
            "mean",
            VerificationRuleType::MeanOf {
                result: "R".to_string(),
                components: names(&["P1", "P2", "P3"]),
                decimals: 1,
            },
        )];
        let report = verifier.verify(&sheet, &rules).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].row, Some(3));
    }

    // ── Identifiers ───────────────────────────────────────────────────────────

    #[test]
    fn test_identifier_pattern() {
        let verifier = SheetVerifier::new();
        let sheet = make_sheet(
            &["ID_Paciente"],
            vec![
                vec![text("ESP-2024-001")],
                vec![text("ESP-2026-001")],
                vec![text("APS-2025-010")],
                vec![text("ESP-2025-07")],
            ],
        );
        let rules = [rule(
            "ids",
            VerificationRuleType::IdentifierPattern { cohort: Cohort::Espa },
        )];
        let report = verifier.verify(&sheet, &rules).unwrap();
        let rows: Vec<Option<usize>> = report.failures.iter().map(|f| f.row).collect();
        assert_eq!(rows, vec![Some(3), Some(4), Some(5)]);
        assert_eq!(
            SheetVerifier::identifier_regex(Cohort::Aps).unwrap().as_str(),
            r"^APS-(2024|2025)-\d{3}$"
        );
    }

    #[test]
    fn test_visit_sequence() {
        let verifier = SheetVerifier::new();
        let sheet = make_sheet(
            &["ID_Paciente", "Tipo_Visita"],
            vec![
                vec![text("ESP-2024-001"), text("Primera Visita")],
                vec![text("ESP-2024-001"), text("Seguimiento")],
                vec![text("ESP-2024-001"), text("Primera Visita")],
                vec![text("ESP-2025-002"), text("Seguimiento")],
                vec![text("ESP-2025-002"), text("Primera Visita")],
                vec![text("ESP-2025-003"), text("Alta")],
            ],
        );
        let rules = [rule("visits", VerificationRuleType::VisitSequence)];
        let report = verifier.verify(&sheet, &rules).unwrap();
        let rows: Vec<Option<usize>> = report.failures.iter().map(|f| f.row).collect();
        assert_eq!(rows, vec![Some(4), Some(5), Some(7)]);
        assert!(report.failures[0].message.contains("already has a first visit"));
        assert!(report.failures[1].message.contains("before its first visit"));
    }

    // ── Missing columns ───────────────────────────────────────────────────────

    #[test]
    fn test_missing_column_is_sheet_level_failure() {
        let verifier = SheetVerifier::new();
        let sheet = make_sheet(&["A"], vec![vec![text("SI")]]);
        let rules = [rule(
            "range",
            VerificationRuleType::NumericRange {
                column: "PCR".to_string(),
                min: 0.0,
                max: 100.0,
            },
        )];
        let report = verifier.verify(&sheet, &rules).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].row, None);
        assert!(report.failures[0].message.contains("PCR"));
    }

    // ── Custom rules ──────────────────────────────────────────────────────────

    #[test]
    fn test_custom_rule_pass_and_fail() {
        let mut verifier = SheetVerifier::new();
        verifier.register_rule("always-pass", Box::new(|_, _| None));
        verifier.register_rule(
            "second-row-fails",
            Box::new(|_, i| (i == 1).then(|| "second row rejected".to_string())),
        );
        let sheet = make_sheet(&["A"], vec![vec![text("x")], vec![text("y")]]);

        let pass = [rule(
            "custom-pass",
            VerificationRuleType::Custom {
                function_name: "always-pass".to_string(),
            },
        )];
        assert!(verifier.verify(&sheet, &pass).unwrap().passed);

        let fail = [rule(
            "custom-fail",
            VerificationRuleType::Custom {
                function_name: "second-row-fails".to_string(),
            },
        )];
        let report = verifier.verify(&sheet, &fail).unwrap();
        assert_eq!(report.failures[0].rule_id, "custom-fail");
        assert_eq!(report.failures[0].row, Some(3));
        assert!(report.failures[0].message.contains("rejected"));
    }

    #[test]
    fn test_unregistered_custom_rule() {
        let verifier = SheetVerifier::new();
        let sheet = make_sheet(&["A"], vec![]);
        let rules = [rule(
            "phantom-check",
            VerificationRuleType::Custom {
                function_name: "does-not-exist".to_string(),
            },
        )];
        let report = verifier.verify(&sheet, &rules).unwrap();
        assert!(!report.passed);
        assert!(report.failures[0].message.contains("does-not-exist"));
    }

    #[test]
    fn test_error_type_is_reserved_for_unevaluable_rules() {
        // Every built-in rule evaluates; none of these return Err.
        let verifier = SheetVerifier::new();
        let sheet = make_sheet(&[], vec![]);
        let rules = [
            rule("h", VerificationRuleType::HeaderMatch),
            rule("i", VerificationRuleType::IdentifierPattern { cohort: Cohort::Aps }),
        ];
        let result: Result<_, HubError> = verifier.verify(&sheet, &rules);
        let report = result.unwrap();
        assert_eq!(report.failures.len(), 2);
    }
}
