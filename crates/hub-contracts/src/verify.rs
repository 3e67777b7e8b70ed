//! Verification rule and report types for populated cohort sheets.
//!
//! The verifier re-reads a sheet as flat rows and runs a list of
//! `VerificationRule`s against every row. All failures are collected so an
//! operator sees the full picture in one pass.

use serde::{Deserialize, Serialize};

use crate::cohort::Cohort;

/// A single rule applied to every data row of a sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRule {
    /// Unique identifier for this rule, referenced in failure reports.
    pub rule_id: String,
    /// Human-readable description for logs and operator tooling.
    pub description: String,
    /// The check to apply.
    pub rule_type: VerificationRuleType,
}

impl VerificationRule {
    pub fn new(
        rule_id: impl Into<String>,
        description: impl Into<String>,
        rule_type: VerificationRuleType,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            description: description.into(),
            rule_type,
        }
    }
}

/// The kinds of checks the verifier supports.
///
/// Column references are header names, resolved against the sheet's own
/// header row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VerificationRuleType {
    /// The sheet's header row must equal the hub schema exactly.
    HeaderMatch,

    /// Every listed column must hold `SI` or `NO`.
    FlagColumns { columns: Vec<String> },

    /// Wherever a `subset` column is `SI`, the paired `superset` column must
    /// be `SI` too. Columns are paired by position.
    FlagSubset {
        subset: Vec<String>,
        superset: Vec<String>,
    },

    /// The listed columns must be empty on rows whose `Tipo_Visita` is the
    /// first visit.
    BlankOnFirstVisit { columns: Vec<String> },

    /// The listed columns must be empty on every row.
    AlwaysBlank { columns: Vec<String> },

    /// When non-empty, the column must be numeric and lie in `[min, max]`.
    NumericRange { column: String, min: f64, max: f64 },

    /// When `result` is non-empty it must equal the mean of `components`,
    /// rounded to `decimals` places.
    MeanOf {
        result: String,
        components: Vec<String>,
        decimals: u32,
    },

    /// `ID_Paciente` must match the identifier pattern of `cohort`.
    IdentifierPattern { cohort: Cohort },

    /// Every `ID_Paciente` has exactly one first-visit row, and it comes
    /// before that patient's follow-ups.
    VisitSequence,

    /// Delegate to a named function registered by the hosting application.
    Custom { function_name: String },
}

/// The result of running every rule against every row of a sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Sheet that was checked.
    pub sheet: String,
    /// Number of data rows inspected (header excluded).
    pub rows_checked: usize,
    /// True only if no rule failed on any row.
    pub passed: bool,
    /// All failures collected during this run. Empty on pass.
    pub failures: Vec<VerificationFailure>,
}

/// A single rule failure within a `VerificationReport`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationFailure {
    /// The `rule_id` of the rule that failed.
    pub rule_id: String,
    /// 1-based spreadsheet row (the header is row 1). `None` for sheet-level
    /// rules such as the header check.
    pub row: Option<usize>,
    /// Human-readable explanation of why the rule failed.
    pub message: String,
}
