//! Trait seams between generation and storage.
//!
//! - `VisitSink` receives typed visits as they are generated and persists
//!   them (in memory or in a workbook).
//! - `Verifier` re-checks a persisted sheet against a rule list.
//!
//! The generator only ever sees typed `Visit` records; flattening to the
//! 220-column row happens behind `VisitSink`.

use hub_contracts::{
    error::HubResult,
    sheet::SheetRows,
    verify::{VerificationReport, VerificationRule},
    visit::Visit,
};

/// Destination for generated visits.
///
/// Visits arrive grouped by cohort and, within a patient, in chronological
/// order. A failed append is fatal for the run.
pub trait VisitSink {
    /// Append one visit to the sheet of `visit.cohort()`.
    fn append(&mut self, visit: &Visit) -> HubResult<()>;

    /// Called once after the last visit. Implementations flush or save here.
    fn finalize(&mut self) -> HubResult<()>;
}

/// Sheet verifier: inspects flat rows without knowing how they were made.
pub trait Verifier {
    /// Run every rule against `sheet` and report all failures.
    ///
    /// Rule violations are reported, not returned as errors. `Err` is
    /// reserved for rules that cannot be evaluated at all, such as an
    /// identifier pattern that does not compile.
    fn verify(&self, sheet: &SheetRows, rules: &[VerificationRule]) -> HubResult<VerificationReport>;
}
