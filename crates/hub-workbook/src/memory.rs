//! In-memory implementation of `VisitSink`.
//!
//! `InMemoryHub` flattens visits exactly as `XlsxHub` does but keeps the
//! resulting sheets in memory, so generation and verification can run without
//! touching the filesystem.

use std::collections::BTreeMap;

use tracing::info;

use hub_contracts::{
    cohort::Cohort, error::HubResult, schema::HEADERS, sheet::SheetRows, visit::Visit,
};
use hub_core::traits::VisitSink;

use crate::row::visit_to_cells;

#[derive(Debug, Clone)]
pub struct InMemoryHub {
    sheets: BTreeMap<Cohort, SheetRows>,
    finalized: bool,
}

impl InMemoryHub {
    /// An empty hub with the header row on both cohort sheets.
    pub fn new() -> Self {
        let sheets = Cohort::ALL
            .into_iter()
            .map(|cohort| (cohort, empty_sheet(cohort)))
            .collect();
        Self {
            sheets,
            finalized: false,
        }
    }

    /// The sheet holding `cohort`'s rows.
    pub fn sheet(&self, cohort: Cohort) -> &SheetRows {
        &self.sheets[&cohort]
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}

impl Default for InMemoryHub {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitSink for InMemoryHub {
    fn append(&mut self, visit: &Visit) -> HubResult<()> {
        let cohort = visit.cohort();
        self.sheets
            .entry(cohort)
            .or_insert_with(|| empty_sheet(cohort))
            .rows
            .push(visit_to_cells(visit));
        Ok(())
    }

    fn finalize(&mut self) -> HubResult<()> {
        self.finalized = true;
        info!(
            espa_rows = self.sheet(Cohort::Espa).rows.len(),
            aps_rows = self.sheet(Cohort::Aps).rows.len(),
            "in-memory hub finalized"
        );
        Ok(())
    }
}

fn empty_sheet(cohort: Cohort) -> SheetRows {
    SheetRows::new(
        cohort.sheet_name(),
        HEADERS.iter().map(|h| h.to_string()).collect(),
    )
}
