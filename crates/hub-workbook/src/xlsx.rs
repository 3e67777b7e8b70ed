//! The file-backed visit sink.
//!
//! `XlsxHub` loads an initialized workbook once, collects appended rows in
//! memory and rewrites the whole file on `finalize`. rust_xlsxwriter cannot
//! edit a file in place, so the reference sheets are carried over from what
//! was read at open time.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use hub_contracts::{
    cell::Cell,
    cohort::Cohort,
    error::{HubError, HubResult},
    schema::{HEADERS, MEDICATIONS_SHEET, STAFF_SHEET},
    sheet::SheetRows,
    visit::Visit,
};
use hub_core::traits::VisitSink;

use crate::{
    initializer::{reference_specs, write_workbook, SheetSpec, COHORT_COLUMN_WIDTH},
    reader::{self, XlsxFile},
    row::visit_to_cells,
};

/// An initialized hub workbook opened for generation.
#[derive(Debug)]
pub struct XlsxHub {
    path: PathBuf,
    rows: BTreeMap<Cohort, Vec<Vec<Cell>>>,
    medications: Vec<Vec<Cell>>,
    staff: Vec<Vec<Cell>>,
}

impl XlsxHub {
    /// Open the workbook at `path` and check its cohort sheets.
    ///
    /// Fails with `MissingSheet` when a cohort sheet is absent and with
    /// `SchemaMismatch` when its header row differs from `HEADERS`. Data rows
    /// already present on the cohort sheets are discarded: generation always
    /// writes from row 2.
    pub fn open(path: impl AsRef<Path>) -> HubResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut workbook = reader::open(&path)?;

        let mut rows = BTreeMap::new();
        for cohort in Cohort::ALL {
            let sheet = reader::load_sheet(&mut workbook, cohort.sheet_name())?.ok_or_else(|| {
                HubError::MissingSheet {
                    sheet: cohort.sheet_name().to_string(),
                }
            })?;
            check_headers(&sheet)?;
            if !sheet.rows.is_empty() {
                warn!(
                    sheet = %cohort,
                    rows = sheet.rows.len(),
                    "discarding existing data rows"
                );
            }
            rows.insert(cohort, Vec::new());
        }

        let medications = reference_rows(&mut workbook, MEDICATIONS_SHEET)?;
        let staff = reference_rows(&mut workbook, STAFF_SHEET)?;

        debug!(
            path = %path.display(),
            medications = medications.len(),
            staff = staff.len(),
            "hub workbook opened"
        );
        Ok(Self {
            path,
            rows,
            medications,
            staff,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows appended so far for `cohort`.
    pub fn row_count(&self, cohort: Cohort) -> usize {
        self.rows.get(&cohort).map_or(0, Vec::len)
    }

    /// Rewrite the workbook with every appended row.
    pub fn save(&self) -> HubResult<()> {
        let no_rows = Vec::new();
        let mut sheets: Vec<SheetSpec<'_>> = Cohort::ALL
            .iter()
            .map(|cohort| SheetSpec {
                name: cohort.sheet_name(),
                headers: &HEADERS,
                width: COHORT_COLUMN_WIDTH,
                rows: self.rows.get(cohort).unwrap_or(&no_rows),
            })
            .collect();
        sheets.extend(reference_specs(&self.medications, &self.staff));

        write_workbook(&self.path, &sheets)?;
        info!(
            path = %self.path.display(),
            espa_rows = self.row_count(Cohort::Espa),
            aps_rows = self.row_count(Cohort::Aps),
            "hub workbook saved"
        );
        Ok(())
    }
}

impl VisitSink for XlsxHub {
    fn append(&mut self, visit: &Visit) -> HubResult<()> {
        self.rows
            .entry(visit.cohort())
            .or_default()
            .push(visit_to_cells(visit));
        Ok(())
    }

    fn finalize(&mut self) -> HubResult<()> {
        self.save()
    }
}

fn check_headers(sheet: &SheetRows) -> HubResult<()> {
    if sheet.headers.len() != HEADERS.len() {
        return Err(HubError::SchemaMismatch {
            sheet: sheet.name.clone(),
            reason: format!(
                "expected {} columns, found {}",
                HEADERS.len(),
                sheet.headers.len()
            ),
        });
    }
    if let Some((index, (found, expected))) = sheet
        .headers
        .iter()
        .zip(HEADERS)
        .enumerate()
        .find(|(_, (found, expected))| found.as_str() != *expected)
    {
        return Err(HubError::SchemaMismatch {
            sheet: sheet.name.clone(),
            reason: format!(
                "column {} is '{}', expected '{}'",
                index + 1,
                found,
                expected
            ),
        });
    }
    Ok(())
}

/// Data rows of a reference sheet. A missing sheet is recreated empty.
fn reference_rows(workbook: &mut XlsxFile, name: &str) -> HubResult<Vec<Vec<Cell>>> {
    match reader::load_sheet(workbook, name)? {
        Some(sheet) => Ok(sheet.rows),
        None => {
            warn!(sheet = name, "reference sheet missing; it will be recreated empty");
            Ok(Vec::new())
        }
    }
}
