//! # hub-workbook
//!
//! The xlsx boundary of the clinical hub.
//!
//! ## Overview
//!
//! - `initialize` creates the four-sheet workbook with styled headers.
//! - `visit_to_cells` flattens a typed `Visit` into its 220-cell row.
//! - `XlsxHub` is the file-backed `VisitSink`: it checks the schema on open,
//!   collects rows and rewrites the workbook once on `finalize`.
//! - `InMemoryHub` is the same sink kept in memory.
//! - `read_sheet` reads any sheet back as `SheetRows` for verification.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hub_workbook::{initialize, XlsxHub};
//!
//! initialize("Hub_Clinico_Maestro.xlsx", true)?;
//! let mut hub = XlsxHub::open("Hub_Clinico_Maestro.xlsx")?;
//! hub_core::generate(&config, &mut rng, &mut hub)?;
//! ```

pub mod initializer;
pub mod memory;
pub mod reader;
pub mod row;
pub mod xlsx;

pub use initializer::{initialize, COHORT_COLUMN_WIDTH, REFERENCE_COLUMN_WIDTH};
pub use memory::InMemoryHub;
pub use reader::{read_sheet, sheet_names};
pub use row::{format_date, visit_to_cells, DATE_FORMAT};
pub use xlsx::XlsxHub;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use rand::{rngs::StdRng, SeedableRng};
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    use hub_config::GeneratorConfig;
    use hub_contracts::{
        cell::Cell,
        cohort::{Cohort, Flag, VisitKind},
        error::HubError,
        patient::EscalationTier,
        schema::{
            FieldGroup, COLUMN_COUNT, HEADERS, MEDICATIONS_SHEET, MEDICATION_HEADERS, STAFF_SHEET,
        },
        sheet::SheetRows,
        visit::Visit,
    };
    use hub_core::{
        assembler::{assemble_visit, VisitPlan},
        catalog, generate,
        patient::{build_patient_with_tier, follow_up_date},
        traits::VisitSink,
    };

    use super::{initialize, read_sheet, sheet_names, visit_to_cells, InMemoryHub, XlsxHub};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn workbook_path(dir: &TempDir) -> PathBuf {
        dir.path().join("hub.xlsx")
    }

    fn small_config() -> GeneratorConfig {
        let mut config = GeneratorConfig::default();
        config.espa.patients = 5;
        config.aps.patients = 5;
        config
    }

    fn make_visit(cohort: Cohort, kind: VisitKind, tier: EscalationTier) -> Visit {
        let mut rng = StdRng::seed_from_u64(21);
        let patient = build_patient_with_tier(&mut rng, cohort, 3, tier).unwrap();
        let date = match kind {
            VisitKind::FirstVisit => patient.treatment_start(),
            VisitKind::FollowUp => follow_up_date(&mut rng, patient.treatment_start(), 1).unwrap(),
        };
        let plan = VisitPlan {
            kind,
            date,
            max_swollen: cohort.default_max_swollen(),
        };
        assemble_visit(&mut rng, &patient, &plan).unwrap()
    }

    fn cell<'a>(row: &'a [Cell], header: &str) -> &'a Cell {
        let index = HEADERS.iter().position(|h| *h == header).unwrap();
        &row[index]
    }

    /// Cells compare equal after an xlsx round trip, where integers come back
    /// as floats.
    fn same(a: &Cell, b: &Cell) -> bool {
        match (a.is_empty(), b.is_empty()) {
            (true, true) => true,
            (false, false) => match (a, b) {
                (Cell::Text(x), Cell::Text(y)) => x == y,
                _ => a.as_f64() == b.as_f64(),
            },
            _ => false,
        }
    }

    fn write_custom(path: &Path, sheets: &[(&str, &[&str])]) {
        let mut workbook = Workbook::new();
        for (name, headers) in sheets {
            let sheet = workbook.add_worksheet();
            sheet.set_name(*name).unwrap();
            for (col, header) in headers.iter().enumerate() {
                sheet.write_string(0, col as u16, *header).unwrap();
            }
        }
        workbook.save(path).unwrap();
    }

    // ── Initializer ───────────────────────────────────────────────────────────

    #[test]
    fn test_initialize_creates_four_sheets() {
        let dir = TempDir::new().unwrap();
        let path = workbook_path(&dir);
        initialize(&path, false).unwrap();

        assert_eq!(
            sheet_names(&path).unwrap(),
            vec!["ESPA", "APS", MEDICATIONS_SHEET, STAFF_SHEET]
        );
        for cohort in Cohort::ALL {
            let sheet = read_sheet(&path, cohort.sheet_name()).unwrap();
            assert_eq!(sheet.headers, HEADERS);
            assert!(sheet.rows.is_empty());
        }
        let medications = read_sheet(&path, MEDICATIONS_SHEET).unwrap();
        assert_eq!(medications.headers, MEDICATION_HEADERS);
        assert!(medications.rows.is_empty());
    }

    #[test]
    fn test_initialize_with_reference_rows() {
        let dir = TempDir::new().unwrap();
        let path = workbook_path(&dir);
        initialize(&path, true).unwrap();

        let medications = read_sheet(&path, MEDICATIONS_SHEET).unwrap();
        let expected = catalog::medication_rows();
        assert_eq!(medications.rows.len(), expected.len());
        assert_eq!(medications.rows[0][0].as_str(), Some(expected[0][0].as_str()));

        let staff = read_sheet(&path, STAFF_SHEET).unwrap();
        assert_eq!(staff.rows.len(), catalog::CLINICIANS.len());
        assert_eq!(staff.rows[0][1].as_str(), Some(catalog::CLINICIAN_ROLE));
    }

    #[test]
    fn test_initialize_twice_gives_same_headers() {
        let dir = TempDir::new().unwrap();
        let path = workbook_path(&dir);
        initialize(&path, false).unwrap();
        let first = read_sheet(&path, "APS").unwrap().headers;
        initialize(&path, true).unwrap();
        let second = read_sheet(&path, "APS").unwrap().headers;
        assert_eq!(first, second);
        assert_eq!(second.len(), COLUMN_COUNT);
    }

    // ── Row flattening ────────────────────────────────────────────────────────

    #[test]
    fn test_rows_are_full_width() {
        for cohort in Cohort::ALL {
            for kind in [VisitKind::FirstVisit, VisitKind::FollowUp] {
                let row = visit_to_cells(&make_visit(cohort, kind, EscalationTier::Conventional));
                assert_eq!(row.len(), COLUMN_COUNT);
            }
        }
    }

    #[test]
    fn test_joint_columns_are_flags_and_totals_match() {
        let visit = make_visit(Cohort::Espa, VisitKind::FollowUp, EscalationTier::NsaidOnly);
        let row = visit_to_cells(&visit);
        for group in [FieldGroup::SwollenJoints, FieldGroup::TenderJoints, FieldGroup::Dactylitis] {
            for cell in &row[group.range()] {
                assert!(cell.as_flag().is_some(), "{group:?} cell is {cell:?}");
            }
        }
        let swollen = row[FieldGroup::SwollenJoints.range()]
            .iter()
            .filter(|c| c.as_flag() == Some(Flag::Si))
            .count();
        assert_eq!(cell(&row, "NAD_Total").as_f64(), Some(swollen as f64));
        assert_eq!(
            cell(&row, "NAT_Total").as_f64(),
            Some(visit.joints.tender.len() as f64)
        );
    }

    #[test]
    fn test_first_visit_row_blanks() {
        let row = visit_to_cells(&make_visit(Cohort::Espa, VisitKind::FirstVisit, EscalationTier::NsaidOnly));
        for group in [
            FieldGroup::PatientReported,
            FieldGroup::Labs,
            FieldGroup::Basdai,
            FieldGroup::Asdas,
            FieldGroup::TreatmentChange,
            FieldGroup::Continuation,
            FieldGroup::FollowUpDecision,
        ] {
            assert!(row[group.range()].iter().all(Cell::is_empty), "{group:?} not blank");
        }
        assert_eq!(cell(&row, "Tipo_Visita").as_str(), Some("Primera Visita"));
        assert!(cell(&row, "FR").is_empty());
        assert!(cell(&row, "Toxico_Tabaco_Desc").is_empty());
        assert!(cell(&row, "Toxico_Tabaco").as_flag().is_some());
    }

    #[test]
    fn test_tier_three_row_has_biologic_only() {
        let row = visit_to_cells(&make_visit(Cohort::Aps, VisitKind::FirstVisit, EscalationTier::Biologic));
        assert!(!cell(&row, "Trat_Biologico").is_empty());
        assert!(!cell(&row, "Trat_Biologico_Dosis").is_empty());
        assert!(cell(&row, "Trat_FAME").is_empty());
        assert!(cell(&row, "Trat_FAME_Dosis").is_empty());
        assert!(!cell(&row, "Trat_Sistemico_Dosis").is_empty());
    }

    #[test]
    fn test_dates_and_blood_pressure_format() {
        let visit = make_visit(Cohort::Aps, VisitKind::FollowUp, EscalationTier::Conventional);
        let row = visit_to_cells(&visit);
        let date = cell(&row, "Fecha_Visita").as_str().unwrap();
        assert_eq!(date, visit.identity.date.format("%Y-%m-%d").to_string());
        assert_eq!(date.len(), 10);
        let pressure = cell(&row, "TA").as_str().unwrap();
        assert_eq!(pressure.split('/').count(), 2);
        assert_eq!(cell(&row, "Diagnostico_Primario").as_str(), Some("APS"));
    }

    // ── Sinks ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_open_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = XlsxHub::open(dir.path().join("absent.xlsx"));
        assert!(matches!(result, Err(HubError::Io { .. })));
    }

    #[test]
    fn test_open_without_cohort_sheet_fails() {
        let dir = TempDir::new().unwrap();
        let path = workbook_path(&dir);
        write_custom(&path, &[("ESPA", &HEADERS)]);
        match XlsxHub::open(&path) {
            Err(HubError::MissingSheet { sheet }) => assert_eq!(sheet, "APS"),
            other => panic!("expected MissingSheet, got {other:?}"),
        }
    }

    #[test]
    fn test_open_with_wrong_headers_fails() {
        let dir = TempDir::new().unwrap();
        let path = workbook_path(&dir);
        let mut headers = HEADERS;
        headers[3] = "Fecha";
        write_custom(&path, &[("ESPA", &HEADERS), ("APS", &headers)]);
        match XlsxHub::open(&path) {
            Err(HubError::SchemaMismatch { sheet, reason }) => {
                assert_eq!(sheet, "APS");
                assert!(reason.contains("Fecha_Visita"), "{reason}");
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_xlsx_round_trip_matches_memory() {
        let dir = TempDir::new().unwrap();
        let path = workbook_path(&dir);
        initialize(&path, true).unwrap();

        let config = small_config();
        let mut hub = XlsxHub::open(&path).unwrap();
        generate(&config, &mut StdRng::seed_from_u64(99), &mut hub).unwrap();
        let mut memory = InMemoryHub::new();
        generate(&config, &mut StdRng::seed_from_u64(99), &mut memory).unwrap();
        assert!(memory.is_finalized());

        let empty = Cell::Empty;
        for cohort in Cohort::ALL {
            let read: SheetRows = read_sheet(&path, cohort.sheet_name()).unwrap();
            let expected = memory.sheet(cohort);
            assert_eq!(read.rows.len(), expected.rows.len());
            assert_eq!(read.rows.len(), hub.row_count(cohort));
            for (r, (got, want)) in read.rows.iter().zip(&expected.rows).enumerate() {
                for (c, header) in HEADERS.iter().enumerate() {
                    let got = got.get(c).unwrap_or(&empty);
                    assert!(same(got, &want[c]), "row {} {}: {:?} vs {:?}", r + 2, header, got, want[c]);
                }
            }
        }

        // Reference rows survive the rewrite.
        let staff = read_sheet(&path, STAFF_SHEET).unwrap();
        assert_eq!(staff.rows.len(), catalog::CLINICIANS.len());
    }

    #[test]
    fn test_default_run_espa_row_count() {
        let mut memory = InMemoryHub::new();
        generate(&GeneratorConfig::default(), &mut StdRng::seed_from_u64(1), &mut memory).unwrap();
        let total = memory.sheet(Cohort::Espa).total_rows();
        assert!((61..=151).contains(&total), "ESPA has {total} rows");
    }

    #[test]
    fn test_reopen_discards_previous_rows() {
        let dir = TempDir::new().unwrap();
        let path = workbook_path(&dir);
        initialize(&path, false).unwrap();

        let mut hub = XlsxHub::open(&path).unwrap();
        generate(&small_config(), &mut StdRng::seed_from_u64(5), &mut hub).unwrap();
        let first = read_sheet(&path, "ESPA").unwrap().rows.len();
        assert!(first >= 10);

        let mut hub = XlsxHub::open(&path).unwrap();
        assert_eq!(hub.row_count(Cohort::Espa), 0);
        hub.append(&make_visit(Cohort::Espa, VisitKind::FirstVisit, EscalationTier::NsaidOnly))
            .unwrap();
        hub.finalize().unwrap();
        assert_eq!(read_sheet(&path, "ESPA").unwrap().rows.len(), 1);
        assert!(read_sheet(&path, "APS").unwrap().rows.is_empty());
    }

    #[test]
    fn test_read_missing_sheet() {
        let dir = TempDir::new().unwrap();
        let path = workbook_path(&dir);
        initialize(&path, false).unwrap();
        assert!(matches!(
            read_sheet(&path, "Pacientes"),
            Err(HubError::MissingSheet { .. })
        ));
    }
}
