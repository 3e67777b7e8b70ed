//! Workbook creation: the four-sheet layout, header styling and the shared
//! writer used by both the initializer and `XlsxHub::save`.

use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatPattern, Workbook, Worksheet, XlsxError};
use tracing::info;

use hub_contracts::{
    cell::Cell,
    cohort::Cohort,
    error::{HubError, HubResult},
    schema::{HEADERS, MEDICATIONS_SHEET, MEDICATION_HEADERS, STAFF_HEADERS, STAFF_SHEET},
};
use hub_core::catalog;

/// Column width of the cohort sheets.
pub const COHORT_COLUMN_WIDTH: f64 = 13.0;

/// Column width of the reference sheets.
pub const REFERENCE_COLUMN_WIDTH: f64 = 25.0;

/// One worksheet to be written: its header row, column width and data rows.
pub(crate) struct SheetSpec<'a> {
    pub name: &'a str,
    pub headers: &'a [&'a str],
    pub width: f64,
    pub rows: &'a [Vec<Cell>],
}

/// Create the hub workbook at `path`, replacing any existing file.
///
/// Writes the `ESPA` and `APS` sheets with the full header row and the two
/// reference sheets with their headers. With `with_reference`, the reference
/// sheets are also filled from the drug catalogue and clinician roster.
pub fn initialize(path: impl AsRef<Path>, with_reference: bool) -> HubResult<()> {
    let path = path.as_ref();
    let (medications, staff) = if with_reference {
        (medication_cells(), staff_cells())
    } else {
        (Vec::new(), Vec::new())
    };
    let no_rows: Vec<Vec<Cell>> = Vec::new();

    let mut sheets: Vec<SheetSpec<'_>> = Cohort::ALL
        .iter()
        .map(|cohort| SheetSpec {
            name: cohort.sheet_name(),
            headers: &HEADERS,
            width: COHORT_COLUMN_WIDTH,
            rows: &no_rows,
        })
        .collect();
    sheets.extend(reference_specs(&medications, &staff));

    write_workbook(path, &sheets)?;
    info!(
        path = %path.display(),
        columns = HEADERS.len(),
        with_reference,
        "hub workbook initialized"
    );
    Ok(())
}

/// Drug catalogue rows for the medications sheet.
pub fn medication_cells() -> Vec<Vec<Cell>> {
    catalog::medication_rows()
        .into_iter()
        .map(|row| row.into_iter().map(Cell::from).collect())
        .collect()
}

/// Clinician roster rows for the staff sheet.
pub fn staff_cells() -> Vec<Vec<Cell>> {
    catalog::staff_rows()
        .into_iter()
        .map(|row| row.into_iter().map(Cell::from).collect())
        .collect()
}

pub(crate) fn reference_specs<'a>(
    medications: &'a [Vec<Cell>],
    staff: &'a [Vec<Cell>],
) -> [SheetSpec<'a>; 2] {
    [
        SheetSpec {
            name: MEDICATIONS_SHEET,
            headers: &MEDICATION_HEADERS,
            width: REFERENCE_COLUMN_WIDTH,
            rows: medications,
        },
        SheetSpec {
            name: STAFF_SHEET,
            headers: &STAFF_HEADERS,
            width: REFERENCE_COLUMN_WIDTH,
            rows: staff,
        },
    ]
}

/// Bold white on `#4472C4`, centred and wrapped.
pub fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x4472C4))
        .set_pattern(FormatPattern::Solid)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
}

/// Write `sheets` in order to a new workbook at `path`.
pub(crate) fn write_workbook(path: &Path, sheets: &[SheetSpec<'_>]) -> HubResult<()> {
    let mut workbook = Workbook::new();
    let header = header_format();

    for spec in sheets {
        let worksheet = workbook.add_worksheet();
        write_sheet(worksheet, spec, &header).map_err(|e| HubError::Workbook {
            reason: format!("failed to write sheet '{}': {}", spec.name, e),
        })?;
    }

    workbook.save(path).map_err(|e| HubError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn write_sheet(worksheet: &mut Worksheet, spec: &SheetSpec<'_>, header: &Format) -> Result<(), XlsxError> {
    worksheet.set_name(spec.name)?;

    for (col, title) in spec.headers.iter().enumerate() {
        let col = column(col)?;
        worksheet.write_string_with_format(0, col, *title, header)?;
        worksheet.set_column_width(col, spec.width)?;
    }

    for (index, cells) in spec.rows.iter().enumerate() {
        let row = u32::try_from(index + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, cell) in cells.iter().enumerate() {
            let col = column(col)?;
            match cell {
                Cell::Empty => {}
                Cell::Text(s) if s.is_empty() => {}
                Cell::Text(s) => {
                    worksheet.write_string(row, col, s)?;
                }
                Cell::Integer(i) => {
                    worksheet.write_number(row, col, *i as f64)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(row, col, *n)?;
                }
            }
        }
    }
    Ok(())
}

fn column(index: usize) -> Result<u16, XlsxError> {
    u16::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}
