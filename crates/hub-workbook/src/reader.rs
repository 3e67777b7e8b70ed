//! Reading hub sheets back with calamine.

use std::path::Path;

use calamine::{open_workbook, Data, Range, Reader, Xlsx};

use hub_contracts::{
    cell::Cell,
    error::{HubError, HubResult},
    sheet::SheetRows,
};

pub(crate) type XlsxFile = Xlsx<std::io::BufReader<std::fs::File>>;

pub(crate) fn open(path: &Path) -> HubResult<XlsxFile> {
    open_workbook(path).map_err(|e: calamine::XlsxError| HubError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Sheet `name` of an open workbook as header row plus data rows, or `None`
/// when the workbook has no such sheet.
pub(crate) fn load_sheet(workbook: &mut XlsxFile, name: &str) -> HubResult<Option<SheetRows>> {
    if !workbook.sheet_names().iter().any(|s| s == name) {
        return Ok(None);
    }
    let range = workbook
        .worksheet_range(name)
        .map_err(|e| HubError::Workbook {
            reason: format!("failed to read sheet '{}': {}", name, e),
        })?;
    Ok(Some(range_to_rows(name, &range)))
}

/// Read sheet `sheet` of the workbook at `path`.
pub fn read_sheet(path: impl AsRef<Path>, sheet: &str) -> HubResult<SheetRows> {
    let mut workbook = open(path.as_ref())?;
    load_sheet(&mut workbook, sheet)?.ok_or_else(|| HubError::MissingSheet {
        sheet: sheet.to_string(),
    })
}

/// Sheet names of the workbook at `path`, in workbook order.
pub fn sheet_names(path: impl AsRef<Path>) -> HubResult<Vec<String>> {
    Ok(open(path.as_ref())?.sheet_names())
}

fn range_to_rows(name: &str, range: &Range<Data>) -> SheetRows {
    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|header| header.iter().map(|d| data_to_cell(d).as_str().unwrap_or("").to_string()).collect())
        .unwrap_or_default();
    let mut sheet = SheetRows::new(name, headers);
    sheet.rows = rows.map(|row| row.iter().map(data_to_cell).collect()).collect();
    sheet
}

pub(crate) fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Integer(*i),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => Cell::Text(format!("{dt:?}")),
        Data::DateTimeIso(dt) => Cell::Text(dt.clone()),
        Data::DurationIso(d) => Cell::Text(d.clone()),
        Data::Error(e) => Cell::Text(format!("{e:?}")),
    }
}
