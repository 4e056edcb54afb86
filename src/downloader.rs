use crate::error::Result;
use crate::report::ReportTable;

/// File name offered for the CSV download
pub const CSV_FILE_NAME: &str = "brd_data.csv";

/// File name offered for the XLSX download
pub const XLSX_FILE_NAME: &str = "brd_data.xlsx";

/// Convert a report table to CSV format
///
/// The header row uses the table's display column names and every row is written in
/// the same column order, with timestamps as `YYYY-MM-DD HH:MM:SS`. Fields containing
/// commas, quotes or newlines are quoted.
///
/// # Arguments
/// * `table` - The (already filtered and searched) table to export
///
/// # Returns
/// * `Result<Vec<u8>>` - UTF-8 encoded CSV content
///
/// # Examples
/// ```
/// use brd_dashboard::downloader::to_csv;
/// use brd_dashboard::report::{build_table, DISPLAY_NAMES};
///
/// let table = build_table(&[], &DISPLAY_NAMES);
/// let csv = to_csv(&table).unwrap();
/// assert!(String::from_utf8(csv).unwrap().starts_with("Timestamp,Client,Version"));
/// ```
pub fn to_csv(table: &ReportTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.cells())?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()).into())
}

/// Convert a report table to XLSX format
///
/// Counters are written as numbers so the sheet can be summed directly; every other
/// column is written as text.
///
/// # Arguments
/// * `table` - The table to export
///
/// # Returns
/// * `Result<Vec<u8>>` - XLSX file content as bytes
#[cfg(feature = "web")]
pub fn to_xlsx(table: &ReportTable) -> Result<Vec<u8>> {
    use rust_xlsxwriter::{Workbook, Worksheet};

    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();

    for (c, name) in table.columns.iter().enumerate() {
        worksheet.write_string(0, c as u16, name)?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let r = (r + 1) as u32;
        let cells = row.cells();
        for (c, value) in cells.iter().enumerate().take(4) {
            worksheet.write_string(r, c as u16, value)?;
        }
        let counts = [
            row.md_downloads,
            row.pdf_downloads,
            row.docx_downloads,
            row.total_downloads,
        ];
        for (offset, count) in counts.iter().enumerate() {
            worksheet.write_number(r, (4 + offset) as u16, *count as f64)?;
        }
    }

    workbook.push_worksheet(worksheet);
    let buffer = workbook.save_to_buffer()?;

    Ok(buffer)
}
