//! Raw sheet tables and their conversion into typed records.
//!
//! Both tables are validated once, when they are loaded: every expected column must be
//! present in the header row, and every cell must parse into its typed field. After
//! that the rest of the crate only ever sees `Submission` and `ContentRecord`.

use crate::error::{DashboardError, Result};
use crate::record::{ContentRecord, Submission};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

pub const COL_TIMESTAMP: &str = "Timestamp";
pub const COL_CLIENT_NAME: &str = "Client_Name";
pub const COL_VERSION_NUMBER: &str = "Version_Number";
pub const COL_PREPARED_BY: &str = "Prepared_By";
pub const COL_DOWNLOADS_MD: &str = "Download_Count_MD";
pub const COL_DOWNLOADS_PDF: &str = "Download_Count_PDF";
pub const COL_DOWNLOADS_DOCX: &str = "Download_Count_DOCX";
pub const COL_TOTAL_DOWNLOADS: &str = "Total_Downloads";

/// The content sheet keys versions under a shorter column name than the form sheet
pub const COL_CONTENT_VERSION: &str = "Version";
pub const COL_CONTENT_PARTS: [&str; 4] = [
    "Part_1_Content",
    "Part_2_Content",
    "Part_3_Content",
    "Part_4_Content",
];

pub const SUBMISSION_COLUMNS: [&str; 7] = [
    COL_TIMESTAMP,
    COL_CLIENT_NAME,
    COL_VERSION_NUMBER,
    COL_PREPARED_BY,
    COL_DOWNLOADS_MD,
    COL_DOWNLOADS_PDF,
    COL_DOWNLOADS_DOCX,
];

pub const CONTENT_COLUMNS: [&str; 6] = [
    COL_CLIENT_NAME,
    COL_CONTENT_VERSION,
    COL_CONTENT_PARTS[0],
    COL_CONTENT_PARTS[1],
    COL_CONTENT_PARTS[2],
    COL_CONTENT_PARTS[3],
];

lazy_static! {
    static ref DATETIME_FORMATS: Vec<&'static str> = vec![
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%m/%d/%Y %H:%M:%S",
    ];
}

/// A sheet as fetched from the record store: a header row and string cells
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: &[&str]) -> Self {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, cells: &[&str]) {
        self.rows.push(cells.iter().map(|c| c.to_string()).collect());
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Resolves the position of every expected column or reports all missing ones at once
    pub fn require_columns(&self, sheet: &str, expected: &[&str]) -> Result<Vec<usize>> {
        let mut indices = Vec::with_capacity(expected.len());
        let mut missing = Vec::new();

        for name in expected {
            match self.column_index(name) {
                Some(idx) => indices.push(idx),
                None => missing.push(name.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(DashboardError::SchemaMismatch {
                sheet: sheet.to_string(),
                missing,
            });
        }

        Ok(indices)
    }

    /// Rows that carry at least one non-blank cell, with their 1-based sheet row number
    fn data_rows(&self) -> impl Iterator<Item = (usize, &Vec<String>)> {
        self.rows
            .iter()
            .enumerate()
            // +2: 1-based numbering plus the header row
            .map(|(i, row)| (i + 2, row))
            .filter(|(_, row)| row.iter().any(|c| !c.trim().is_empty()))
    }
}

fn cell<'a>(row: &'a [String], idx: usize) -> &'a str {
    row.get(idx).map(|s| s.trim()).unwrap_or("")
}

/// Parses a sheet timestamp in any of the accepted formats
///
/// A bare `YYYY-MM-DD` date is read as midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    for format in DATETIME_FORMATS.iter() {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

fn parse_count(value: &str) -> Option<u64> {
    if value.is_empty() {
        return Some(0);
    }
    value.parse::<u64>().ok()
}

struct RowContext<'a> {
    sheet: &'a str,
    row_number: usize,
}

impl RowContext<'_> {
    fn invalid(&self, column: &str, value: &str) -> DashboardError {
        DashboardError::InvalidValue {
            sheet: self.sheet.to_string(),
            row: self.row_number,
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    fn non_empty(&self, column: &str, value: &str) -> Result<String> {
        if value.is_empty() {
            Err(self.invalid(column, value))
        } else {
            Ok(value.to_string())
        }
    }

    fn count(&self, column: &str, value: &str) -> Result<u64> {
        parse_count(value).ok_or_else(|| self.invalid(column, value))
    }
}

/// Converts the form-submission sheet into typed submissions
pub fn load_submissions(table: &RawTable, sheet: &str) -> Result<Vec<Submission>> {
    let idx = table.require_columns(sheet, &SUBMISSION_COLUMNS)?;
    let mut submissions = Vec::with_capacity(table.rows.len());

    for (row_number, row) in table.data_rows() {
        let ctx = RowContext { sheet, row_number };

        let raw_ts = cell(row, idx[0]);
        let timestamp =
            parse_timestamp(raw_ts).ok_or_else(|| ctx.invalid(COL_TIMESTAMP, raw_ts))?;

        submissions.push(Submission {
            timestamp,
            client_name: ctx.non_empty(COL_CLIENT_NAME, cell(row, idx[1]))?,
            version_number: cell(row, idx[2]).to_string(),
            prepared_by: cell(row, idx[3]).to_string(),
            download_count_md: ctx.count(COL_DOWNLOADS_MD, cell(row, idx[4]))?,
            download_count_pdf: ctx.count(COL_DOWNLOADS_PDF, cell(row, idx[5]))?,
            download_count_docx: ctx.count(COL_DOWNLOADS_DOCX, cell(row, idx[6]))?,
        });
    }

    Ok(submissions)
}

/// Converts the content sheet into typed content records
///
/// Content parts are free text and are kept verbatim; only the key fields are trimmed.
pub fn load_content(table: &RawTable, sheet: &str) -> Result<Vec<ContentRecord>> {
    let idx = table.require_columns(sheet, &CONTENT_COLUMNS)?;
    let mut records = Vec::with_capacity(table.rows.len());

    for (row_number, row) in table.data_rows() {
        let ctx = RowContext { sheet, row_number };
        let part = |i: usize| row.get(idx[2 + i]).cloned().unwrap_or_default();

        records.push(ContentRecord {
            client_name: ctx.non_empty(COL_CLIENT_NAME, cell(row, idx[0]))?,
            version_number: cell(row, idx[1]).to_string(),
            part_1: part(0),
            part_2: part(1),
            part_3: part(2),
            part_4: part(3),
        });
    }

    Ok(records)
}
