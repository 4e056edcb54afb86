//! The BRD list: display table, search and content lookup.

use crate::record::{ContentRecord, Submission};
use crate::sheet::{
    COL_CLIENT_NAME, COL_DOWNLOADS_DOCX, COL_DOWNLOADS_MD, COL_DOWNLOADS_PDF, COL_PREPARED_BY,
    COL_TIMESTAMP, COL_TOTAL_DOWNLOADS, COL_VERSION_NUMBER,
};
use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use log::warn;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Display format for timestamps in the table and in exports
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source columns of the table, in display order
pub const TABLE_COLUMNS: [&str; 8] = [
    COL_TIMESTAMP,
    COL_CLIENT_NAME,
    COL_VERSION_NUMBER,
    COL_PREPARED_BY,
    COL_DOWNLOADS_MD,
    COL_DOWNLOADS_PDF,
    COL_DOWNLOADS_DOCX,
    COL_TOTAL_DOWNLOADS,
];

lazy_static! {
    /// Human-readable header for each source column; `Timestamp` keeps its name
    pub static ref DISPLAY_NAMES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert(COL_CLIENT_NAME, "Client");
        m.insert(COL_VERSION_NUMBER, "Version");
        m.insert(COL_PREPARED_BY, "Generated By");
        m.insert(COL_DOWNLOADS_MD, "MD Downloads");
        m.insert(COL_DOWNLOADS_PDF, "PDF Downloads");
        m.insert(COL_DOWNLOADS_DOCX, "DOCX Downloads");
        m.insert(COL_TOTAL_DOWNLOADS, "Total Downloads");
        m
    };
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct TableRow {
    pub timestamp: NaiveDateTime,
    pub client: String,
    pub version: String,
    pub generated_by: String,
    pub md_downloads: u64,
    pub pdf_downloads: u64,
    pub docx_downloads: u64,
    pub total_downloads: u64,
}

impl TableRow {
    fn from_submission(s: &Submission) -> Self {
        TableRow {
            timestamp: s.timestamp,
            client: s.client_name.clone(),
            version: s.version_number.clone(),
            generated_by: s.prepared_by.clone(),
            md_downloads: s.download_count_md,
            pdf_downloads: s.download_count_pdf,
            docx_downloads: s.download_count_docx,
            total_downloads: s.total_downloads(),
        }
    }

    /// String form of every column, in `TABLE_COLUMNS` order
    pub fn cells(&self) -> [String; 8] {
        [
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.client.clone(),
            self.version.clone(),
            self.generated_by.clone(),
            self.md_downloads.to_string(),
            self.pdf_downloads.to_string(),
            self.docx_downloads.to_string(),
            self.total_downloads.to_string(),
        ]
    }

    /// Label used when picking a row for the content viewer
    pub fn label(&self) -> String {
        format!("{} - Version {}", self.client, self.version)
    }
}

/// Filtered submissions prepared for display and export
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ReportTable {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl ReportTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows where any column contains `term`, ignoring case
    ///
    /// A blank term keeps every row.
    pub fn search(&self, term: &str) -> ReportTable {
        let matcher = SearchMatcher::new(term);
        ReportTable {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| matcher.matches_row(row))
                .cloned()
                .collect(),
        }
    }
}

enum SearchMatcher {
    Everything,
    Pattern(Regex),
    Lowercase(String),
}

impl SearchMatcher {
    fn new(term: &str) -> Self {
        if term.trim().is_empty() {
            return SearchMatcher::Everything;
        }
        match RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        {
            Ok(re) => SearchMatcher::Pattern(re),
            // only reachable when the escaped term exceeds the regex size limit
            Err(_) => SearchMatcher::Lowercase(term.to_lowercase()),
        }
    }

    fn matches_row(&self, row: &TableRow) -> bool {
        match self {
            SearchMatcher::Everything => true,
            SearchMatcher::Pattern(re) => row.cells().iter().any(|c| re.is_match(c)),
            SearchMatcher::Lowercase(term) => row
                .cells()
                .iter()
                .any(|c| c.to_lowercase().contains(term.as_str())),
        }
    }
}

/// Builds the display table, renaming columns through `rename_map`
///
/// Columns absent from the map keep their source name.
pub fn build_table(filtered: &[Submission], rename_map: &HashMap<&str, &str>) -> ReportTable {
    let columns = TABLE_COLUMNS
        .iter()
        .map(|col| rename_map.get(col).copied().unwrap_or(*col).to_string())
        .collect();

    ReportTable {
        columns,
        rows: filtered.iter().map(TableRow::from_submission).collect(),
    }
}

/// Result of looking up a BRD's content
#[derive(Debug, Clone, PartialEq)]
pub enum ContentLookup<'a> {
    Found(&'a ContentRecord),
    NotFound,
}

impl<'a> ContentLookup<'a> {
    pub fn found(&self) -> Option<&'a ContentRecord> {
        match self {
            ContentLookup::Found(record) => Some(*record),
            ContentLookup::NotFound => None,
        }
    }
}

/// Finds the content for `(client_name, version_number)`
///
/// Keys should be unique. When they are not the first row wins and the duplicate is
/// logged.
pub fn lookup_content<'a>(
    client_name: &str,
    version_number: &str,
    content_index: &'a [ContentRecord],
) -> ContentLookup<'a> {
    let mut matches = content_index
        .iter()
        .filter(|r| r.matches(client_name, version_number));

    let Some(first) = matches.next() else {
        return ContentLookup::NotFound;
    };

    let duplicates = matches.count();
    if duplicates > 0 {
        warn!(
            "content index has {} rows for client {:?} version {:?}; using the first",
            duplicates + 1,
            client_name,
            version_number
        );
    }

    ContentLookup::Found(first)
}
