#![allow(dead_code)]

use brd_dashboard::sheet::{CONTENT_COLUMNS, RawTable, SUBMISSION_COLUMNS};
use brd_dashboard::source::{InMemorySource, SheetSource};
use brd_dashboard::{ContentRecord, Submission};
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn ts(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").unwrap()
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

pub fn submission(
    client: &str,
    when: &str,
    version: &str,
    prepared_by: &str,
    downloads: (u64, u64, u64),
) -> Submission {
    Submission::create(client, ts(when), version, prepared_by).with_downloads(
        downloads.0,
        downloads.1,
        downloads.2,
    )
}

/// Seven BRDs for six clients between 2024-01-05 and 2024-01-12
pub fn sample_submissions() -> Vec<Submission> {
    vec![
        submission("Acme", "2024-01-05 09:15:00", "1", "alice", (1, 0, 0)),
        submission("Acme", "2024-01-05 14:30:00", "2", "bob", (0, 2, 0)),
        submission("Globex", "2024-01-07 11:00:00", "1", "Ops (EU)", (0, 0, 3)),
        submission("Initech", "2024-01-09 08:00:00", "1", "alice", (2, 2, 2)),
        submission("Umbrella", "2024-01-10 00:00:00", "3", "carol", (0, 1, 0)),
        submission("Hooli", "2024-01-10 23:59:59", "1", "bob", (4, 0, 0)),
        submission("Stark", "2024-01-12 17:45:00", "1", "carol", (0, 0, 0)),
    ]
}

pub fn sample_content() -> Vec<ContentRecord> {
    vec![
        ContentRecord::create("Acme", "1", ["Scope", "Goals", "Risks", "Timeline"]),
        ContentRecord::create("Acme", "2", ["Scope v2", "Goals v2", "Risks v2", "Timeline v2"]),
        ContentRecord::create("Globex", "1", ["G1", "G2", "G3", "G4"]),
    ]
}

/// The sample submissions as the form sheet would deliver them
pub fn submissions_sheet() -> RawTable {
    let mut table = RawTable::new(&SUBMISSION_COLUMNS);
    for s in sample_submissions() {
        let ts = s.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
        let md = s.download_count_md.to_string();
        let pdf = s.download_count_pdf.to_string();
        let docx = s.download_count_docx.to_string();
        table.push_row(&[
            ts.as_str(),
            s.client_name.as_str(),
            s.version_number.as_str(),
            s.prepared_by.as_str(),
            md.as_str(),
            pdf.as_str(),
            docx.as_str(),
        ]);
    }
    table
}

pub fn content_sheet() -> RawTable {
    let mut table = RawTable::new(&CONTENT_COLUMNS);
    for c in sample_content() {
        let mut row = vec![c.client_name.as_str(), c.version_number.as_str()];
        row.extend(c.parts());
        table.push_row(&row);
    }
    table
}

/// Both sample sheets under the default workbook and sheet names
pub fn sample_source() -> InMemorySource {
    let mut source = InMemorySource::new();
    source.insert("EMBGPT", "Sheet1", submissions_sheet());
    source.insert("EMBGPT", "BRD_Content", content_sheet());
    source
}

/// Counts how often the wrapped source is actually asked for a sheet
///
/// The counter is shared so it can still be read after the source is boxed.
pub struct CountingSource {
    pub inner: InMemorySource,
    calls: Arc<AtomicUsize>,
}

impl CountingSource {
    pub fn new() -> Self {
        CountingSource {
            inner: sample_source(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl SheetSource for CountingSource {
    fn name(&self) -> &str {
        "counting"
    }

    fn fetch(&self, workbook: &str, sheet: &str) -> brd_dashboard::Result<RawTable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(workbook, sheet)
    }
}
