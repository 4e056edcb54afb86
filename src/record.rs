use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One generated BRD and its download counters
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Submission {
    pub client_name: String,
    pub timestamp: NaiveDateTime,
    pub version_number: String,
    pub prepared_by: String,
    pub download_count_md: u64,
    pub download_count_pdf: u64,
    pub download_count_docx: u64,
}

impl Submission {
    pub fn create(
        client_name: &str,
        timestamp: NaiveDateTime,
        version_number: &str,
        prepared_by: &str,
    ) -> Self {
        Submission {
            client_name: client_name.to_string(),
            timestamp,
            version_number: version_number.to_string(),
            prepared_by: prepared_by.to_string(),
            download_count_md: 0,
            download_count_pdf: 0,
            download_count_docx: 0,
        }
    }

    pub fn with_downloads(mut self, md: u64, pdf: u64, docx: u64) -> Self {
        self.download_count_md = md;
        self.download_count_pdf = pdf;
        self.download_count_docx = docx;
        self
    }

    /// Sum of the three per-format counters, never cached
    ///
    /// Saturates at `u64::MAX` rather than wrapping.
    pub fn total_downloads(&self) -> u64 {
        self.download_count_md
            .saturating_add(self.download_count_pdf)
            .saturating_add(self.download_count_docx)
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Content of one BRD version, split into exactly four parts
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ContentRecord {
    pub client_name: String,
    pub version_number: String,
    pub part_1: String,
    pub part_2: String,
    pub part_3: String,
    pub part_4: String,
}

impl ContentRecord {
    pub fn create(client_name: &str, version_number: &str, parts: [&str; 4]) -> Self {
        ContentRecord {
            client_name: client_name.to_string(),
            version_number: version_number.to_string(),
            part_1: parts[0].to_string(),
            part_2: parts[1].to_string(),
            part_3: parts[2].to_string(),
            part_4: parts[3].to_string(),
        }
    }

    pub fn parts(&self) -> [&str; 4] {
        [&self.part_1, &self.part_2, &self.part_3, &self.part_4]
    }

    /// All four parts joined with blank lines, as shown in the full-content view
    pub fn full_content(&self) -> String {
        self.parts().join("\n\n")
    }

    pub fn matches(&self, client_name: &str, version_number: &str) -> bool {
        self.client_name == client_name && self.version_number == version_number
    }
}
