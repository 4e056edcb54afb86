//! Summary statistics over a filtered set of submissions.
//!
//! Every function here is total: an empty slice produces zero-valued results, and
//! download sums saturate instead of overflowing.

use crate::record::Submission;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Number of clients kept in the top-clients ranking
pub const TOP_CLIENT_LIMIT: usize = 5;

/// The four headline metric values
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct SummaryMetrics {
    pub total_count: usize,
    pub unique_clients: usize,
    pub total_downloads: u64,
    pub avg_downloads_per_record: f64,
}

/// Submissions generated on one calendar date
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub count: usize,
}

/// Downloads per file format
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct DownloadBreakdown {
    pub md: u64,
    pub pdf: u64,
    pub docx: u64,
}

impl DownloadBreakdown {
    pub fn total(&self) -> u64 {
        self.md.saturating_add(self.pdf).saturating_add(self.docx)
    }

    /// Labelled values in display order, ready for a pie or donut chart
    pub fn slices(&self) -> [(&'static str, u64); 3] {
        [("Markdown", self.md), ("PDF", self.pdf), ("DOCX", self.docx)]
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ClientDownloads {
    pub client_name: String,
    pub total_downloads: u64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn summary_metrics(filtered: &[Submission]) -> SummaryMetrics {
    let total_count = filtered.len();
    let unique_clients = filtered
        .iter()
        .map(|s| s.client_name.as_str())
        .collect::<HashSet<_>>()
        .len();
    let total_downloads = filtered
        .iter()
        .map(Submission::total_downloads)
        .fold(0u64, u64::saturating_add);

    let avg_downloads_per_record = if total_count == 0 {
        0.0
    } else {
        round2(total_downloads as f64 / total_count as f64)
    };

    SummaryMetrics {
        total_count,
        unique_clients,
        total_downloads,
        avg_downloads_per_record,
    }
}

/// Per-date submission counts, ascending by date
///
/// Only dates that have at least one submission appear; see `zero_filled` for a
/// continuous series.
pub fn trend_series(filtered: &[Submission]) -> Vec<TrendPoint> {
    let mut by_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for submission in filtered {
        *by_date.entry(submission.date()).or_insert(0) += 1;
    }

    by_date
        .into_iter()
        .map(|(date, count)| TrendPoint { date, count })
        .collect()
}

/// Expands a trend series so every date between its first and last point is present
pub fn zero_filled(series: &[TrendPoint]) -> Vec<TrendPoint> {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Vec::new();
    };

    let counts: HashMap<NaiveDate, usize> = series.iter().map(|p| (p.date, p.count)).collect();
    first
        .date
        .iter_days()
        .take_while(|date| *date <= last.date)
        .map(|date| TrendPoint {
            date,
            count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

pub fn download_breakdown(filtered: &[Submission]) -> DownloadBreakdown {
    filtered
        .iter()
        .fold(DownloadBreakdown::default(), |mut acc, s| {
            acc.md = acc.md.saturating_add(s.download_count_md);
            acc.pdf = acc.pdf.saturating_add(s.download_count_pdf);
            acc.docx = acc.docx.saturating_add(s.download_count_docx);
            acc
        })
}

/// Clients ranked by total downloads, highest first, at most `limit` entries
///
/// Clients with equal totals keep the order in which they first appear in `filtered`.
pub fn top_clients(filtered: &[Submission], limit: usize) -> Vec<ClientDownloads> {
    let mut ranking: Vec<ClientDownloads> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for submission in filtered {
        let name = submission.client_name.as_str();
        let idx = *positions.entry(name).or_insert_with(|| {
            ranking.push(ClientDownloads {
                client_name: name.to_string(),
                total_downloads: 0,
            });
            ranking.len() - 1
        });
        let entry = &mut ranking[idx];
        entry.total_downloads = entry
            .total_downloads
            .saturating_add(submission.total_downloads());
    }

    // sort_by is stable, so ties stay in first-encounter order
    ranking.sort_by(|a, b| b.total_downloads.cmp(&a.total_downloads));
    ranking.truncate(limit);
    ranking
}
