//! One dashboard render: load, filter, aggregate and assemble.

use crate::aggregate::{
    ClientDownloads, DownloadBreakdown, SummaryMetrics, TOP_CLIENT_LIMIT, TrendPoint,
    download_breakdown, summary_metrics, top_clients, trend_series,
};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::filter::{FilterCriteria, client_options, filter};
use crate::record::{ContentRecord, Submission};
use crate::report::{ContentLookup, DISPLAY_NAMES, ReportTable, build_table, lookup_content};
use crate::sheet::{load_content, load_submissions};
use crate::source::SheetSource;
use chrono::NaiveDate;
use log::{error, info};
use serde::{Deserialize, Serialize};

/// Both tables of the record store, typed and validated
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub submissions: Vec<Submission>,
    pub content: Vec<ContentRecord>,
}

impl Dataset {
    pub fn lookup_content(&self, client_name: &str, version_number: &str) -> ContentLookup<'_> {
        lookup_content(client_name, version_number, &self.content)
    }
}

/// What the user asked to see
///
/// Missing dates default to the first and last submission dates, and an empty
/// client list means every client.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ViewQuery {
    #[serde(default)]
    pub clients: Vec<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    #[serde(default)]
    pub search: String,
}

impl ViewQuery {
    pub fn criteria(&self, submissions: &[Submission]) -> FilterCriteria {
        let span = FilterCriteria::spanning(submissions);
        FilterCriteria::new(
            self.date_from.unwrap_or(span.date_from),
            self.date_to.unwrap_or(span.date_to),
        )
        .with_clients(self.clients.iter().cloned())
    }
}

/// Non-fatal conditions the presentation layer shows instead of data
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    DataSourceUnavailable { message: String },
    NoResults,
}

/// Everything one render of the dashboard displays
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DashboardView {
    pub notice: Option<Notice>,
    pub client_options: Vec<String>,
    pub criteria: Option<FilterCriteria>,
    pub metrics: SummaryMetrics,
    pub trend: Vec<TrendPoint>,
    pub breakdown: DownloadBreakdown,
    pub top_clients: Vec<ClientDownloads>,
    pub table: ReportTable,
}

impl DashboardView {
    /// Metrics and charts cover the filtered rows; the table is additionally searched
    pub fn build(dataset: &Dataset, query: &ViewQuery) -> Self {
        let criteria = query.criteria(&dataset.submissions);
        let filtered = filter(&dataset.submissions, &criteria);
        let table = build_table(&filtered, &DISPLAY_NAMES).search(&query.search);

        DashboardView {
            notice: table.is_empty().then_some(Notice::NoResults),
            client_options: client_options(&dataset.submissions),
            criteria: Some(criteria),
            metrics: summary_metrics(&filtered),
            trend: trend_series(&filtered),
            breakdown: download_breakdown(&filtered),
            top_clients: top_clients(&filtered, TOP_CLIENT_LIMIT),
            table,
        }
    }

    /// Empty, disabled view shown when the record store could not be read
    pub fn unavailable(err: &DashboardError) -> Self {
        DashboardView {
            notice: Some(Notice::DataSourceUnavailable {
                message: err.to_string(),
            }),
            client_options: Vec::new(),
            criteria: None,
            metrics: summary_metrics(&[]),
            trend: Vec::new(),
            breakdown: DownloadBreakdown::default(),
            top_clients: Vec::new(),
            table: build_table(&[], &DISPLAY_NAMES),
        }
    }
}

/// Reads the two sheets named in the configuration from an injected source
pub struct Dashboard<S> {
    source: S,
    workbook: String,
    submissions_sheet: String,
    content_sheet: String,
}

impl<S: SheetSource> Dashboard<S> {
    pub fn new(source: S, config: &DashboardConfig) -> Self {
        Dashboard {
            source,
            workbook: config.workbook.clone(),
            submissions_sheet: config.submissions_sheet.clone(),
            content_sheet: config.content_sheet.clone(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn load(&self) -> Result<Dataset> {
        let raw = self.source.fetch(&self.workbook, &self.submissions_sheet)?;
        let submissions = load_submissions(&raw, &self.submissions_sheet)?;

        let raw = self.source.fetch(&self.workbook, &self.content_sheet)?;
        let content = load_content(&raw, &self.content_sheet)?;

        info!(
            "loaded {} submissions and {} content rows from {}",
            submissions.len(),
            content.len(),
            self.source.name()
        );

        Ok(Dataset {
            submissions,
            content,
        })
    }

    /// Loads and renders; a load failure becomes a notice rather than an error
    pub fn view(&self, query: &ViewQuery) -> DashboardView {
        match self.load() {
            Ok(dataset) => DashboardView::build(&dataset, query),
            Err(e) => {
                error!("unable to load dashboard data: {}", e);
                DashboardView::unavailable(&e)
            }
        }
    }
}
