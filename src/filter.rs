use crate::record::Submission;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Client selection that disables client filtering
pub const ALL_CLIENTS: &str = "All";

/// Client and inclusive date-range selection applied to submissions
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct FilterCriteria {
    pub clients: BTreeSet<String>,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl FilterCriteria {
    pub fn new(date_from: NaiveDate, date_to: NaiveDate) -> Self {
        FilterCriteria {
            clients: BTreeSet::new(),
            date_from,
            date_to,
        }
    }

    pub fn with_clients<I, T>(mut self, clients: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.clients = clients.into_iter().map(Into::into).collect();
        self
    }

    /// All clients over the full date span of `submissions`
    ///
    /// An empty table has no span, so today's date is used for both ends.
    pub fn spanning(submissions: &[Submission]) -> Self {
        let dates = submissions.iter().map(Submission::date);
        let from = dates.clone().min();
        let to = dates.max();
        match (from, to) {
            (Some(from), Some(to)) => FilterCriteria::new(from, to),
            _ => {
                let today = Local::now().date_naive();
                FilterCriteria::new(today, today)
            }
        }
    }

    pub fn selects_all_clients(&self) -> bool {
        self.clients.is_empty() || self.clients.contains(ALL_CLIENTS)
    }

    pub fn matches(&self, submission: &Submission) -> bool {
        if !self.selects_all_clients() && !self.clients.contains(&submission.client_name) {
            return false;
        }
        let date = submission.date();
        self.date_from <= date && date <= self.date_to
    }
}

/// Returns the submissions matching `criteria`, in their original order
///
/// An inverted date range matches nothing.
pub fn filter(submissions: &[Submission], criteria: &FilterCriteria) -> Vec<Submission> {
    submissions
        .iter()
        .filter(|s| criteria.matches(s))
        .cloned()
        .collect()
}

/// Choices for the client selector: `All` first, then every client name sorted
pub fn client_options(submissions: &[Submission]) -> Vec<String> {
    let names: BTreeSet<&str> = submissions
        .iter()
        .map(|s| s.client_name.as_str())
        .collect();

    std::iter::once(ALL_CLIENTS)
        .chain(names)
        .map(str::to_string)
        .collect()
}
