use thiserror::Error;

/// Errors produced while loading or exporting dashboard data
///
/// Only the variants here are failures. A missing content row and an empty filter
/// result are ordinary outcomes and are modelled as `ContentLookup::NotFound` and
/// `Notice::NoResults` instead.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The record store could not be read (missing sheet, I/O failure, bad credentials)
    #[error("data source '{source_name}' unavailable: {reason}")]
    DataSourceUnavailable { source_name: String, reason: String },

    /// A required configuration value is absent or empty
    #[error("missing configuration: {0}")]
    ConfigurationMissing(String),

    /// A configuration value is present but unusable
    #[error("invalid configuration: {0}")]
    ConfigurationInvalid(String),

    /// A sheet is missing columns the loader expects
    #[error("sheet '{sheet}' is missing expected columns: {}", .missing.join(", "))]
    SchemaMismatch { sheet: String, missing: Vec<String> },

    /// A cell could not be converted to its typed field
    #[error("sheet '{sheet}' row {row}: invalid value {value:?} in column '{column}'")]
    InvalidValue {
        sheet: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "web")]
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

impl DashboardError {
    /// True for errors that point at deployment configuration rather than data
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DashboardError::ConfigurationMissing(_)
                | DashboardError::ConfigurationInvalid(_)
                | DashboardError::SchemaMismatch { .. }
        )
    }

    pub(crate) fn unavailable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        DashboardError::DataSourceUnavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
