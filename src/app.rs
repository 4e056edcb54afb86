#![cfg(not(tarpaulin_include))]

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::DashboardConfig;
use crate::dashboard::{Dashboard, DashboardView, Dataset, ViewQuery};
use crate::downloader::{self, CSV_FILE_NAME, XLSX_FILE_NAME};
use crate::error::DashboardError;
use crate::filter::client_options;
use crate::report::ContentLookup;
use crate::source::{CachedSource, CsvDirectorySource, SheetSource};

pub type SharedSource = CachedSource<Box<dyn SheetSource>>;

pub struct AppState {
    dashboard: Dashboard<SharedSource>,
}

impl AppState {
    pub fn new(source: Box<dyn SheetSource>, config: &DashboardConfig) -> Self {
        let cached = CachedSource::new(source, config.cache_ttl());
        AppState {
            dashboard: Dashboard::new(cached, config),
        }
    }
}

/// Dashboard and export query: `clients` may repeat, one client name per value
///
/// An absent `clients`, or one equal to `All`, means every client.
struct DashboardParams {
    clients: Vec<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    search: Option<String>,
}

impl DashboardParams {
    fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, String> {
        let mut params = DashboardParams {
            clients: Vec::new(),
            from: None,
            to: None,
            search: None,
        };

        for (key, value) in pairs {
            match key.as_str() {
                "clients" => {
                    let name = value.trim();
                    if !name.is_empty() {
                        params.clients.push(name.to_string());
                    }
                }
                "from" => params.from = parse_date(&key, &value)?,
                "to" => params.to = parse_date(&key, &value)?,
                "search" => params.search = Some(value),
                _ => {}
            }
        }

        Ok(params)
    }

    fn view_query(self) -> ViewQuery {
        ViewQuery {
            clients: self.clients,
            date_from: self.from,
            date_to: self.to,
            search: self.search.unwrap_or_default(),
        }
    }
}

/// A blank value leaves the bound at its default
fn parse_date(key: &str, value: &str) -> Result<Option<NaiveDate>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("{} must be a YYYY-MM-DD date, got {:?}", key, value))
}

#[derive(Deserialize)]
struct ContentQuery {
    client: String,
    version: String,
}

#[derive(Serialize)]
struct StatusResponse {
    status: String,
    message: Option<String>,
}

#[derive(Serialize)]
struct ContentResponse<'a> {
    status: &'static str,
    label: String,
    parts: [&'a str; 4],
    full_content: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/clients", get(get_clients))
        .route("/api/content", get(get_content))
        .route("/api/export/csv", get(export_csv))
        .route("/api/export/xlsx", get(export_xlsx))
        .route("/api/refresh", post(refresh))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: DashboardConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    let data_dir = config
        .data_dir
        .clone()
        .ok_or_else(|| DashboardError::ConfigurationMissing("data_dir".to_string()))?;

    let source: Box<dyn SheetSource> = Box::new(CsvDirectorySource::new(data_dir));
    let app_state = Arc::new(AppState::new(source, &config));
    let app = router(app_state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Loads both sheets on the blocking pool; file reads and parsing stay off the executor
async fn load_dataset(state: &Arc<AppState>) -> Result<Dataset, DashboardError> {
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || state.dashboard.load())
        .await
        .map_err(|e| DashboardError::unavailable("loader", e))?
}

fn unavailable_response(e: &DashboardError) -> Response {
    error!("unable to load dashboard data: {}", e);
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(DashboardView::unavailable(e)),
    )
        .into_response()
}

fn status_response(status: StatusCode, label: &str, message: String) -> Response {
    (
        status,
        Json(StatusResponse {
            status: label.to_string(),
            message: Some(message),
        }),
    )
        .into_response()
}

/// Parses the dashboard query and loads the dataset, or answers with the failure
async fn prepare(
    pairs: Vec<(String, String)>,
    state: &Arc<AppState>,
) -> Result<(Dataset, ViewQuery), Response> {
    let params = DashboardParams::from_pairs(pairs)
        .map_err(|message| status_response(StatusCode::BAD_REQUEST, "error", message))?;
    let dataset = load_dataset(state)
        .await
        .map_err(|e| unavailable_response(&e))?;
    Ok((dataset, params.view_query()))
}

async fn get_dashboard(
    Query(pairs): Query<Vec<(String, String)>>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match prepare(pairs, &state).await {
        Ok((dataset, query)) => Json(DashboardView::build(&dataset, &query)).into_response(),
        Err(response) => response,
    }
}

async fn get_clients(State(state): State<Arc<AppState>>) -> Response {
    match load_dataset(&state).await {
        Ok(dataset) => Json(client_options(&dataset.submissions)).into_response(),
        Err(e) => unavailable_response(&e),
    }
}

async fn get_content(
    Query(params): Query<ContentQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let dataset = match load_dataset(&state).await {
        Ok(dataset) => dataset,
        Err(e) => return unavailable_response(&e),
    };

    match dataset.lookup_content(&params.client, &params.version) {
        ContentLookup::Found(record) => Json(ContentResponse {
            status: "ok",
            label: format!("{} - Version {}", record.client_name, record.version_number),
            parts: record.parts(),
            full_content: record.full_content(),
        })
        .into_response(),
        ContentLookup::NotFound => status_response(
            StatusCode::NOT_FOUND,
            "not_found",
            format!(
                "Content not found for {} version {}",
                params.client, params.version
            ),
        ),
    }
}

fn attachment(content_type: &'static str, file_name: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response()
}

async fn export_csv(
    Query(pairs): Query<Vec<(String, String)>>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let (dataset, query) = match prepare(pairs, &state).await {
        Ok(prepared) => prepared,
        Err(response) => return response,
    };
    let view = DashboardView::build(&dataset, &query);

    match downloader::to_csv(&view.table) {
        Ok(body) => attachment("text/csv; charset=utf-8", CSV_FILE_NAME, body),
        Err(e) => status_response(StatusCode::INTERNAL_SERVER_ERROR, "error", e.to_string()),
    }
}

async fn export_xlsx(
    Query(pairs): Query<Vec<(String, String)>>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let (dataset, query) = match prepare(pairs, &state).await {
        Ok(prepared) => prepared,
        Err(response) => return response,
    };
    let view = DashboardView::build(&dataset, &query);

    match downloader::to_xlsx(&view.table) {
        Ok(body) => attachment(
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            XLSX_FILE_NAME,
            body,
        ),
        Err(e) => status_response(StatusCode::INTERNAL_SERVER_ERROR, "error", e.to_string()),
    }
}

async fn refresh(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.dashboard.source().invalidate();
    info!("sheet cache cleared");
    Json(StatusResponse {
        status: "ok".to_string(),
        message: None,
    })
}
