mod errors;
pub mod pages;

use actix_web::cookie::{Cookie, SameSite};
use actix_web::{dev::Server, get, web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

use crate::application::{ChartViewUseCase, DataLoader, DirectoryListingUseCase, SelectionQuery};
use crate::domain::chart::ChartDescription;
use crate::domain::error::{AppError, Result};
use crate::domain::table::Table;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::session::{SessionStore, SESSION_COOKIE};
use crate::infrastructure::storage::normalize_request_path;

pub use errors::json_error;

/// Number of log entries kept for `/api/logs`
const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub listing: DirectoryListingUseCase,
    pub loader: DataLoader,
    pub chart_view: ChartViewUseCase,
    pub sessions: SessionStore,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

impl HttpState {
    pub fn new(config: &AppConfig, logs: Arc<Mutex<Vec<LogEntry>>>) -> Self {
        Self {
            listing: DirectoryListingUseCase::new(config.root.clone(), config.show_hidden),
            loader: DataLoader::new(config.root.clone()),
            chart_view: ChartViewUseCase::new(),
            sessions: SessionStore::new(config.max_sessions),
            logs,
        }
    }
}

#[get("/api/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data.logs.lock().unwrap_or_else(PoisonError::into_inner);
    HttpResponse::Ok().json(&*logs)
}

#[get("/api/chart/{path:.*}")]
async fn chart_json(
    data: web::Data<HttpState>,
    path: web::Path<String>,
    req: HttpRequest,
) -> impl Responder {
    let path = path.into_inner();
    let query = selection_query(&req);

    let result = async {
        let path = normalize_request_path(&path)?;
        let table = load_table(&data, &path).await?;
        let selection = data
            .chart_view
            .resolve_selection(&path, &table, &query, None)?;
        Ok::<ChartDescription, AppError>(data.chart_view.describe(&table, &selection))
    }
    .await;

    match result {
        Ok(chart) => HttpResponse::Ok().json(chart),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "ChartApi",
                &format!("Chart for {} failed: {}", path, e),
            );
            json_error(&e)
        }
    }
}

#[get("/plot/{path:.*}")]
async fn plot(
    data: web::Data<HttpState>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let path = path.into_inner();
    let result = plot_page(&data, &path, &req).await;
    if let Err(e) = &result {
        add_log(
            &data.logs,
            "ERROR",
            "Plot",
            &format!("Plot of {} failed: {}", path, e),
        );
    }
    result
}

async fn plot_page(data: &HttpState, path: &str, req: &HttpRequest) -> Result<HttpResponse> {
    let (session_id, is_new_session) = match session_id(req) {
        Some(id) => (id, false),
        None => (SessionStore::new_session_id(), true),
    };

    let path = normalize_request_path(path)?;
    let table = load_table(data, &path).await?;
    let query = selection_query(req);
    let stored = data.sessions.get(&session_id);

    let selection = data
        .chart_view
        .resolve_selection(&path, &table, &query, stored)?;
    let chart = data.chart_view.describe(&table, &selection);
    let chart_body = serde_json::to_string(&chart)
        .map_err(|e| AppError::Internal(format!("Failed to serialize chart: {}", e)))?;

    add_log(
        &data.logs,
        "INFO",
        "Plot",
        &format!(
            "Plotting {} (x={} y=[{}])",
            selection.path,
            selection.x,
            selection.y.join(", ")
        ),
    );

    let html = pages::chart_page(
        &selection,
        &table.column_names(),
        table.row_count(),
        &chart_body,
    );
    data.sessions.put(&session_id, selection);

    let mut response = HttpResponse::Ok();
    response.content_type("text/html; charset=utf-8");
    if is_new_session {
        response.cookie(
            Cookie::build(SESSION_COOKIE, session_id)
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .finish(),
        );
    }
    Ok(response.body(html))
}

#[get("/")]
async fn index_root(data: web::Data<HttpState>) -> Result<HttpResponse> {
    listing_response(&data, "").await
}

#[get("/{path:.*}")]
async fn index(data: web::Data<HttpState>, path: web::Path<String>) -> Result<HttpResponse> {
    listing_response(&data, &path.into_inner()).await
}

async fn listing_response(data: &HttpState, path: &str) -> Result<HttpResponse> {
    let listing = data.listing.clone();
    let request_path = path.to_string();
    let result = web::block(move || listing.execute(&request_path))
        .await
        .map_err(|e| AppError::Internal(format!("Directory listing task failed: {}", e)))
        .and_then(|listing| listing);

    match result {
        Ok(listing) => Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(pages::listing_page(&listing))),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Listing",
                &format!("Listing {} failed: {}", path, e),
            );
            Err(e)
        }
    }
}

/// Parse the file off the async workers; every call reads from disk
async fn load_table(data: &HttpState, path: &str) -> Result<Table> {
    let loader = data.loader.clone();
    let request_path = path.to_string();
    web::block(move || loader.load(&request_path))
        .await
        .map_err(|e| AppError::Internal(format!("Loading task failed: {}", e)))?
}

/// `x` and repeated `y` query parameters
fn selection_query(req: &HttpRequest) -> SelectionQuery {
    let mut query = SelectionQuery::default();
    for (key, value) in url::form_urlencoded::parse(req.query_string().as_bytes()) {
        match key.as_ref() {
            "x" => query.x = Some(value.into_owned()),
            "y" => query.y.push(value.into_owned()),
            _ => {}
        }
    }
    query
}

fn session_id(req: &HttpRequest) -> Option<String> {
    let cookie = req.cookie(SESSION_COOKIE)?;
    Uuid::parse_str(cookie.value())
        .ok()
        .map(|id| id.to_string())
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap_or_else(PoisonError::into_inner);
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

/// Record an entry for `/api/logs` and forward it to `tracing`
pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    match level {
        "ERROR" => tracing::error!(source, "{}", message),
        "WARN" => tracing::warn!(source, "{}", message),
        "DEBUG" => tracing::debug!(source, "{}", message),
        _ => tracing::info!(source, "{}", message),
    }
    add_log_entry(logs, level, source, message);
}

/// Register every route; `/` and the directory catch-all come last
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_logs)
        .service(chart_json)
        .service(plot)
        .service(index_root)
        .service(index);
}

pub fn start_server(state: web::Data<HttpState>, host: &str, port: u16) -> std::io::Result<Server> {
    let server = HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind((host, port))?
        .run();

    Ok(server)
}
