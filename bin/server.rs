// Payment Dues - Web Server
// REST API over the payment repository and theme state

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use payment_dues::{
    init_logging, open_repository, AppConfig, DueError, Palette, PaymentDue, PaymentFields,
    PaymentRepository, ThemeMode, ThemeProvider,
};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
struct AppState {
    repo: PaymentRepository,
    theme: Arc<Mutex<ThemeProvider>>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Serialize)]
struct TotalResponse {
    total_due: f64,
    count: usize,
}

#[derive(Serialize)]
struct ThemeResponse {
    mode: ThemeMode,
    is_dark: bool,
    colors: Palette,
}

impl From<&ThemeProvider> for ThemeResponse {
    fn from(theme: &ThemeProvider) -> Self {
        Self {
            mode: theme.current(),
            is_dark: theme.is_dark(),
            colors: theme.colors(),
        }
    }
}

/// Map repository errors onto status codes
fn error_response(error: DueError) -> Response {
    let status = match &error {
        DueError::NotFound(_) => StatusCode::NOT_FOUND,
        DueError::Invalid(_) => StatusCode::BAD_REQUEST,
        DueError::StorageRead(source) | DueError::StorageWrite(source) => {
            tracing::error!(error = %source, "storage access failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(ApiResponse::<()>::err(error.to_string()))).into_response()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/dues - All payment dues in insertion order
async fn list_dues(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.repo.list()))
}

/// GET /api/dues/:id - One payment due
async fn get_due(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.repo.get(&id) {
        Some(due) => (StatusCode::OK, Json(ApiResponse::ok(due))).into_response(),
        None => error_response(DueError::NotFound(id)),
    }
}

/// POST /api/dues - Create a payment due
async fn create_due(
    State(state): State<AppState>,
    Json(fields): Json<PaymentFields>,
) -> Response {
    match state.repo.create(fields) {
        Ok(due) => (StatusCode::CREATED, Json(ApiResponse::ok(due))).into_response(),
        Err(e) => error_response(e),
    }
}

/// PUT /api/dues/:id - Replace the editable fields of a payment due
async fn update_due(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(fields): Json<PaymentFields>,
) -> Response {
    match state.repo.update(&id, fields) {
        Ok(due) => (StatusCode::OK, Json(ApiResponse::<PaymentDue>::ok(due))).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /api/dues/:id - Remove a payment due (missing ids succeed too)
async fn delete_due(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.repo.remove(&id) {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::ok(id))).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/total - Running total
async fn get_total(State(state): State<AppState>) -> impl IntoResponse {
    let dues = state.repo.list();
    Json(ApiResponse::ok(TotalResponse {
        total_due: payment_dues::total_due(&dues),
        count: dues.len(),
    }))
}

/// GET /api/theme - Current theme and palette
async fn get_theme(State(state): State<AppState>) -> Response {
    match state.theme.lock() {
        Ok(theme) => Json(ApiResponse::ok(ThemeResponse::from(&*theme))).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::err("theme state unavailable")),
        )
            .into_response(),
    }
}

/// POST /api/theme/toggle - Flip light/dark
async fn toggle_theme(State(state): State<AppState>) -> Response {
    match state.theme.lock() {
        Ok(mut theme) => {
            let mode = theme.toggle();
            tracing::info!(theme = %mode, "theme toggled");
            Json(ApiResponse::ok(ThemeResponse::from(&*theme))).into_response()
        }
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::err("theme state unavailable")),
        )
            .into_response(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    init_logging(&config.log_filter);

    tracing::info!(version = payment_dues::VERSION, "starting payment dues server");

    let repo = open_repository(&config)?;
    let theme = ThemeProvider::load(repo.clone());

    // Create shared state
    let state = AppState {
        repo,
        theme: Arc::new(Mutex::new(theme)),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/dues", get(list_dues).post(create_due))
        .route("/dues/:id", get(get_due).put(update_due).delete(delete_due))
        .route("/total", get(get_total))
        .route("/theme", get(get_theme))
        .route("/theme/toggle", post(toggle_theme))
        .with_state(state.clone());

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let listener = tokio::net::TcpListener::bind(config.server_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server_addr))?;

    tracing::info!(addr = %config.server_addr, "server listening, API under /api/dues");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server stopped unexpectedly")?;

    // pending theme writes land before exit
    if let Ok(theme) = state.theme.lock() {
        theme.flush();
    }
    tracing::info!("server stopped");

    Ok(())
}
