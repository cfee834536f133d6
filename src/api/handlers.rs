//! HTTP request handlers

use super::types::{
    AskRequest, CatalogResponse, ErrorResponse, MenuResponse, SelectRequest, SubjectQuery,
    SuccessResponse, TranscriptResponse,
};
use super::AppState;
use crate::catalog::{CatalogStatus, DATA_UNAVAILABLE};
use crate::runtime::SessionError;
use crate::session::SessionSnapshot;
use crate::state_machine::TransitionError;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Loaded data
        .route("/api/catalog", get(get_catalog))
        // Menus
        .route("/api/menu", get(main_menu))
        .route("/api/menu/subject", get(sub_menu))
        // Session lifecycle
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/end", post(end_session))
        // User actions
        .route("/api/sessions/:id/select", post(select))
        .route("/api/sessions/:id/back", post(back))
        .route("/api/sessions/:id/ask", post(ask))
        .route("/api/sessions/:id/transcript", get(get_transcript))
        // Version
        .route("/version", get(get_version))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================
// Catalog and menus
// ============================================================

async fn get_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let assistant_enabled = state.sessions.assistant_enabled();
    Json(match state.sessions.catalog() {
        CatalogStatus::Ready(catalog) => CatalogResponse {
            ready: true,
            error: None,
            records: catalog.knowledge().records().to_vec(),
            columns: catalog.knowledge().columns().to_vec(),
            rows: catalog.knowledge().rows().to_vec(),
            assistant_enabled,
        },
        CatalogStatus::Unavailable { reason } => CatalogResponse {
            ready: false,
            error: Some(reason.clone()),
            records: vec![],
            columns: vec![],
            rows: vec![],
            assistant_enabled,
        },
    })
}

async fn main_menu(State(state): State<AppState>) -> Result<Json<MenuResponse>, AppError> {
    let catalog = state
        .sessions
        .catalog()
        .catalog()
        .ok_or(AppError::Unavailable(DATA_UNAVAILABLE.to_string()))?;

    Ok(Json(MenuResponse {
        entries: catalog.menu().main_menu().to_vec(),
    }))
}

async fn sub_menu(
    State(state): State<AppState>,
    Query(query): Query<SubjectQuery>,
) -> Result<Json<MenuResponse>, AppError> {
    let catalog = state
        .sessions
        .catalog()
        .catalog()
        .ok_or(AppError::Unavailable(DATA_UNAVAILABLE.to_string()))?;

    Ok(Json(MenuResponse {
        entries: catalog.menu().sub_menu(&query.name).to_vec(),
    }))
}

// ============================================================
// Session lifecycle
// ============================================================

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionSnapshot>) {
    let snapshot = state.sessions.create_session().await;
    (StatusCode::CREATED, Json(snapshot))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.sessions.snapshot(&id).await?))
}

async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.sessions.end_session(&id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

async fn get_transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TranscriptResponse>, AppError> {
    let snapshot = state.sessions.snapshot(&id).await?;
    Ok(Json(TranscriptResponse {
        turns: snapshot.transcript,
    }))
}

// ============================================================
// User actions
// ============================================================

async fn select(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.sessions.select(&id, &req.label).await?))
}

async fn back(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.sessions.back(&id).await?))
}

async fn ask(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AskRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.sessions.ask(&id, &req.text).await?))
}

async fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    NotFound(String),
    Conflict(String),
    Unavailable(String),
    Internal(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        let message = e.to_string();
        match e {
            SessionError::NotFound(_) => AppError::NotFound(message),
            SessionError::Transition(TransitionError::DataUnavailable) => {
                AppError::Unavailable(DATA_UNAVAILABLE.to_string())
            }
            SessionError::AssistantDisabled => AppError::Unavailable(message),
            SessionError::Transition(
                TransitionError::Busy | TransitionError::InvalidTransition(_),
            ) => AppError::Conflict(message),
            SessionError::Completion(_) => AppError::Internal(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
