// TecaiKids API - HTTP Layer
// REST routes under /api, built on axum

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::catalog::ProgramCatalog;
use crate::config::CorsOrigins;
use crate::error::{ApiError, ApiResult};
use crate::models::{ConsultationRequest, Enrollment, PlatformStats, Program};
use crate::service;
use crate::store::DocumentStore;
use crate::validation::FieldError;

pub const WELCOME_MESSAGE: &str = "TecaiKids API - Empowering Future Leaders";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ProgramCatalog>,
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(catalog: ProgramCatalog, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            store,
        }
    }
}

// ============================================================================
// ERROR RESPONSES
// ============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": errors })),
            )
                .into_response(),
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": message }))).into_response()
            }
            ApiError::Internal(err) => {
                error!(error = %format!("{:#}", err), "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal Server Error" })),
                )
                    .into_response()
            }
        }
    }
}

/// Unwrap a JSON body, turning a parse failure into a 422 like any other bad field
fn json_body(body: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            warn!(reason = %rejection.body_text(), "rejected request body");
            Err(ApiError::Validation(vec![FieldError::malformed_body(
                rejection.body_text(),
            )]))
        }
    }
}

/// Run a store-touching operation on the blocking pool so SQLite I/O never
/// stalls the async workers
async fn run_blocking<T, F>(op: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("blocking task failed: {}", e)))?
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api - Welcome message
async fn root() -> impl IntoResponse {
    Json(json!({ "message": WELCOME_MESSAGE }))
}

/// GET /api/programs - All programs in catalog order
async fn list_programs(State(state): State<AppState>) -> Json<Vec<Program>> {
    Json(state.catalog.all().to_vec())
}

/// GET /api/programs/:program_type - One program by tag
async fn get_program(
    State(state): State<AppState>,
    Path(program_type): Path<String>,
) -> ApiResult<Json<Program>> {
    let program = service::get_program(&state.catalog, &program_type)?;
    Ok(Json(program.clone()))
}

/// POST /api/enrollment - Create an enrollment
async fn create_enrollment(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Enrollment>> {
    let body = json_body(body)?;
    let enrollment = run_blocking(move || {
        service::create_enrollment(&state.catalog, state.store.as_ref(), &body)
    })
    .await?;
    Ok(Json(enrollment))
}

/// GET /api/enrollments - Up to 1000 enrollments
async fn list_enrollments(State(state): State<AppState>) -> ApiResult<Json<Vec<Enrollment>>> {
    let enrollments = run_blocking(move || service::list_enrollments(state.store.as_ref())).await?;
    Ok(Json(enrollments))
}

/// POST /api/consultation - Create a consultation request
async fn create_consultation(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ConsultationRequest>> {
    let body = json_body(body)?;
    let consultation =
        run_blocking(move || service::create_consultation(state.store.as_ref(), &body)).await?;
    Ok(Json(consultation))
}

/// GET /api/consultations - Up to 1000 consultation requests
async fn list_consultations(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ConsultationRequest>>> {
    let consultations =
        run_blocking(move || service::list_consultations(state.store.as_ref())).await?;
    Ok(Json(consultations))
}

/// GET /api/stats - Platform statistics
async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<PlatformStats>> {
    let stats = run_blocking(move || service::platform_stats(state.store.as_ref())).await?;
    Ok(Json(stats))
}

// ============================================================================
// Router
// ============================================================================

pub fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    match origins {
        CorsOrigins::Any => CorsLayer::permissive(),
        CorsOrigins::List(list) => {
            let allowed: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(origin = %origin, "ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();

            // credentials rule out wildcards, so methods and headers echo the preflight
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(AllowMethods::mirror_request())
                .allow_headers(AllowHeaders::mirror_request())
                .allow_credentials(true)
        }
    }
}

/// API routes under `/api`, without middleware
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api", get(root))
        .route("/api/", get(root))
        .route("/api/programs", get(list_programs))
        .route("/api/programs/:program_type", get(get_program))
        .route("/api/enrollment", post(create_enrollment))
        .route("/api/enrollments", get(list_enrollments))
        .route("/api/consultation", post(create_consultation))
        .route("/api/consultations", get(list_consultations))
        .route("/api/stats", get(get_stats))
        .with_state(state)
}

/// Full application: API routes plus request tracing and CORS
pub fn router(state: AppState, cors: &CorsOrigins) -> Router {
    api_routes(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(cors)),
    )
}

// ============================================================================
// TESTS
// ============================================================================
