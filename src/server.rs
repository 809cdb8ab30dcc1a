use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{info, warn};
use serde::Deserialize;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::data::{
    Catalog, Conflict, Constraints, Faculty, GenerationInput, GenerationOutput, TimetableSlot,
    Year,
};
use crate::error::ServiceError;
use crate::service::{GenerationReport, TimetableService};
use crate::solver;
use crate::store::{InMemorySlotStore, SlotFilter};

type SharedService = Arc<Mutex<TimetableService<InMemorySlotStore>>>;

#[derive(Debug, Deserialize)]
pub struct ScopeRequest {
    pub year: Year,
    pub semester: u32,
    #[serde(default)]
    pub constraints: Constraints,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub slots: Vec<TimetableSlot>,
    #[serde(default)]
    pub faculty: Vec<Faculty>,
    #[serde(default)]
    pub constraints: Constraints,
}

pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, conflicts) = match &self.0 {
            ServiceError::InvalidConfiguration(c) | ServiceError::EmptyTimetable(c) => {
                (StatusCode::UNPROCESSABLE_ENTITY, c.clone())
            }
            ServiceError::Store(_) => (StatusCode::CONFLICT, Vec::new()),
        };
        warn!("Request failed: {}", self.0);
        let body = json!({ "error": self.0.to_string(), "conflicts": conflicts });
        (status, Json(body)).into_response()
    }
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "OK", "message": "Timetable API is running" }))
}

async fn generate_handler(Json(input): Json<GenerationInput>) -> Json<GenerationOutput> {
    Json(solver::solve(&input))
}

async fn review_handler(Json(request): Json<ReviewRequest>) -> Json<GenerationOutput> {
    Json(solver::review(
        request.slots,
        &request.faculty,
        &request.constraints,
    ))
}

async fn validate_handler(
    State(service): State<SharedService>,
    Json(scope): Json<ScopeRequest>,
) -> Json<Vec<Conflict>> {
    let service = service.lock().await;
    Json(service.check(scope.year, scope.semester))
}

async fn regenerate_handler(
    State(service): State<SharedService>,
    Json(scope): Json<ScopeRequest>,
) -> Result<Json<GenerationReport>, ApiError> {
    // held across clear + generate + save so readers never see a half-written scope
    let mut service = service.lock().await;
    let report = service.regenerate(scope.year, scope.semester, &scope.constraints)?;
    Ok(Json(report))
}

async fn slots_handler(
    State(service): State<SharedService>,
    Query(filter): Query<SlotFilter>,
) -> Json<Vec<TimetableSlot>> {
    let service = service.lock().await;
    Json(service.slots(&filter))
}

async fn clear_handler(State(service): State<SharedService>) -> Json<Value> {
    let cleared = service.lock().await.clear_all();
    Json(json!({ "cleared": cleared }))
}

pub fn router(catalog: Catalog) -> Router {
    let service: SharedService = Arc::new(Mutex::new(TimetableService::new(
        catalog,
        InMemorySlotStore::new(),
    )));

    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/timetable/generate", post(generate_handler))
        .route("/v1/timetable/review", post(review_handler))
        .route("/v1/timetable/validate", post(validate_handler))
        .route("/v1/timetable/regenerate", post(regenerate_handler))
        .route("/v1/timetable/slots", get(slots_handler).delete(clear_handler))
        .with_state(service)
}

pub async fn run_server(addr: SocketAddr, catalog: Catalog) -> std::io::Result<()> {
    let app = router(catalog);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
