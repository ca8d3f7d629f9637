use axum::{
	Json, Router,
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use cheeu_domain::{CharacterInfo, RetrievedDocument, StressType};
use cheeu_service::{
	BatchResponse, CapsuleRequest, Error as ServiceError, HealingCapsule, HealthReport,
	RetrievalReport, SearchRequest, SystemInfo,
};

const MAX_BATCH_REQUESTS: usize = 20;

#[derive(Debug, Deserialize)]
struct BatchRequest {
	requests: Vec<CapsuleRequest>,
}

#[derive(Debug, Deserialize)]
struct PlainSearchRequest {
	query: String,
	#[serde(default)]
	k: Option<u32>,
}

#[derive(Debug, Serialize)]
struct PlainSearchResponse {
	documents: Vec<RetrievedDocument>,
}

#[derive(Debug, Deserialize)]
struct ClassifyRequest {
	depression: bool,
	anxiety: bool,
	work_stress: bool,
}

#[derive(Debug, Serialize)]
struct ClassifyResponse {
	code: &'static str,
	label: &'static str,
	character: CharacterInfo,
}

#[derive(Debug, Serialize)]
struct OccupationsResponse {
	occupations: Vec<String>,
}

#[derive(Debug, Serialize)]
struct OccupationKeywordsResponse {
	occupation: String,
	keywords: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CacheClearResponse {
	cleared: usize,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } => {
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message)
			},
			ServiceError::Provider { message } => {
				json_error(StatusCode::BAD_GATEWAY, "provider_error", message)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/health/deep", get(health_deep))
		.route("/v1/capsules", post(generate_capsule))
		.route("/v1/capsules/batch", post(generate_batch))
		.route("/v1/retrieval/search", post(search))
		.route("/v1/retrieval/plain", post(plain_search))
		.route("/v1/stress_types/classify", post(classify))
		.route("/v1/occupations", get(occupations))
		.route("/v1/occupations/{label}/keywords", get(occupation_keywords))
		.route("/v1/system/info", get(system_info))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new().route("/v1/admin/cache/clear", post(clear_cache)).with_state(state)
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn health_deep(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
	let report = state.service.health_check().await;
	let status = if report.healthy { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

	(status, Json(report))
}

// Invalid input is reported inside the capsule, not as an HTTP error.
async fn generate_capsule(
	State(state): State<AppState>,
	Json(payload): Json<CapsuleRequest>,
) -> Json<HealingCapsule> {
	Json(state.service.generate_capsule(payload).await)
}

async fn generate_batch(
	State(state): State<AppState>,
	Json(payload): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, ApiError> {
	if payload.requests.is_empty() || payload.requests.len() > MAX_BATCH_REQUESTS {
		return Err(json_error(
			StatusCode::BAD_REQUEST,
			"invalid_request",
			format!("requests must contain between 1 and {MAX_BATCH_REQUESTS} items."),
		));
	}

	let response = state.service.generate_batch(payload.requests).await;

	Ok(Json(response))
}

async fn search(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<RetrievalReport>, ApiError> {
	let response = state.service.search(payload).await?;

	Ok(Json(response))
}

async fn plain_search(
	State(state): State<AppState>,
	Json(payload): Json<PlainSearchRequest>,
) -> Result<Json<PlainSearchResponse>, ApiError> {
	let documents = state.service.plain_search(&payload.query, payload.k).await?;

	Ok(Json(PlainSearchResponse { documents }))
}

async fn classify(
	State(state): State<AppState>,
	Json(payload): Json<ClassifyRequest>,
) -> Json<ClassifyResponse> {
	let stress_type =
		cheeu_domain::classify(payload.depression, payload.anxiety, payload.work_stress);

	Json(classify_response(&state, stress_type))
}

async fn occupations(State(state): State<AppState>) -> Json<OccupationsResponse> {
	let occupations =
		state.service.catalog.occupations().into_iter().map(str::to_string).collect();

	Json(OccupationsResponse { occupations })
}

async fn occupation_keywords(
	State(state): State<AppState>,
	Path(label): Path<String>,
) -> Json<OccupationKeywordsResponse> {
	let keywords = state.service.catalog.occupation_keywords(&label).to_vec();

	Json(OccupationKeywordsResponse { occupation: label, keywords })
}

async fn system_info(State(state): State<AppState>) -> Json<SystemInfo> {
	Json(state.service.system_info())
}

async fn clear_cache(State(state): State<AppState>) -> Json<CacheClearResponse> {
	Json(CacheClearResponse { cleared: state.service.clear_cache() })
}

fn classify_response(state: &AppState, stress_type: StressType) -> ClassifyResponse {
	ClassifyResponse {
		code: stress_type.code(),
		label: stress_type.label(),
		character: state.service.catalog.character(stress_type),
	}
}
