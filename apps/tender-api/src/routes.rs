use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use tender_service::{
	CorpusStats, Error as ServiceError, ImportReport, ImportRequest, IndexReport, SearchFilters,
	SearchMode, SearchRequest, SearchResponse, SemanticSuggestion, Suggestion,
};
use tender_storage::models::Opportunity;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/opportunities", get(list_opportunities))
		.route("/v1/opportunities/{id}", get(get_opportunity))
		.route("/v1/suggestions", get(suggestions))
		.route("/v1/suggestions/semantic", get(semantic_suggestions))
		.route("/v1/stats", get(stats))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/admin/import", post(import))
		.route("/v1/admin/reindex", post(reindex))
		.with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthBody {
	status: &'static str,
	version: &'static str,
}

async fn health() -> Json<HealthBody> {
	Json(HealthBody { status: "ok", version: tender_cli::VERSION })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OpportunityParams {
	q: Option<String>,
	mode: Option<String>,
	status: Option<String>,
	agencies: Option<String>,
	min_award: Option<String>,
	max_award: Option<String>,
	limit: Option<String>,
	offset: Option<String>,
}
impl OpportunityParams {
	fn into_request(self) -> Result<SearchRequest, ApiError> {
		let mode = match self.mode.as_deref() {
			None => SearchMode::default(),
			Some(raw) => SearchMode::parse(raw)
				.ok_or_else(|| invalid_param("mode", format!("Unknown search mode {raw:?}.")))?,
		};
		// An absent status means open listings; an explicit empty value
		// disables the status filter altogether.
		let status = match self.status {
			None => Some("active".to_string()),
			Some(raw) => {
				let trimmed = raw.trim().to_string();

				(!trimmed.is_empty()).then_some(trimmed)
			},
		};
		let agencies = self
			.agencies
			.as_deref()
			.unwrap_or_default()
			.split('|')
			.map(str::trim)
			.filter(|agency| !agency.is_empty())
			.map(str::to_string)
			.collect();
		let min_award = parse_param::<f64>("min_award", self.min_award.as_deref())?;
		let max_award = parse_param::<f64>("max_award", self.max_award.as_deref())?;
		let limit = parse_param::<u32>("limit", self.limit.as_deref())?;
		let offset = parse_param::<u32>("offset", self.offset.as_deref())?;

		Ok(SearchRequest {
			query: self.q.unwrap_or_default(),
			mode,
			filters: SearchFilters { status, agencies, min_award, max_award },
			limit,
			offset,
		})
	}
}

fn parse_param<T>(name: &str, raw: Option<&str>) -> Result<Option<T>, ApiError>
where
	T: std::str::FromStr,
{
	let Some(raw) = raw else {
		return Ok(None);
	};
	let trimmed = raw.trim();

	if trimmed.is_empty() {
		return Ok(None);
	}

	trimmed
		.parse::<T>()
		.map(Some)
		.map_err(|_| invalid_param(name, format!("{name} must be a number, got {raw:?}.")))
}

async fn list_opportunities(
	State(state): State<AppState>,
	Query(params): Query<OpportunityParams>,
) -> Result<Json<SearchResponse>, ApiError> {
	let request = params.into_request()?;
	let response = state.service.search(request).await?;

	Ok(Json(response))
}

async fn get_opportunity(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Opportunity>, ApiError> {
	let record = state.service.get(&id).await?;

	Ok(Json(record))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SuggestParams {
	q: Option<String>,
}

#[derive(Debug, Serialize)]
struct SuggestionsBody {
	suggestions: Vec<Suggestion>,
}

async fn suggestions(
	State(state): State<AppState>,
	Query(params): Query<SuggestParams>,
) -> Result<Json<SuggestionsBody>, ApiError> {
	let query = params.q.unwrap_or_default();
	let suggestions = match state.service.suggest(&query).await {
		Ok(suggestions) => suggestions,
		// Typeahead degrades to an empty list instead of surfacing storage
		// trouble to the keystroke path.
		Err(ServiceError::Storage { message }) => {
			warn!(error = %message, "Lexical suggestions degraded to an empty list.");

			Vec::new()
		},
		Err(err) => return Err(err.into()),
	};

	Ok(Json(SuggestionsBody { suggestions }))
}

#[derive(Debug, Serialize)]
struct SemanticSuggestionsBody {
	suggestions: Vec<SemanticSuggestion>,
}

async fn semantic_suggestions(
	State(state): State<AppState>,
	Query(params): Query<SuggestParams>,
) -> Result<Json<SemanticSuggestionsBody>, ApiError> {
	let query = params.q.unwrap_or_default();
	let suggestions = state.service.suggest_semantic(&query).await?;

	Ok(Json(SemanticSuggestionsBody { suggestions }))
}

async fn stats(State(state): State<AppState>) -> Result<Json<CorpusStats>, ApiError> {
	let stats = state.service.stats().await?;

	Ok(Json(stats))
}

async fn import(
	State(state): State<AppState>,
	Json(opportunities): Json<Vec<Opportunity>>,
) -> Result<Json<ImportReport>, ApiError> {
	let report = state.service.import(ImportRequest { opportunities }).await?;

	Ok(Json(report))
}

async fn reindex(State(state): State<AppState>) -> Result<Json<IndexReport>, ApiError> {
	let report = state.service.reindex().await?;

	Ok(Json(report))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
	error_code: String,
	message: String,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	fields: Vec<String>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Vec<String>,
}

fn invalid_param(field: &str, message: String) -> ApiError {
	ApiError {
		status: StatusCode::BAD_REQUEST,
		error_code: "invalid_request".to_string(),
		message,
		fields: vec![field.to_string()],
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let (status, error_code, message) = match err {
			ServiceError::InvalidRequest { message } => {
				(StatusCode::BAD_REQUEST, "invalid_request", message)
			},
			ServiceError::NotFound { message } => (StatusCode::NOT_FOUND, "not_found", message),
			ServiceError::IndexEmpty { message } => (StatusCode::CONFLICT, "index_empty", message),
			ServiceError::Provider { message } => {
				(StatusCode::SERVICE_UNAVAILABLE, "suggestions_unavailable", message)
			},
			ServiceError::Storage { message } => {
				(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message)
			},
		};

		Self { status, error_code: error_code.to_string(), message, fields: Vec::new() }
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			error: ErrorDetail {
				error_code: self.error_code,
				message: self.message,
				fields: self.fields,
			},
		};

		(self.status, Json(body)).into_response()
	}
}
