//! HTTP query service
//!
//! Endpoints:
//!   POST /api/search     body = filter spec, `?sort=&order=&offset=&limit=`
//!   GET  /api/options    facet values for the current collection
//!   POST /api/translate  `{"query": "..."}` → filter spec
//!   POST /api/suggest    `{"input": "..."}` → facet suggestions
//!   POST /api/refresh    re-read the source, rebuild and swap the catalog
//!   GET  /api/health     liveness probe

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::{Company, FilterOptions};
use crate::error::{MsError, Result};
use crate::search::{
    FilterSpec, SharedCatalog, SortDirection, SortKey, SortSpec, paginate, sort_companies,
};
use crate::storage::CompanySource;
use crate::translate::{FilterSuggestions, Translator};

/// Canonical search response body.
///
/// Clients also accept a bare JSON array, the shape older deployments
/// returned; see [`SearchResponse::from_slice`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<Company>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnySearchResponse {
    Wrapped { results: Vec<Company> },
    Bare(Vec<Company>),
}

impl SearchResponse {
    /// Parse either `{"results": [...]}` or a bare array.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let parsed: AnySearchResponse = serde_json::from_slice(bytes)
            .map_err(|err| MsError::Serialization(format!("unexpected search response: {err}")))?;
        Ok(match parsed {
            AnySearchResponse::Wrapped { results } | AnySearchResponse::Bare(results) => {
                Self { results }
            }
        })
    }
}

pub struct ServerState {
    pub catalog: SharedCatalog,
    pub source: Arc<dyn CompanySource>,
    pub translator: Option<Arc<dyn Translator>>,
}

pub type SharedState = Arc<ServerState>;

struct ApiError(MsError);

impl From<MsError> for ApiError {
    fn from(err: MsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            warn!(error = %self.0, "request failed");
        } else {
            debug!(error = %self.0, "request rejected");
        }
        (status, Json(self.0.to_structured())).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub sort: Option<String>,
    pub order: Option<String>,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub limit: usize,
}

impl SearchParams {
    fn sort_spec(&self) -> Result<Option<SortSpec>> {
        let key = match self.sort.as_deref() {
            None => None,
            Some(raw) => Some(SortKey::parse(raw).ok_or_else(|| {
                MsError::InvalidSpecification(format!("unknown sort key: {raw}"))
            })?),
        };
        let direction = match self.order.as_deref() {
            None => SortDirection::Asc,
            Some(raw) => SortDirection::parse(raw).ok_or_else(|| {
                MsError::InvalidSpecification(format!("unknown sort order: {raw}"))
            })?,
        };
        Ok(key.map(|key| SortSpec::new(key, direction)))
    }
}

#[derive(Debug, Deserialize)]
struct TranslateRequest {
    query: String,
}

#[derive(Debug, Deserialize)]
struct SuggestRequest {
    input: String,
}

#[derive(Debug, Serialize)]
struct RefreshResponse {
    refreshed: bool,
    companies: usize,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    companies: usize,
    translator: bool,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/search", post(search))
        .route("/api/options", get(options))
        .route("/api/translate", post(translate))
        .route("/api/suggest", post(suggest))
        .route("/api/refresh", post(refresh))
        .route("/api/health", get(health))
        .with_state(state)
}

/// Bind `address` and serve until Ctrl-C.
pub async fn serve(state: SharedState, address: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(address).await?;
    info!(address = %listener.local_addr()?, "query service listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("query service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c");
    }
}

fn parse_spec(body: &str) -> Result<FilterSpec> {
    if body.trim().is_empty() {
        return Ok(FilterSpec::default());
    }
    FilterSpec::from_json(body)
}

async fn search(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
    body: String,
) -> ApiResult<Json<SearchResponse>> {
    let spec = parse_spec(&body)?;
    let sort = params.sort_spec()?;

    let catalog = state.catalog.snapshot();
    let mut results = catalog.search(&spec)?;
    if let Some(sort) = sort {
        sort_companies(&mut results, sort);
    }
    let results = if params.offset > 0 || params.limit > 0 {
        paginate(results, params.offset, params.limit).results
    } else {
        results
    };

    debug!(matches = results.len(), "search served");
    Ok(Json(SearchResponse { results }))
}

async fn options(State(state): State<SharedState>) -> Json<FilterOptions> {
    Json(state.catalog.snapshot().options())
}

fn translator(state: &ServerState) -> Result<Arc<dyn Translator>> {
    state.translator.clone().ok_or_else(|| {
        MsError::TranslatorUnavailable("no translator configured for this service".to_string())
    })
}

async fn blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| MsError::Internal(format!("blocking task failed: {err}")))?
}

async fn translate(
    State(state): State<SharedState>,
    Json(request): Json<TranslateRequest>,
) -> ApiResult<Json<FilterSpec>> {
    let translator = translator(&state)?;
    let options = state.catalog.snapshot().options();
    let spec = blocking(move || translator.translate(&request.query, &options)).await?;
    Ok(Json(spec))
}

async fn suggest(
    State(state): State<SharedState>,
    Json(request): Json<SuggestRequest>,
) -> ApiResult<Json<FilterSuggestions>> {
    let translator = translator(&state)?;
    let options = state.catalog.snapshot().options();
    let suggestions = blocking(move || translator.suggest(&request.input, &options)).await?;
    Ok(Json(suggestions))
}

async fn refresh(State(state): State<SharedState>) -> ApiResult<Json<RefreshResponse>> {
    let task_state = Arc::clone(&state);
    let refreshed = blocking(move || {
        let companies = task_state.source.fetch_all()?;
        task_state.catalog.refresh(companies)
    })
    .await?;
    Ok(Json(RefreshResponse {
        refreshed,
        companies: state.catalog.snapshot().len(),
    }))
}

async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        companies: state.catalog.snapshot().len(),
        translator: state.translator.is_some(),
    })
}
