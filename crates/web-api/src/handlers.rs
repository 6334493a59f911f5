//! Read-only query handlers over the funding repositories.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use funding_core::{normalize_symbol, VenueCode};
use funding_data::repositories::{HistoryStore, OnlineStore, VenueStore};
use funding_data::{FundingHistoryRecord, OnlineFundingRecord, RateFilter, Repositories, VenueRecord};
use serde::{Deserialize, Serialize};
use serde_json::json;

const DEFAULT_PAGE_SIZE: i64 = 100;
const MAX_PAGE_SIZE: i64 = 500;

#[derive(Clone)]
pub struct ApiState {
    pub repos: Repositories,
}

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Internal(e) => {
                tracing::error!("request failed: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

#[derive(Debug, Deserialize)]
pub struct RateQuery {
    pub venue: Option<String>,
    pub symbol: Option<String>,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub page: Option<i64>,
    pub size: Option<i64>,
    #[serde(default)]
    pub group_by_venue: bool,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub unique_symbols: i64,
    pub rows: i64,
}

/// Resolves the optional venue code to a seeded venue row and normalizes
/// the symbol filter.
async fn resolve_filter(state: &ApiState, query: &RateQuery) -> Result<RateFilter, ApiError> {
    let mut filter = RateFilter::default();

    if let Some(ref code) = query.venue {
        let code: VenueCode = code
            .parse()
            .map_err(|_| ApiError::NotFound(format!("unknown venue code: {code}")))?;
        let venue = state
            .repos
            .venues
            .get_by_code(code)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("venue not seeded: {code}")))?;
        filter.venue_id = Some(venue.id);
    }

    if let Some(ref symbol) = query.symbol {
        filter.symbol = Some(normalize_symbol(symbol));
    }
    filter.from = query.from;
    filter.to = query.to;

    Ok(filter)
}

fn page_and_size(page: Option<i64>, size: Option<i64>) -> Result<(i64, i64), ApiError> {
    let page = page.unwrap_or(0);
    if page < 0 {
        return Err(ApiError::BadRequest("page must be non-negative".to_string()));
    }
    let size = size.unwrap_or(DEFAULT_PAGE_SIZE);
    if !(1..=MAX_PAGE_SIZE).contains(&size) {
        return Err(ApiError::BadRequest(format!(
            "size must be within 1..={MAX_PAGE_SIZE}"
        )));
    }
    Ok((page, size))
}

pub async fn list_venues(State(state): State<ApiState>) -> Result<Json<Vec<VenueRecord>>, ApiError> {
    Ok(Json(state.repos.venues.list().await?))
}

pub async fn list_history(
    State(state): State<ApiState>,
    Query(query): Query<RateQuery>,
) -> Result<Json<Vec<FundingHistoryRecord>>, ApiError> {
    let (page, size) = page_and_size(query.page, query.size)?;
    let filter = resolve_filter(&state, &query).await?;
    Ok(Json(
        state.repos.history.get_by_filter(&filter, page, size).await?,
    ))
}

pub async fn latest_history(
    State(state): State<ApiState>,
    Query(query): Query<RateQuery>,
) -> Result<Json<Vec<FundingHistoryRecord>>, ApiError> {
    let (page, size) = page_and_size(query.page, query.size)?;
    let filter = resolve_filter(&state, &query).await?;
    Ok(Json(
        state
            .repos
            .history
            .latest_rates_page(&filter, query.group_by_venue, page, size)
            .await?,
    ))
}

pub async fn history_stats(
    State(state): State<ApiState>,
    Query(query): Query<RateQuery>,
) -> Result<Json<StatsResponse>, ApiError> {
    let filter = resolve_filter(&state, &query).await?;
    let unique_symbols = state.repos.history.unique_symbols_count(&filter).await?;
    let rows = state.repos.history.count_by_filter(&filter).await?;
    Ok(Json(StatsResponse {
        unique_symbols,
        rows,
    }))
}

pub async fn list_online(
    State(state): State<ApiState>,
    Query(query): Query<RateQuery>,
) -> Result<Json<Vec<OnlineFundingRecord>>, ApiError> {
    let (page, size) = page_and_size(query.page, query.size)?;
    let filter = resolve_filter(&state, &query).await?;
    Ok(Json(
        state.repos.online.get_by_filter(&filter, page, size).await?,
    ))
}

pub async fn latest_online(
    State(state): State<ApiState>,
    Query(query): Query<RateQuery>,
) -> Result<Json<Vec<OnlineFundingRecord>>, ApiError> {
    let (page, size) = page_and_size(query.page, query.size)?;
    Ok(Json(state.repos.online.latest_symbol_rates(page, size).await?))
}

pub async fn online_stats(
    State(state): State<ApiState>,
    Query(query): Query<RateQuery>,
) -> Result<Json<StatsResponse>, ApiError> {
    let filter = resolve_filter(&state, &query).await?;
    let unique_symbols = state.repos.online.unique_symbols_count().await?;
    let rows = state.repos.online.count_by_filter(&filter).await?;
    Ok(Json(StatsResponse {
        unique_symbols,
        rows,
    }))
}
