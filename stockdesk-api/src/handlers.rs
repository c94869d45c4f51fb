//! Endpoint handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;

use stockdesk_core::{Company, Pipeline, PipelineError};

use crate::error::ApiError;
use crate::server::ApiState;
use crate::types::{DataQuery, SeriesResponse, ServiceInfo, SummaryResponse};

/// Run a pipeline call on the blocking pool.
async fn blocking<T, F>(state: &ApiState, what: &'static str, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Pipeline) -> Result<T, PipelineError> + Send + 'static,
{
    let pipeline = Arc::clone(&state.pipeline);
    tokio::task::spawn_blocking(move || f(&pipeline))
        .await
        .map_err(|e| ApiError::internal(what, e.to_string()))?
        .map_err(|e| ApiError::from_pipeline(what, e))
}

/// GET /
pub async fn root(State(state): State<Arc<ApiState>>) -> Json<ServiceInfo> {
    Json(ServiceInfo::new(state.example_symbols.clone()))
}

/// GET /companies
pub async fn companies(State(state): State<Arc<ApiState>>) -> Result<Json<Vec<Company>>, ApiError> {
    let companies = blocking(&state, "companies", |p| p.list_companies()).await?;
    Ok(Json(companies))
}

/// GET /data/:symbol?days=N
///
/// Populates the cache on a miss, then returns the newest `days` rows in
/// ascending date order.
pub async fn stock_data(
    State(state): State<Arc<ApiState>>,
    Path(symbol): Path<String>,
    Query(query): Query<DataQuery>,
) -> Result<Json<SeriesResponse>, ApiError> {
    let days = query.days.unwrap_or(state.default_days);
    tracing::debug!(%symbol, days, "data request");

    let key = symbol.clone();
    let data = blocking(&state, "stock data", move |p| p.get_recent(&key, days)).await?;
    Ok(Json(SeriesResponse {
        symbol,
        days_returned: data.len(),
        data,
    }))
}

/// GET /summary/:symbol
pub async fn summary(
    State(state): State<Arc<ApiState>>,
    Path(symbol): Path<String>,
) -> Result<Json<SummaryResponse>, ApiError> {
    tracing::debug!(%symbol, "summary request");
    let key = symbol.clone();
    let summary = blocking(&state, "summary", move |p| p.summary(&key)).await?;
    Ok(Json(SummaryResponse::new(symbol, &summary)))
}
