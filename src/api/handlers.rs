use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::api::{dto::*, errors::ApiError};
use crate::domain::HistoryEntry;
use crate::services::{ExchangeRegistry, HistoryService, InputSanitizer, LeverageCalculator};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ExchangeRegistry>,
    pub history: Arc<HistoryService>,
    pub default_exchange: String,
}

/// GET /health - Health check
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "leverage-calculator",
        "history_backend": state.history.backend(),
    }))
}

/// GET /exchanges - List known exchange profiles
pub async fn list_exchanges(State(state): State<AppState>) -> Json<Vec<ExchangeDto>> {
    let exchanges = state
        .registry
        .list()
        .iter()
        .map(|(key, profile)| ExchangeDto::new(key, profile))
        .collect();

    Json(exchanges)
}

/// GET /exchanges/:key - Get one exchange profile
pub async fn get_exchange(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ExchangeDto>, ApiError> {
    let profile = state
        .registry
        .resolve(&key)
        .ok_or_else(|| ApiError::NotFound(format!("Exchange {} not found", key)))?;

    Ok(Json(ExchangeDto::new(&key, profile)))
}

/// POST /calculate - Run a calculation and record it in history
pub async fn calculate(
    State(state): State<AppState>,
    Json(payload): Json<CalculateRequest>,
) -> Result<Json<CalculateResponse>, ApiError> {
    let exchange = payload
        .input
        .exchange
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .unwrap_or(state.default_exchange.as_str())
        .to_string();
    let profile = state.registry.resolve_or_custom(&exchange);

    let sanitized = InputSanitizer::sanitize(&payload.input, &profile);
    let params = &sanitized.params;

    let result = LeverageCalculator::compute(params).ok_or_else(|| {
        ApiError::Unprocessable(
            "Margin, leverage and entry price must be positive numbers".to_string(),
        )
    })?;

    if params.target_prices.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one positive target price is required".to_string(),
        ));
    }

    info!(
        "Calculated {} {} on {}: {} @ {} x{}",
        sanitized.coin, params.side, exchange, params.margin, params.entry_price, params.leverage
    );

    let history_entry = if payload.record.unwrap_or(true) {
        let entry = HistoryEntry::from_calculation(
            &exchange,
            &sanitized.coin,
            &sanitized.note,
            params,
            &result,
        );
        state.history.push(entry.clone()).await?;
        Some(entry)
    } else {
        None
    };

    Ok(Json(CalculateResponse {
        exchange,
        exchange_label: profile.label,
        coin: sanitized.coin,
        liquidation_price: result.preferred_liquidation(),
        result,
        history_entry,
    }))
}

/// GET /history - List recorded calculations, newest first
pub async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryListResponse> {
    let entries = state.history.list().await;
    let total = entries.len();

    let offset = query.offset.unwrap_or(0);
    let limit = query.limit.unwrap_or(100).min(1000);

    Json(HistoryListResponse {
        backend: state.history.backend(),
        total,
        entries: entries.into_iter().skip(offset).take(limit).collect(),
    })
}

/// DELETE /history/:id - Delete one entry
pub async fn delete_history_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.history.delete(id).await? {
        return Err(ApiError::NotFound(format!("History entry {} not found", id)));
    }

    Ok(Json(MessageResponse {
        message: format!("Deleted history entry {}", id),
    }))
}

/// DELETE /history - Delete all entries
pub async fn clear_history(State(state): State<AppState>) -> Json<MessageResponse> {
    state.history.clear().await;

    Json(MessageResponse {
        message: "History cleared".to_string(),
    })
}

/// GET /history/export - Download history as CSV
pub async fn export_history(State(state): State<AppState>) -> Result<Response, ApiError> {
    let csv = state
        .history
        .export_csv()
        .await
        .ok_or_else(|| ApiError::NotFound("No history to export".to_string()))?;

    let filename = format!(
        "attachment; filename=\"levcalc_history_{}.csv\"",
        chrono::Utc::now().format("%Y-%m-%d")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, filename),
        ],
        csv,
    )
        .into_response())
}
