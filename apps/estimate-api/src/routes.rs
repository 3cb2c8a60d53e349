//! Request handlers.
//!
//! | Method | Path               | Handler            |
//! |--------|--------------------|--------------------|
//! | POST   | `/estimate`        | [`estimate`]       |
//! | POST   | `/estimate/totals` | [`estimate_totals`]|
//! | GET    | `/health`          | [`health`]         |
//! | POST   | `/rules/reload`    | [`reload_rules`]   |
//!
//! Handlers take one snapshot per request and never hold the catalog lock
//! while pricing.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use inkquote_core::{estimate as price_job, order_totals, EstimateRequest, EstimateResponse, OrderRequest, OrderResponse};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{AppState, SnapshotStatus};

/// All routes, without middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/estimate", post(estimate))
        .route("/estimate/totals", post(estimate_totals))
        .route("/health", get(health))
        .route("/rules/reload", post(reload_rules))
}

/// Prices one job. QUOTED and BLOCKED are both 200.
pub async fn estimate(
    State(state): State<AppState>,
    payload: Result<Json<EstimateRequest>, JsonRejection>,
) -> Result<Json<EstimateResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::MalformedRequest(e.body_text()))?;
    let snapshot = state.catalog.snapshot().await;

    let response = price_job(&snapshot.catalog, &request);
    match &response {
        EstimateResponse::Quoted(quote) => info!(
            category = %request.category,
            sell_price = %quote.sell_price,
            tier = %quote.tier_applied,
            revision = %snapshot.revision,
            "Estimate quoted"
        ),
        EstimateResponse::Blocked { clarification_notes } => info!(
            category = %request.category,
            notes = clarification_notes.len(),
            revision = %snapshot.revision,
            "Estimate blocked"
        ),
    }

    Ok(Json(response))
}

/// Prices a cart and adds tax over the combined subtotal.
pub async fn estimate_totals(
    State(state): State<AppState>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Json<OrderResponse>, ApiError> {
    let Json(order) = payload.map_err(|e| ApiError::MalformedRequest(e.body_text()))?;
    let snapshot = state.catalog.snapshot().await;

    let response = order_totals(&snapshot.catalog, &order.items, state.tax_rate);
    match response.totals() {
        Some(totals) => info!(
            items = totals.item_count,
            total = %totals.total,
            revision = %snapshot.revision,
            "Order totalled"
        ),
        None => debug!(items = order.items.len(), "Order blocked"),
    }

    Ok(Json(response))
}

/// Reports the live catalog revision.
pub async fn health(State(state): State<AppState>) -> Json<SnapshotStatus> {
    Json(state.catalog.snapshot().await.status())
}

/// Re-reads the rule directory. The previous catalog stays live on failure.
pub async fn reload_rules(State(state): State<AppState>) -> Result<Json<SnapshotStatus>, ApiError> {
    let snapshot = state.catalog.reload().await?;
    Ok(Json(snapshot.status()))
}
