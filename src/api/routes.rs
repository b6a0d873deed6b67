//! Request handlers.

use super::dto::{CheckoutRequest, LowStockQuery, RestockRequest};
use super::error::ApiError;
use super::AppState;
use crate::low_stock::LowStockReport;
use crate::model::{
    BranchId, ProductId, StockEntry, StockFilter, StockKey, TransactionFilter, TransactionId,
    TransactionLine,
};
use actor_framework::ActorClient;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "checkout-engine",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `POST /transactions`
pub async fn create_transactions(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<TransactionLine>>), ApiError> {
    let Json(request) = payload?;
    let order = request.into_order()?;
    let lines = state.coordinator.checkout(order).await?;
    Ok((StatusCode::CREATED, Json(lines)))
}

/// `GET /transactions`
pub async fn list_transactions(
    State(state): State<AppState>,
    query: Result<Query<TransactionFilter>, QueryRejection>,
) -> Result<Json<Vec<TransactionLine>>, ApiError> {
    let Query(filter) = query?;
    if let (Some(from), Some(to)) = (filter.from, filter.to) {
        if from > to {
            return Err(ApiError::invalid("`from` is after `to`"));
        }
    }
    Ok(Json(state.log.query(filter).await?))
}

/// `GET /transactions/{id}`
pub async fn get_transaction(
    State(state): State<AppState>,
    path: Result<Path<u32>, PathRejection>,
) -> Result<Json<TransactionLine>, ApiError> {
    let Path(id) = path?;
    let id = TransactionId(id);
    state
        .log
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Transaction line not found: {id}")))
}

/// `GET /inventory`
pub async fn list_inventory(
    State(state): State<AppState>,
    query: Result<Query<StockFilter>, QueryRejection>,
) -> Result<Json<Vec<StockEntry>>, ApiError> {
    let Query(filter) = query?;
    Ok(Json(state.ledger.entries(filter).await?))
}

/// `GET /inventory/{branch_id}/{product_id}`
pub async fn get_inventory(
    State(state): State<AppState>,
    path: Result<Path<(u32, u32)>, PathRejection>,
) -> Result<Json<StockEntry>, ApiError> {
    let Path((branch_id, product_id)) = path?;
    let key = StockKey::new(BranchId(branch_id), ProductId(product_id));
    let quantity = state.ledger.get(key).await?;
    Ok(Json(StockEntry {
        branch_id: key.branch_id,
        product_id: key.product_id,
        quantity,
    }))
}

/// `POST /inventory`: adds stock, opening the row on first use.
pub async fn restock(
    State(state): State<AppState>,
    payload: Result<Json<RestockRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StockEntry>), ApiError> {
    let Json(request) = payload?;
    let amount = u32::try_from(request.quantity)
        .ok()
        .filter(|q| *q > 0)
        .ok_or_else(|| {
            ApiError::invalid(format!("quantity must be positive, got {}", request.quantity))
        })?;
    let entry = state.ledger.credit(request.key(), amount).await?;
    info!(key = %entry.key(), quantity = entry.quantity, "Restocked");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// `GET /inventory/low-stock`
pub async fn low_stock(
    State(state): State<AppState>,
    query: Result<Query<LowStockQuery>, QueryRejection>,
) -> Result<Json<LowStockReport>, ApiError> {
    let Query(query) = query?;
    let report = match query.threshold {
        Some(threshold) => state.monitor.report_with(threshold).await?,
        None => state.monitor.report().await?,
    };
    Ok(Json(report))
}
