//! Stock batch endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use lylas_core::validation::validate_price_cents;
use lylas_core::{StockBatch, StockBatchDetail, ValidationError};
use lylas_db::NewStockBatch;

use crate::{ApiJson, ApiResult, AppState};

/// `POST /api/stock` and `PUT /api/stock/{id}` request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockBatchRequest {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub expiry_date: NaiveDate,
}

impl StockBatchRequest {
    fn into_new(self) -> ApiResult<NewStockBatch> {
        // Zero is allowed here: a correction may zero a lot out.
        if self.quantity < 0 {
            return Err(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into());
        }
        validate_price_cents(self.unit_price_cents)?;

        Ok(NewStockBatch {
            product_id: self.product_id,
            quantity: self.quantity,
            unit_price_cents: self.unit_price_cents,
            expiry_date: self.expiry_date,
        })
    }
}

/// Wire shape for a stock batch.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockBatchResponse {
    pub id: i64,
    pub product_id: i64,
    pub product_name: Option<String>,
    pub category_name: Option<String>,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub expiry_date: NaiveDate,
}

impl From<StockBatchDetail> for StockBatchResponse {
    fn from(b: StockBatchDetail) -> Self {
        StockBatchResponse {
            id: b.id,
            product_id: b.product_id,
            product_name: Some(b.product_name),
            category_name: Some(b.category_name),
            quantity: b.quantity,
            unit_price_cents: b.unit_price_cents,
            expiry_date: b.expiry_date,
        }
    }
}

impl From<StockBatch> for StockBatchResponse {
    fn from(b: StockBatch) -> Self {
        StockBatchResponse {
            id: b.id,
            product_id: b.product_id,
            product_name: None,
            category_name: None,
            quantity: b.quantity,
            unit_price_cents: b.unit_price_cents,
            expiry_date: b.expiry_date,
        }
    }
}

/// `GET /api/stock`
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<StockBatchResponse>>> {
    let batches = state.db.stock().list().await?;
    Ok(Json(batches.into_iter().map(Into::into).collect()))
}

/// `GET /api/stock/available`
///
/// Sellable batches only (quantity > 0), soonest expiry first. The
/// register UI offers these as the lots a sale can draw from.
pub async fn list_available(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<StockBatchResponse>>> {
    let batches = state.db.stock().list_available().await?;
    Ok(Json(batches.into_iter().map(Into::into).collect()))
}

/// `POST /api/stock`
pub async fn create(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<StockBatchRequest>,
) -> ApiResult<(StatusCode, Json<StockBatchResponse>)> {
    let batch = state.db.stock().create(request.into_new()?).await?;
    Ok((StatusCode::CREATED, Json(batch.into())))
}

/// `PUT /api/stock/{id}`
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<StockBatchRequest>,
) -> ApiResult<Json<StockBatchResponse>> {
    let batch = state.db.stock().update(id, request.into_new()?).await?;
    Ok(Json(batch.into()))
}

/// `DELETE /api/stock/{id}`
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    state.db.stock().delete(id).await?;
    Ok(Json(json!({ "success": true })))
}
