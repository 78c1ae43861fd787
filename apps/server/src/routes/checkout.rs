//! The checkout endpoint.
//!
//! ## Flow
//! ```text
//! POST /api/checkout
//!   │
//!   ├─ deserialize CheckoutRequest      → 400 on missing/mistyped fields
//!   ├─ CheckoutDraft::validate()        → 400 on any rule violation
//!   ├─ CheckoutRepository::process()    → atomic unit of work
//!   │     └─ InsufficientStock          → 500, nothing persisted
//!   └─ 201 CheckoutResponse
//! ```

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use lylas_core::{CheckoutDraft, CheckoutItem, PaymentMethod};

use crate::{ApiJson, ApiResult, AppState};

/// One line of the checkout request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItemRequest {
    pub stock_batch_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

/// `POST /api/checkout` request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub employee_id: i64,
    #[serde(default)]
    pub schedule_id: Option<i64>,
    pub items: Vec<CheckoutItemRequest>,
    pub total_cents: i64,
    /// Whole-percent discount, 0..=100. Defaults to 0.
    #[serde(default)]
    pub discount_percent: u32,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub cash_received_cents: i64,
}

impl CheckoutRequest {
    fn into_draft(self) -> CheckoutDraft {
        CheckoutDraft {
            employee_id: self.employee_id,
            schedule_id: self.schedule_id,
            items: self
                .items
                .into_iter()
                .map(|item| CheckoutItem {
                    stock_batch_id: item.stock_batch_id,
                    quantity: item.quantity,
                    unit_price_cents: item.unit_price_cents,
                    subtotal_cents: item.subtotal_cents,
                })
                .collect(),
            total_cents: self.total_cents,
            discount_percent: self.discount_percent,
            payment_method: self.payment_method,
            cash_received_cents: self.cash_received_cents,
        }
    }
}

/// `POST /api/checkout` response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub transaction_id: i64,
    pub total_cents: i64,
    pub discounted_total_cents: i64,
    pub cash_received_cents: i64,
    pub change_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// `POST /api/checkout`
pub async fn checkout(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<CheckoutRequest>,
) -> ApiResult<(StatusCode, Json<CheckoutResponse>)> {
    let draft = request.into_draft();
    draft.validate()?;

    let receipt = state.db.checkout().process(&draft).await?;

    info!(
        transaction_id = receipt.transaction_id,
        total_cents = receipt.total_cents,
        "Checkout accepted"
    );

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            transaction_id: receipt.transaction_id,
            total_cents: receipt.total_cents,
            discounted_total_cents: receipt.discounted_total_cents,
            cash_received_cents: receipt.cash_received_cents,
            change_cents: receipt.change_cents,
            created_at: receipt.created_at,
        }),
    ))
}
