//! Stock issuance ("stock-out") endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use lylas_core::validation::validate_quantity;
use lylas_core::{StockIssueDetail, ValidationError};
use lylas_db::{NewStockIssue, NewStockIssueLine};

use crate::{ApiJson, ApiResult, AppState};

/// One line of a new issuance.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockIssueLineRequest {
    pub stock_batch_id: i64,
    pub quantity: i64,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// `POST /api/stock-issues` request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockIssueRequest {
    pub employee_id: i64,
    pub issued_on: NaiveDate,
    pub lines: Vec<StockIssueLineRequest>,
}

impl StockIssueRequest {
    fn into_new(self) -> ApiResult<NewStockIssue> {
        if self.lines.is_empty() {
            return Err(ValidationError::Empty {
                field: "lines".to_string(),
            }
            .into());
        }
        for line in &self.lines {
            validate_quantity(line.quantity)?;
        }

        Ok(NewStockIssue {
            employee_id: self.employee_id,
            issued_on: self.issued_on,
            lines: self
                .lines
                .into_iter()
                .map(|line| NewStockIssueLine {
                    stock_batch_id: line.stock_batch_id,
                    quantity: line.quantity,
                    remarks: line.remarks,
                })
                .collect(),
        })
    }
}

/// Wire shape for one issuance line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockIssueResponse {
    pub issue_id: i64,
    pub issued_on: NaiveDate,
    pub employee_username: String,
    pub product_name: String,
    pub quantity: i64,
    pub remarks: Option<String>,
}

impl From<StockIssueDetail> for StockIssueResponse {
    fn from(d: StockIssueDetail) -> Self {
        StockIssueResponse {
            issue_id: d.issue_id,
            issued_on: d.issued_on,
            employee_username: d.employee_username,
            product_name: d.product_name,
            quantity: d.quantity,
            remarks: d.remarks,
        }
    }
}

/// `GET /api/stock-issues`
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<StockIssueResponse>>> {
    let issues = state.db.stock_issues().list().await?;
    Ok(Json(issues.into_iter().map(Into::into).collect()))
}

/// `POST /api/stock-issues`
pub async fn create(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<StockIssueRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let issue_id = state.db.stock_issues().create(request.into_new()?).await?;
    Ok((StatusCode::CREATED, Json(json!({ "issueId": issue_id }))))
}

/// `DELETE /api/stock-issues/{id}`
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    state.db.stock_issues().delete(id).await?;
    Ok(Json(json!({ "success": true })))
}
