//! Employee login and lookup.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use lylas_core::Employee;
use lylas_db::DbError;

use crate::{ApiError, ApiJson, ApiResult, AppState};

/// `POST /api/login` request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Employee wire shape. The stored password never leaves the server.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub id: i64,
    pub username: String,
    pub full_name: String,
}

impl From<Employee> for EmployeeResponse {
    fn from(e: Employee) -> Self {
        EmployeeResponse {
            id: e.id,
            username: e.username,
            full_name: e.full_name,
        }
    }
}

/// `POST /api/login`
///
/// 401 on any credential failure; the response does not say whether the
/// username or the password was wrong.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<EmployeeResponse>> {
    let employee = state
        .db
        .employees()
        .verify_login(&request.username, &request.password)
        .await
        .map_err(|err| match err {
            DbError::NotFound { .. } => ApiError::Unauthorized,
            other => ApiError::Db(other),
        })?;

    Ok(Json(employee.into()))
}

/// `GET /api/employees`
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<EmployeeResponse>>> {
    let employees = state.db.employees().list().await?;
    Ok(Json(employees.into_iter().map(Into::into).collect()))
}

/// `GET /api/employees/{id}`
pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<EmployeeResponse>> {
    let employee = state.db.employees().get(id).await?;
    Ok(Json(employee.into()))
}
