//! Event and schedule endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use lylas_core::validation::validate_required_text;
use lylas_core::{EventDetail, EventType, ValidationError};
use lylas_db::NewEvent;

use crate::{ApiJson, ApiResult, AppState};

/// `POST /api/events` request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub title: String,
    pub event_type_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl EventRequest {
    fn into_new(self) -> ApiResult<NewEvent> {
        let title = validate_required_text("title", &self.title)?;
        if self.end_date < self.start_date {
            return Err(ValidationError::OutOfRange {
                field: "endDate".to_string(),
                min: 0,
                max: 0,
            }
            .into());
        }

        Ok(NewEvent {
            title,
            event_type_id: self.event_type_id,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

/// Wire shape for an event with its schedule.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: i64,
    pub title: String,
    pub event_category: String,
    pub schedule_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<EventDetail> for EventResponse {
    fn from(e: EventDetail) -> Self {
        EventResponse {
            id: e.id,
            title: e.title,
            event_category: e.event_category,
            schedule_id: e.schedule_id,
            start_date: e.start_date,
            end_date: e.end_date,
        }
    }
}

/// `GET /api/events`
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<EventResponse>>> {
    let events = state.db.events().list().await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

/// `GET /api/event-types`
pub async fn list_event_types(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<EventType>>> {
    let types = state.db.events().list_event_types().await?;
    Ok(Json(types))
}

/// `POST /api/events`
pub async fn create(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<EventRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let event_id = state.db.events().create(request.into_new()?).await?;
    Ok((StatusCode::CREATED, Json(json!({ "eventId": event_id }))))
}

/// `DELETE /api/events/{id}`
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    state.db.events().delete(id).await?;
    Ok(Json(json!({ "success": true })))
}
