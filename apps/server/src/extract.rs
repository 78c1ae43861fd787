//! Request body extractor.
//!
//! Axum's stock `Json` extractor answers 422 when a body fails to
//! deserialize. This API reports every client-side input problem as
//! 400 with the `{"error": ...}` shape, whether the failure is a
//! missing field at deserialization or a rule violation afterwards,
//! so handlers take `ApiJson<T>` instead.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// `Json<T>` with deserialization failures mapped to 400.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError::MalformedBody(rejection.body_text())),
        }
    }
}
