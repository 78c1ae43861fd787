//! Product and category endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use lylas_core::validation::{validate_price_cents, validate_required_text};
use lylas_core::{Category, Product, ProductDetail};
use lylas_db::NewProduct;

use crate::{ApiJson, ApiResult, AppState};

/// `POST /api/products` and `PUT /api/products/{id}` request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub category_id: i64,
    pub price_cents: i64,
}

impl ProductRequest {
    fn into_new(self) -> ApiResult<NewProduct> {
        let name = validate_required_text("name", &self.name)?;
        validate_price_cents(self.price_cents)?;

        Ok(NewProduct {
            name,
            category_id: self.category_id,
            price_cents: self.price_cents,
        })
    }
}

/// Wire shape for a product with its category.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    pub category_id: i64,
    pub category_name: Option<String>,
}

impl From<ProductDetail> for ProductResponse {
    fn from(p: ProductDetail) -> Self {
        ProductResponse {
            id: p.id,
            name: p.name,
            price_cents: p.price_cents,
            category_id: p.category_id,
            category_name: Some(p.category_name),
        }
    }
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            id: p.id,
            name: p.name,
            price_cents: p.price_cents,
            category_id: p.category_id,
            category_name: None,
        }
    }
}

/// `GET /api/products`
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<ProductResponse>>> {
    let products = state.db.products().list().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// `POST /api/products`
pub async fn create(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<ProductRequest>,
) -> ApiResult<(StatusCode, Json<ProductResponse>)> {
    let product = state.db.products().create(request.into_new()?).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// `PUT /api/products/{id}`
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<ProductRequest>,
) -> ApiResult<Json<ProductResponse>> {
    let product = state.db.products().update(id, request.into_new()?).await?;
    Ok(Json(product.into()))
}

/// `DELETE /api/products/{id}`
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    state.db.products().delete(id).await?;
    Ok(Json(json!({ "success": true })))
}

/// `GET /api/categories`
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Category>>> {
    let categories = state.db.products().list_categories().await?;
    Ok(Json(categories))
}
