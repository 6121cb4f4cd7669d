use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::error::{ApiError, MessageResponse};
use crate::middleware::AuthUser;
use crate::AppState;
use catalog::{Product, ProductAction, ProductDraft, ProductService};

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct BulkCreatedResponse {
    pub message: String,
    pub created: Vec<Product>,
}

/// GET /api/products - active products, newest first
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.product_service.list_active().await?;
    Ok(Json(products))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    payload: Result<Json<ProductDraft>, JsonRejection>,
) -> Result<Json<CreatedResponse>, ApiError> {
    // Role first: a forbidden caller gets 403 whatever it sent.
    ProductService::authorize(&principal, ProductAction::Add)?;
    let Json(draft) = payload?;

    let product = state.product_service.create(&principal, draft).await?;

    Ok(Json(CreatedResponse {
        message: "Product created".to_string(),
        product,
    }))
}

/// DELETE /api/products/{id}
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.product_service.delete(&principal, &id).await?;
    Ok(MessageResponse::new("Product deleted"))
}

/// POST /api/products/bulk - body must be a non-empty array
pub async fn bulk_create_products(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Json<BulkCreatedResponse>, ApiError> {
    ProductService::authorize(&principal, ProductAction::Add)?;
    let Json(body) = payload?;

    let created = state.product_service.bulk_create(&principal, body).await?;

    Ok(Json(BulkCreatedResponse {
        message: format!("{} products added", created.len()),
        created,
    }))
}
