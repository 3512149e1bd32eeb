use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::{
    db,
    error::AppResult,
    handlers::JsonBody,
    models::{CreateProduct, Product, RequestedId, UpdateProduct},
    AppState,
};

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_products(State(state): State<AppState>) -> (StatusCode, Json<Vec<Product>>) {
    let products = db::fetch_all_products(&state.store).await;
    (StatusCode::OK, Json(products))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateProduct>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = db::insert_product(&state.store, payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = db::fetch_product_by_id(&state.store, RequestedId::parse(&id)).await?;
    Ok((StatusCode::OK, Json(product)))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateProduct>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = db::update_product(&state.store, RequestedId::parse(&id), payload).await?;
    Ok((StatusCode::OK, Json(product)))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let product = db::delete_product(&state.store, RequestedId::parse(&id)).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": format!("Product with id {} was deleted", product.id),
        })),
    ))
}
