use std::time::Instant;

use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::store::ProductStore;

// Every operation loads the catalog fresh; mutations hold the store's writer
// lock until their save has finished.

pub async fn fetch_all_products(store: &ProductStore) -> Vec<Product> {
    let start = Instant::now();
    let products = store.load().await.products;

    info!(
        count = products.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Listed products"
    );
    products
}

pub async fn fetch_product_by_id(store: &ProductStore, id: RequestedId) -> AppResult<Product> {
    let catalog = store.load().await;
    let product = catalog.find(&id).cloned().ok_or(AppError::NotFound(id))?;

    info!(id = product.id, "Fetched product");
    Ok(product)
}

pub async fn insert_product(store: &ProductStore, payload: CreateProduct) -> AppResult<Product> {
    let _writer = store.lock().await;
    let start = Instant::now();
    let mut catalog = store.load().await;

    let id = catalog.next_id().ok_or(AppError::IdsExhausted(i64::MAX))?;
    let product = payload
        .into_product(id)
        .ok_or_else(|| AppError::Validation("Field 'name' is required".to_string()))?;

    catalog.products.push(product.clone());
    store.save(&catalog).await?;

    info!(
        id = product.id,
        name = %product.name,
        elapsed_ms = start.elapsed().as_millis(),
        "Created product"
    );
    Ok(product)
}

pub async fn update_product(
    store: &ProductStore,
    id: RequestedId,
    payload: UpdateProduct,
) -> AppResult<Product> {
    let _writer = store.lock().await;
    let start = Instant::now();
    let mut catalog = store.load().await;

    let index = catalog.position(&id).ok_or(AppError::NotFound(id))?;
    payload.apply_to(&mut catalog.products[index]);
    store.save(&catalog).await?;

    let product = catalog.products[index].clone();
    info!(
        id = product.id,
        elapsed_ms = start.elapsed().as_millis(),
        "Updated product"
    );
    Ok(product)
}

/// Removes the product, keeping the order of the rest, and returns it.
pub async fn delete_product(store: &ProductStore, id: RequestedId) -> AppResult<Product> {
    let _writer = store.lock().await;
    let start = Instant::now();
    let mut catalog = store.load().await;

    let index = catalog.position(&id).ok_or(AppError::NotFound(id))?;
    let product = catalog.products.remove(index);
    store.save(&catalog).await?;

    info!(
        id = product.id,
        remaining = catalog.products.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Deleted product"
    );
    Ok(product)
}
