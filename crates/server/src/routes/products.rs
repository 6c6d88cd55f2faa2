use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use service::product::Product;
use tracing::info;

use crate::errors::ApiError;
use crate::extract::{NewProduct, ProductId, ReplaceProduct};
use crate::routes::ServerState;

pub const DELETED_MESSAGE: &str = "product deleted successfully";

/// Success envelope: `{ "data": ... }`.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

fn data<T>(data: T) -> Json<Data<T>> {
    Json(Data { data })
}

#[utoipa::path(
    get, path = "/api/products", tag = "products",
    responses(
        (status = 200, description = "All products, highest id first", body = crate::openapi::ProductListResponse)
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Data<Vec<Product>>>, ApiError> {
    let products = state.products.list().await?;
    info!(count = products.len(), "list products");
    Ok(data(products))
}

#[utoipa::path(
    get, path = "/api/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ProductResponse),
        (status = 400, description = "Invalid Id", body = crate::openapi::ValidationErrorResponse),
        (status = 404, description = "Product not found", body = crate::openapi::NotFoundResponse)
    )
)]
pub async fn get(State(state): State<ServerState>, ProductId(id): ProductId) -> Result<Json<Data<Product>>, ApiError> {
    Ok(data(state.products.get(id).await?))
}

#[utoipa::path(
    post, path = "/api/products", tag = "products",
    request_body = crate::openapi::CreateProductInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ProductResponse),
        (status = 400, description = "Validation Error", body = crate::openapi::ValidationErrorResponse)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    NewProduct(draft): NewProduct,
) -> Result<(StatusCode, Json<Data<Product>>), ApiError> {
    let product = state.products.create(draft).await?;
    Ok((StatusCode::CREATED, data(product)))
}

#[utoipa::path(
    put, path = "/api/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = crate::openapi::ReplaceProductInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ProductResponse),
        (status = 400, description = "Invalid Id or Validation Error", body = crate::openapi::ValidationErrorResponse),
        (status = 404, description = "Product not found", body = crate::openapi::NotFoundResponse)
    )
)]
pub async fn replace(
    State(state): State<ServerState>,
    ReplaceProduct { id, draft }: ReplaceProduct,
) -> Result<Json<Data<Product>>, ApiError> {
    Ok(data(state.products.replace(id, draft).await?))
}

#[utoipa::path(
    patch, path = "/api/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Availability flipped", body = crate::openapi::ProductResponse),
        (status = 400, description = "Invalid Id", body = crate::openapi::ValidationErrorResponse),
        (status = 404, description = "Product not found", body = crate::openapi::NotFoundResponse)
    )
)]
pub async fn toggle_availability(
    State(state): State<ServerState>,
    ProductId(id): ProductId,
) -> Result<Json<Data<Product>>, ApiError> {
    Ok(data(state.products.toggle_availability(id).await?))
}

#[utoipa::path(
    delete, path = "/api/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::DeletedResponse),
        (status = 400, description = "Invalid Id", body = crate::openapi::ValidationErrorResponse),
        (status = 404, description = "Product not found", body = crate::openapi::NotFoundResponse)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    ProductId(id): ProductId,
) -> Result<Json<Data<&'static str>>, ApiError> {
    state.products.delete(id).await?;
    Ok(data(DELETED_MESSAGE))
}
