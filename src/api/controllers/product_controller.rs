use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use crate::api::errors::APIErrors;
use crate::api::extractors::JsonBody;
use crate::api::request::{CreateProductRequest, UpdateProductRequest};
use crate::api::response::{CreatedResponse, MessageResponse, ProductResponse};
use crate::api::state::AppState;
use crate::data::models::product::{NewProduct, UpdateProduct};
use crate::data::repos::traits::store::Store;
use crate::security::jwt::AccessClaims;

/// List every product
pub async fn get_all_products<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, APIErrors> {
    let products = state.products.get_all_products().await?;

    let response: Vec<ProductResponse> =
        products.into_iter().map(ProductResponse::from).collect();

    Ok(Json(response))
}

/// Get product by ID
pub async fn get_product_by_id<S: Store>(
    State(state): State<AppState<S>>,
    Path(product_id): Path<i32>,
) -> Result<impl IntoResponse, APIErrors> {
    let product = state.products.get_product_by_id(product_id).await?;

    Ok(Json(ProductResponse::from(product)))
}

/// Create a product (admin)
pub async fn create_product<S: Store>(
    State(state): State<AppState<S>>,
    claims: AccessClaims,
    JsonBody(payload): JsonBody<CreateProductRequest>,
) -> Result<impl IntoResponse, APIErrors> {
    let product_id = state
        .products
        .create_product(claims.role, NewProduct::from(payload))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Product created".into(),
            id: product_id,
        }),
    ))
}

/// Update a product (admin)
pub async fn update_product<S: Store>(
    State(state): State<AppState<S>>,
    claims: AccessClaims,
    Path(product_id): Path<i32>,
    JsonBody(payload): JsonBody<UpdateProductRequest>,
) -> Result<impl IntoResponse, APIErrors> {
    state
        .products
        .update_product(claims.role, product_id, UpdateProduct::from(payload))
        .await?;

    Ok(Json(MessageResponse {
        message: "Product updated".into(),
    }))
}

/// Delete a product (admin); refused while orders reference it
pub async fn delete_product<S: Store>(
    State(state): State<AppState<S>>,
    claims: AccessClaims,
    Path(product_id): Path<i32>,
) -> Result<impl IntoResponse, APIErrors> {
    state
        .products
        .delete_product(claims.role, product_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Product deleted".into(),
    }))
}
