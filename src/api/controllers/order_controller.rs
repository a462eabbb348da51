use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use crate::api::errors::APIErrors;
use crate::api::extractors::JsonBody;
use crate::api::request::CreateOrderRequest;
use crate::api::response::{OrderCreatedResponse, OrderResponse};
use crate::api::state::AppState;
use crate::data::repos::traits::store::Store;
use crate::security::jwt::AccessClaims;
use crate::services::order_service::CartItem;

/// Place an order for the authenticated user
pub async fn create_order<S: Store>(
    State(state): State<AppState<S>>,
    claims: AccessClaims,
    JsonBody(payload): JsonBody<CreateOrderRequest>,
) -> Result<impl IntoResponse, APIErrors> {
    let items = cart_items(payload)?;
    let placed = state.orders.place_order(claims.user_id(), items).await?;

    let response = OrderCreatedResponse {
        message: "Order created".into(),
        order_id: placed.order_id,
        total: placed.total,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Orders of the authenticated user, newest first
pub async fn get_my_orders<S: Store>(
    State(state): State<AppState<S>>,
    claims: AccessClaims,
) -> Result<impl IntoResponse, APIErrors> {
    let orders = state.orders.list_orders_for_user(claims.user_id()).await?;

    let response: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();

    Ok((StatusCode::OK, Json(response)))
}

/// Maps the wire cart into domain items. Only the shape is checked here;
/// quantities and ids are validated by the order service.
fn cart_items(payload: CreateOrderRequest) -> Result<Vec<CartItem>, APIErrors> {
    let items = payload
        .items
        .ok_or_else(|| APIErrors::BadRequest("No products were sent in the order".into()))?;

    items
        .into_iter()
        .map(|item| match (item.product_id, item.cantidad) {
            (Some(product_id), Some(quantity)) => Ok(CartItem {
                product_id: i32::try_from(product_id).map_err(|_| invalid_item())?,
                quantity: i32::try_from(quantity).map_err(|_| invalid_item())?,
            }),
            _ => Err(invalid_item()),
        })
        .collect()
}

fn invalid_item() -> APIErrors {
    APIErrors::BadRequest("Each item needs a productId and a quantity greater than 0".into())
}
