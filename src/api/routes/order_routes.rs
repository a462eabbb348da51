use axum::routing::{get, post};
use axum::Router;
use crate::api::controllers::order_controller;
use crate::api::state::AppState;
use crate::data::repos::traits::store::Store;

pub fn routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/", post(order_controller::create_order::<S>))
        .route("/mine", get(order_controller::get_my_orders::<S>))
}
