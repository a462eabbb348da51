use axum::routing::get;
use axum::Router;
use crate::api::controllers::product_controller;
use crate::api::state::AppState;
use crate::data::repos::traits::store::Store;

pub fn routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route(
            "/",
            get(product_controller::get_all_products::<S>)
                .post(product_controller::create_product::<S>),
        )
        .route(
            "/{id}",
            get(product_controller::get_product_by_id::<S>)
                .put(product_controller::update_product::<S>)
                .delete(product_controller::delete_product::<S>),
        )
}
