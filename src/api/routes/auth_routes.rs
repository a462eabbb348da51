use axum::routing::post;
use axum::Router;
use crate::api::controllers::auth_controller;
use crate::api::state::AppState;
use crate::data::repos::traits::store::Store;

pub fn routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/register", post(auth_controller::register::<S>))
        .route("/login", post(auth_controller::login::<S>))
}
