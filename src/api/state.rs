use crate::api::config::Config;
use crate::data::repos::traits::store::Store;
use crate::security::jwt::JwtService;
use crate::services::order_service::OrderService;
use crate::services::product_service::ProductService;
use crate::services::user_service::UserService;

/// Shared handler state. Every service holds a clone of the same store handle.
#[derive(Clone)]
pub struct AppState<S> {
    pub store: S,
    pub orders: OrderService<S>,
    pub products: ProductService<S>,
    pub users: UserService<S>,
    pub jwt: JwtService,
}

impl<S: Store> AppState<S> {
    pub fn new(store: S, jwt: JwtService) -> Self {
        AppState {
            orders: OrderService::new(store.clone()),
            products: ProductService::new(store.clone()),
            users: UserService::new(store.clone(), jwt.clone()),
            store,
            jwt,
        }
    }

    pub fn from_config(store: S, config: &Config) -> Self {
        Self::new(
            store,
            JwtService::new(&config.jwt_secret, config.jwt_expiration_minutes),
        )
    }
}
