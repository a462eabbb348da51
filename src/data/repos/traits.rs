pub mod order_repository;
pub mod product_repository;
pub mod store;
pub mod user_repository;
