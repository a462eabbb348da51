pub mod auth_controller;
pub mod order_controller;
pub mod product_controller;
