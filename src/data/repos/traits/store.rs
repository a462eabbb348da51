use crate::data::errors::StoreError;
use crate::data::repos::traits::order_repository::OrderRepository;
use crate::data::repos::traits::product_repository::ProductRepository;
use crate::data::repos::traits::user_repository::UserRepository;
use async_trait::async_trait;

/// A complete storage backend that can be injected into the application.
#[async_trait]
pub trait Store:
    ProductRepository + UserRepository + OrderRepository + Clone + Send + Sync + 'static
{
    /// Round-trips to the backend.
    async fn ping(&self) -> Result<(), StoreError>;
}
