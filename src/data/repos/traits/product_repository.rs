use crate::data::errors::StoreError;
use crate::data::models::product::{NewProduct, Product, ProductDeletion, UpdateProduct};
use async_trait::async_trait;

/// Catalog administration and reads outside of order placement.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn get_all_products(&self) -> Result<Vec<Product>, StoreError>;

    async fn get_product_by_id(&self, id: i32) -> Result<Option<Product>, StoreError>;

    /// Returns the id of the inserted product.
    async fn add_product(&self, item: NewProduct) -> Result<i32, StoreError>;

    /// Returns `false` when no product has the given id.
    async fn update_product(&self, id: i32, item: UpdateProduct) -> Result<bool, StoreError>;

    /// Deletes the product unless an order line references it.
    async fn delete_product(&self, id: i32) -> Result<ProductDeletion, StoreError>;
}
