use crate::data::errors::StoreError;
use crate::data::models::order::{NewOrder, OrderWithItems};
use crate::data::models::order_item::NewOrderItem;
use crate::data::models::product::Product;
use async_trait::async_trait;
use futures::future::BoxFuture;

/// Product reads and stock changes available inside a transaction.
#[async_trait]
pub trait CatalogStore: Send {
    /// Loads the products with the given ids and locks their rows until the
    /// transaction ends. Missing ids are simply absent from the result.
    async fn get_products_by_ids(&mut self, ids: &[i32]) -> Result<Vec<Product>, StoreError>;

    /// Subtracts `quantity` from the product's stock only if enough stock is
    /// left. Returns `false` when nothing was changed.
    async fn decrement_stock(&mut self, product_id: i32, quantity: i32) -> Result<bool, StoreError>;
}

/// Order writes available inside a transaction.
#[async_trait]
pub trait OrderLedger: Send {
    /// Returns the id of the inserted order.
    async fn insert_order(&mut self, order: &NewOrder) -> Result<i32, StoreError>;

    async fn insert_line_item(&mut self, item: &NewOrderItem) -> Result<(), StoreError>;
}

/// Everything an order placement needs from one open transaction.
pub trait StoreTransaction: CatalogStore + OrderLedger {}

impl<T: CatalogStore + OrderLedger> StoreTransaction for T {}

/// Work executed inside [`OrderRepository::in_transaction`].
pub type TransactionFuture<'t, T, E> = BoxFuture<'t, Result<T, E>>;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Runs `work` inside a single transaction.
    ///
    /// The transaction commits when `work` returns `Ok` and rolls back on
    /// `Err`, so nothing `work` wrote is visible after a failure.
    async fn in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
        F: for<'t> FnOnce(&'t mut dyn StoreTransaction) -> TransactionFuture<'t, T, E>
            + Send
            + 'static;

    /// Orders of one user, newest first, each with its line items.
    async fn get_orders_for_user(&self, user_id: i32) -> Result<Vec<OrderWithItems>, StoreError>;
}
