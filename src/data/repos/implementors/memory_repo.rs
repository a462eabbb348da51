use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as SyncMutex, PoisonError};
use crate::data::errors::StoreError;
use crate::data::models::order::{NewOrder, Order, OrderLine, OrderWithItems};
use crate::data::models::order_item::{NewOrderItem, OrderItem};
use crate::data::models::product::{NewProduct, Product, ProductDeletion, UpdateProduct};
use crate::data::models::user::{NewUser, User};
use crate::data::repos::traits::order_repository::{
    CatalogStore, OrderLedger, OrderRepository, StoreTransaction, TransactionFuture,
};
use crate::data::repos::traits::product_repository::ProductRepository;
use crate::data::repos::traits::store::Store;
use crate::data::repos::traits::user_repository::UserRepository;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

#[derive(Debug, Default, Clone)]
struct MemoryState {
    products: BTreeMap<i32, Product>,
    users: BTreeMap<i32, User>,
    orders: BTreeMap<i32, Order>,
    order_items: Vec<OrderItem>,
    last_product_id: i32,
    last_user_id: i32,
    last_order_id: i32,
    last_order_item_id: i32,
}

impl MemoryState {
    fn next_id(counter: &mut i32) -> i32 {
        *counter += 1;
        *counter
    }
}

/// In-process store with the same contract as [`Database`](crate::data::database::Database).
///
/// Transactions are fully serialized: each one holds the state lock from
/// start to finish and works on a private copy that replaces the shared state
/// only when the work succeeds.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<Mutex<MemoryState>>,
    transactions: Arc<AtomicUsize>,
    stock_fault: Arc<SyncMutex<Option<StockFault>>>,
}

/// A failure the next stock decrement reports instead of running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StockFault {
    /// Backend outage, [`StoreError::Unavailable`].
    Unavailable,
    /// Another writer took the stock first; the update touches no row.
    LostRace,
    /// Deadlock or serialization failure, [`StoreError::Conflict`].
    Conflict,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of transactions started so far.
    pub fn transactions_started(&self) -> usize {
        self.transactions.load(Ordering::SeqCst)
    }

    /// Makes the next stock decrement fail with [`StoreError::Unavailable`].
    pub fn fail_next_stock_decrement(&self) {
        self.set_stock_fault(StockFault::Unavailable);
    }

    /// Makes the next stock decrement change nothing and report `false`, as
    /// when a concurrent order took the stock between the read and the update.
    pub fn lose_next_stock_race(&self) {
        self.set_stock_fault(StockFault::LostRace);
    }

    /// Makes the next stock decrement fail with [`StoreError::Conflict`].
    pub fn conflict_next_stock_decrement(&self) {
        self.set_stock_fault(StockFault::Conflict);
    }

    fn set_stock_fault(&self, fault: StockFault) {
        *self
            .stock_fault
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(fault);
    }

    pub async fn get_order_items(&self, order_id: i32) -> Vec<OrderItem> {
        let state = self.state.lock().await;
        state
            .order_items
            .iter()
            .filter(|item| item.order_id == order_id)
            .cloned()
            .collect()
    }

    pub async fn count_orders(&self) -> usize {
        self.state.lock().await.orders.len()
    }

    pub async fn count_order_items(&self) -> usize {
        self.state.lock().await.order_items.len()
    }
}

pub struct MemoryTransaction<'s> {
    state: &'s mut MemoryState,
    stock_fault: &'s SyncMutex<Option<StockFault>>,
}

#[async_trait]
impl<'s> CatalogStore for MemoryTransaction<'s> {
    async fn get_products_by_ids(&mut self, ids: &[i32]) -> Result<Vec<Product>, StoreError> {
        let mut found: Vec<Product> = ids
            .iter()
            .filter_map(|id| self.state.products.get(id).cloned())
            .collect();
        found.sort_by_key(|p| p.product_id);
        found.dedup_by_key(|p| p.product_id);
        Ok(found)
    }

    async fn decrement_stock(&mut self, product_id: i32, quantity: i32) -> Result<bool, StoreError> {
        let fault = self
            .stock_fault
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match fault {
            Some(StockFault::Unavailable) => {
                return Err(StoreError::Unavailable("injected stock decrement failure".into()));
            }
            Some(StockFault::Conflict) => {
                return Err(StoreError::Conflict("injected lock conflict".into()));
            }
            Some(StockFault::LostRace) => return Ok(false),
            None => {}
        }

        match self.state.products.get_mut(&product_id) {
            Some(product) if product.stock >= quantity => {
                product.stock -= quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl<'s> OrderLedger for MemoryTransaction<'s> {
    async fn insert_order(&mut self, order: &NewOrder) -> Result<i32, StoreError> {
        let order_id = MemoryState::next_id(&mut self.state.last_order_id);
        self.state.orders.insert(
            order_id,
            Order {
                order_id,
                user_id: order.user_id,
                total: order.total.clone(),
                status: order.status.clone(),
                created_at: Utc::now().naive_utc(),
            },
        );
        Ok(order_id)
    }

    async fn insert_line_item(&mut self, item: &NewOrderItem) -> Result<(), StoreError> {
        if !self.state.orders.contains_key(&item.order_id)
            || !self.state.products.contains_key(&item.product_id)
        {
            return Err(StoreError::Unavailable(format!(
                "foreign key violation for order {} / product {}",
                item.order_id, item.product_id
            )));
        }

        let order_item_id = MemoryState::next_id(&mut self.state.last_order_item_id);
        self.state.order_items.push(OrderItem {
            order_item_id,
            order_id: item.order_id,
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price.clone(),
        });
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for MemoryDatabase {
    async fn in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
        F: for<'t> FnOnce(&'t mut dyn StoreTransaction) -> TransactionFuture<'t, T, E>
            + Send
            + 'static,
    {
        self.transactions.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state.lock().await;
        let mut working = state.clone();

        let outcome = {
            let mut transaction = MemoryTransaction {
                state: &mut working,
                stock_fault: &self.stock_fault,
            };
            let tx: &mut dyn StoreTransaction = &mut transaction;
            work(tx).await
        };

        if outcome.is_ok() {
            *state = working;
        }

        outcome
    }

    async fn get_orders_for_user(&self, user_id: i32) -> Result<Vec<OrderWithItems>, StoreError> {
        let state = self.state.lock().await;

        let mut orders: Vec<Order> = state
            .orders
            .values()
            .filter(|order| order.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.order_id.cmp(&a.order_id))
        });

        let result = orders
            .into_iter()
            .map(|order| {
                let items = state
                    .order_items
                    .iter()
                    .filter(|item| item.order_id == order.order_id)
                    .map(|item| OrderLine {
                        product_id: item.product_id,
                        product_name: state
                            .products
                            .get(&item.product_id)
                            .map(|p| p.name.clone())
                            .unwrap_or_default(),
                        quantity: item.quantity,
                        unit_price: item.unit_price.clone(),
                    })
                    .collect();
                OrderWithItems { order, items }
            })
            .collect();

        Ok(result)
    }
}

#[async_trait]
impl ProductRepository for MemoryDatabase {
    async fn get_all_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.state.lock().await.products.values().cloned().collect())
    }

    async fn get_product_by_id(&self, id: i32) -> Result<Option<Product>, StoreError> {
        Ok(self.state.lock().await.products.get(&id).cloned())
    }

    async fn add_product(&self, item: NewProduct) -> Result<i32, StoreError> {
        let mut state = self.state.lock().await;
        let product_id = MemoryState::next_id(&mut state.last_product_id);
        state.products.insert(
            product_id,
            Product {
                product_id,
                name: item.name,
                description: item.description,
                price: item.price,
                stock: item.stock,
                image_url: item.image_url,
                created_at: Utc::now().naive_utc(),
            },
        );
        Ok(product_id)
    }

    async fn update_product(&self, id: i32, item: UpdateProduct) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        match state.products.get_mut(&id) {
            Some(product) => {
                item.apply_to(product);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_product(&self, id: i32) -> Result<ProductDeletion, StoreError> {
        let mut state = self.state.lock().await;

        if !state.products.contains_key(&id) {
            return Ok(ProductDeletion::NotFound);
        }
        if state.order_items.iter().any(|item| item.product_id == id) {
            return Ok(ProductDeletion::Referenced);
        }

        state.products.remove(&id);
        Ok(ProductDeletion::Deleted)
    }
}

#[async_trait]
impl UserRepository for MemoryDatabase {
    async fn add_user(&self, item: NewUser) -> Result<i32, StoreError> {
        let mut state = self.state.lock().await;

        if state.users.values().any(|u| u.email == item.email) {
            return Err(StoreError::Duplicate(format!("email {}", item.email)));
        }

        let user_id = MemoryState::next_id(&mut state.last_user_id);
        state.users.insert(
            user_id,
            User {
                user_id,
                name: item.name,
                email: item.email,
                password_hash: item.password_hash,
                role: item.role,
                created_at: Utc::now().naive_utc(),
            },
        );
        Ok(user_id)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl Store for MemoryDatabase {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
