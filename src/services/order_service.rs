use std::collections::{HashMap, HashSet};
use crate::data::models::order::{NewOrder, OrderStatus, OrderWithItems};
use crate::data::models::order_item::NewOrderItem;
use crate::data::models::product::Product;
use crate::data::repos::traits::order_repository::{OrderRepository, StoreTransaction};
use crate::services::errors::OrderServiceError;
use bigdecimal::BigDecimal;
use futures::FutureExt;

/// Most lines a single cart may carry.
pub const MAX_CART_LINES: usize = 100;

/// One requested line of a cart. It carries no price; prices only ever come
/// from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItem {
    pub product_id: i32,
    pub quantity: i32,
}

/// A cart that passed the input checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new(items: Vec<CartItem>) -> Result<Self, OrderServiceError> {
        if items.is_empty() {
            return Err(OrderServiceError::Validation(
                "The order must contain at least one product".into(),
            ));
        }

        if items.len() > MAX_CART_LINES {
            return Err(OrderServiceError::Validation(format!(
                "An order may contain at most {} lines",
                MAX_CART_LINES
            )));
        }

        for item in &items {
            if item.product_id <= 0 || item.quantity <= 0 {
                return Err(OrderServiceError::Validation(
                    "Each item needs a productId and a quantity greater than 0".into(),
                ));
            }
        }

        Ok(Cart { items })
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Distinct product ids in first-seen order.
    pub fn product_ids(&self) -> Vec<i32> {
        let mut seen = HashSet::with_capacity(self.items.len());
        self.items
            .iter()
            .map(|item| item.product_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

/// Result of a committed placement.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub order_id: i32,
    pub total: BigDecimal,
}

/// Order placement and order history for authenticated users.
#[derive(Clone)]
pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        OrderService { repo }
    }

    /// Validates, prices and commits `items` as a new pending order owned by
    /// `user_id`, deducting stock in the same transaction.
    #[tracing::instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn place_order(
        &self,
        user_id: i32,
        items: Vec<CartItem>,
    ) -> Result<PlacedOrder, OrderServiceError> {
        let cart = Cart::new(items)?;

        let result = self
            .repo
            .in_transaction(move |tx| {
                async move { commit_cart(tx, user_id, &cart).await }.boxed()
            })
            .await;

        match &result {
            Ok(placed) => tracing::info!(
                order_id = placed.order_id,
                total = %placed.total,
                "Order placed"
            ),
            Err(OrderServiceError::DatabaseError(reason)) => {
                tracing::error!(%reason, "Order placement failed, transaction rolled back")
            }
            Err(e) => tracing::warn!(error = %e, "Order rejected, transaction rolled back"),
        }

        result
    }

    /// Orders of `user_id`, newest first, each with its line items.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<OrderWithItems>, OrderServiceError> {
        self.repo.get_orders_for_user(user_id).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to load orders");
            OrderServiceError::from(e)
        })
    }
}

/// Runs inside the placement transaction. Returning `Err` rolls back every
/// write made here.
async fn commit_cart(
    tx: &mut dyn StoreTransaction,
    user_id: i32,
    cart: &Cart,
) -> Result<PlacedOrder, OrderServiceError> {
    let ids = cart.product_ids();
    let catalog: HashMap<i32, Product> = tx
        .get_products_by_ids(&ids)
        .await?
        .into_iter()
        .map(|p| (p.product_id, p))
        .collect();

    let missing: Vec<i32> = ids
        .iter()
        .copied()
        .filter(|id| !catalog.contains_key(id))
        .collect();
    if !missing.is_empty() {
        return Err(OrderServiceError::ProductNotFound(missing));
    }

    // Stock left for each product after the lines validated so far, so a
    // product listed twice is checked against its combined quantity.
    let mut remaining: HashMap<i32, i32> =
        catalog.values().map(|p| (p.product_id, p.stock)).collect();
    let mut total = BigDecimal::from(0);
    let mut lines: Vec<(CartItem, BigDecimal)> = Vec::with_capacity(cart.items().len());

    for item in cart.items() {
        let product = &catalog[&item.product_id];
        let available = remaining.entry(item.product_id).or_insert(0);

        if item.quantity > *available {
            return Err(OrderServiceError::InsufficientStock {
                product_id: item.product_id,
            });
        }
        *available -= item.quantity;

        total += &product.price * BigDecimal::from(item.quantity);
        lines.push((*item, product.price.clone()));
    }

    let order_id = tx
        .insert_order(&NewOrder {
            user_id,
            total: total.clone(),
            status: OrderStatus::Pending.as_str().to_string(),
        })
        .await?;

    for (item, unit_price) in lines {
        tx.insert_line_item(&NewOrderItem {
            order_id,
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price,
        })
        .await?;

        if !tx.decrement_stock(item.product_id, item.quantity).await? {
            return Err(OrderServiceError::InsufficientStock {
                product_id: item.product_id,
            });
        }
    }

    Ok(PlacedOrder { order_id, total })
}
