use std::collections::HashMap;
use crate::data::database::Database;
use crate::data::errors::StoreError;
use crate::data::models::order::{NewOrder, Order, OrderLine, OrderWithItems};
use crate::data::models::order_item::{NewOrderItem, OrderItem};
use crate::data::models::product::Product;
use crate::data::repos::traits::order_repository::{
    CatalogStore, OrderLedger, OrderRepository, StoreTransaction, TransactionFuture,
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncMysqlConnection, RunQueryDsl};

/// A MySQL transaction borrowed from `AsyncConnection::transaction`.
pub struct MysqlTransaction<'c> {
    conn: &'c mut AsyncMysqlConnection,
}

#[async_trait]
impl<'c> CatalogStore for MysqlTransaction<'c> {
    async fn get_products_by_ids(&mut self, ids: &[i32]) -> Result<Vec<Product>, StoreError> {
        use crate::data::models::schema::products::dsl::{product_id, products};

        // Ascending id order keeps lock acquisition consistent across
        // concurrent placements touching the same products.
        let found = products
            .filter(product_id.eq_any(ids.to_vec()))
            .order(product_id.asc())
            .select(Product::as_select())
            .for_update()
            .load::<Product>(&mut *self.conn)
            .await?;

        Ok(found)
    }

    async fn decrement_stock(&mut self, id: i32, quantity: i32) -> Result<bool, StoreError> {
        use crate::data::models::schema::products::dsl::{product_id, products, stock};

        let affected = diesel::update(
            products
                .filter(product_id.eq(id))
                .filter(stock.ge(quantity)),
        )
        .set(stock.eq(stock - quantity))
        .execute(&mut *self.conn)
        .await?;

        Ok(affected == 1)
    }
}

#[async_trait]
impl<'c> OrderLedger for MysqlTransaction<'c> {
    async fn insert_order(&mut self, order: &NewOrder) -> Result<i32, StoreError> {
        use crate::data::models::schema::orders::dsl::orders;

        diesel::insert_into(orders)
            .values(order)
            .execute(&mut *self.conn)
            .await?;

        let new_id: i32 = diesel::select(diesel::dsl::sql::<diesel::sql_types::Integer>(
            "LAST_INSERT_ID()",
        ))
        .get_result(&mut *self.conn)
        .await?;

        Ok(new_id)
    }

    async fn insert_line_item(&mut self, item: &NewOrderItem) -> Result<(), StoreError> {
        use crate::data::models::schema::order_items::dsl::order_items;

        diesel::insert_into(order_items)
            .values(item)
            .execute(&mut *self.conn)
            .await?;

        Ok(())
    }
}

/// Carries either a database failure or the caller's own error out of the
/// diesel transaction closure. Both roll the transaction back.
enum Aborted<E> {
    Store(StoreError),
    Work(E),
}

impl<E> From<result::Error> for Aborted<E> {
    fn from(err: result::Error) -> Self {
        Aborted::Store(StoreError::from(err))
    }
}

#[async_trait]
impl OrderRepository for Database {
    async fn in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
        F: for<'t> FnOnce(&'t mut dyn StoreTransaction) -> TransactionFuture<'t, T, E>
            + Send
            + 'static,
    {
        let mut conn = self.get_connection().await?;
        let connection: &mut AsyncMysqlConnection = &mut conn;

        connection
            .transaction::<T, Aborted<E>, _>(move |connection| {
                async move {
                    let mut transaction = MysqlTransaction { conn: connection };
                    let tx: &mut dyn StoreTransaction = &mut transaction;
                    work(tx).await.map_err(Aborted::Work)
                }
                .scope_boxed()
            })
            .await
            .map_err(|aborted| match aborted {
                Aborted::Store(err) => E::from(err),
                Aborted::Work(err) => err,
            })
    }

    async fn get_orders_for_user(&self, user: i32) -> Result<Vec<OrderWithItems>, StoreError> {
        use crate::data::models::schema::orders::dsl::{created_at, order_id, orders, user_id};

        let mut conn = self.get_connection().await?;

        let orders_list = orders
            .filter(user_id.eq(user))
            .order((created_at.desc(), order_id.desc()))
            .select(Order::as_select())
            .load::<Order>(&mut conn)
            .await?;

        attach_items(&mut conn, orders_list).await
    }
}

/// Loads the line items of `orders_list` in one query, joined with the
/// product name, and groups them under their order.
async fn attach_items(
    conn: &mut AsyncMysqlConnection,
    orders_list: Vec<Order>,
) -> Result<Vec<OrderWithItems>, StoreError> {
    if orders_list.is_empty() {
        return Ok(Vec::new());
    }

    use crate::data::models::schema::order_items::dsl::{order_id, order_item_id, order_items};
    use crate::data::models::schema::products::dsl::{name, products};

    let ids: Vec<i32> = orders_list.iter().map(|o| o.order_id).collect();

    let items_data: Vec<(OrderItem, String)> = order_items
        .inner_join(products)
        .filter(order_id.eq_any(ids))
        .order(order_item_id.asc())
        .select((OrderItem::as_select(), name))
        .load::<(OrderItem, String)>(conn)
        .await?;

    let mut map: HashMap<i32, Vec<OrderLine>> = HashMap::new();

    for (item, product_name) in items_data {
        map.entry(item.order_id).or_default().push(OrderLine {
            product_id: item.product_id,
            product_name,
            quantity: item.quantity,
            unit_price: item.unit_price,
        });
    }

    let result = orders_list
        .into_iter()
        .map(|order| {
            let items = map.remove(&order.order_id).unwrap_or_default();
            OrderWithItems { order, items }
        })
        .collect();

    Ok(result)
}
