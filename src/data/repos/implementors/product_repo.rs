use crate::data::database::Database;
use crate::data::errors::StoreError;
use crate::data::models::product::{NewProduct, Product, ProductDeletion, UpdateProduct};
use crate::data::repos::traits::product_repository::ProductRepository;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

#[async_trait]
impl ProductRepository for Database {
    async fn get_all_products(&self) -> Result<Vec<Product>, StoreError> {
        use crate::data::models::schema::products::dsl::{product_id, products};

        let mut conn = self.get_connection().await?;

        let value = products
            .order(product_id.asc())
            .select(Product::as_select())
            .load::<Product>(&mut conn)
            .await?;

        Ok(value)
    }

    async fn get_product_by_id(&self, id: i32) -> Result<Option<Product>, StoreError> {
        use crate::data::models::schema::products::dsl::{product_id, products};

        let mut conn = self.get_connection().await?;

        match products
            .filter(product_id.eq(id))
            .select(Product::as_select())
            .first::<Product>(&mut conn)
            .await
        {
            Ok(value) => Ok(Some(value)),
            Err(result::Error::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn add_product(&self, item: NewProduct) -> Result<i32, StoreError> {
        use crate::data::models::schema::products::dsl::products;

        let mut conn = self.get_connection().await?;

        let new_id = conn
            .transaction::<i32, result::Error, _>(|connection| {
                async move {
                    diesel::insert_into(products)
                        .values(&item)
                        .execute(connection)
                        .await?;

                    diesel::select(diesel::dsl::sql::<diesel::sql_types::Integer>(
                        "LAST_INSERT_ID()",
                    ))
                    .get_result(connection)
                    .await
                }
                .scope_boxed()
            })
            .await?;

        Ok(new_id)
    }

    async fn update_product(&self, id: i32, item: UpdateProduct) -> Result<bool, StoreError> {
        use crate::data::models::schema::products::dsl::{product_id, products};

        let mut conn = self.get_connection().await?;

        // An empty changeset is rejected by diesel, so only check existence.
        if item.is_empty() {
            let count: i64 = products
                .filter(product_id.eq(id))
                .count()
                .get_result(&mut conn)
                .await?;
            return Ok(count > 0);
        }

        let affected = diesel::update(products.filter(product_id.eq(id)))
            .set(&item)
            .execute(&mut conn)
            .await?;

        if affected > 0 {
            return Ok(true);
        }

        // MySQL reports zero affected rows when the values did not change.
        let count: i64 = products
            .filter(product_id.eq(id))
            .count()
            .get_result(&mut conn)
            .await?;
        Ok(count > 0)
    }

    async fn delete_product(&self, id: i32) -> Result<ProductDeletion, StoreError> {
        use crate::data::models::schema::order_items::dsl::{order_items, product_id as item_product_id};
        use crate::data::models::schema::products::dsl::{product_id, products};

        let mut conn = self.get_connection().await?;

        let outcome = conn
            .transaction::<ProductDeletion, result::Error, _>(|connection| {
                async move {
                    let found = products
                        .filter(product_id.eq(id))
                        .select(product_id)
                        .for_update()
                        .first::<i32>(connection)
                        .await
                        .optional()?;

                    if found.is_none() {
                        return Ok(ProductDeletion::NotFound);
                    }

                    let references: i64 = order_items
                        .filter(item_product_id.eq(id))
                        .count()
                        .get_result(connection)
                        .await?;

                    if references > 0 {
                        return Ok(ProductDeletion::Referenced);
                    }

                    diesel::delete(products.filter(product_id.eq(id)))
                        .execute(connection)
                        .await?;

                    Ok(ProductDeletion::Deleted)
                }
                .scope_boxed()
            })
            .await?;

        Ok(outcome)
    }
}
