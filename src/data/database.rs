use crate::data::errors::StoreError;
use crate::data::repos::traits::store::Store;
use async_trait::async_trait;
use diesel_async::{AsyncMysqlConnection, RunQueryDsl};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::deadpool::{Object, Pool};

/// Handle to the MySQL connection pool.
///
/// Cloning is cheap; every clone shares the same pool. Build one at startup
/// and hand it to the services that need it.
#[derive(Clone)]
pub struct Database {
    pool: Pool<AsyncMysqlConnection>,
}

impl Database {
    /// Builds the pool. No connection is opened until the first checkout.
    pub fn connect(database_url: &str, max_size: usize) -> Result<Self, StoreError> {
        let config = AsyncDieselConnectionManager::<AsyncMysqlConnection>::new(database_url);
        let pool = Pool::builder(config)
            .max_size(max_size)
            .build()
            .map_err(|e| StoreError::Pool(e.to_string()))?;

        tracing::info!(max_size, "DB connection pool created");

        Ok(Database { pool })
    }

    pub async fn get_connection(&self) -> Result<Object<AsyncMysqlConnection>, StoreError> {
        self.pool.get().await.map_err(StoreError::from)
    }
}

#[async_trait]
impl Store for Database {
    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.get_connection().await?;

        let _: i32 = diesel::select(diesel::dsl::sql::<diesel::sql_types::Integer>("1 + 1"))
            .get_result(&mut conn)
            .await?;

        Ok(())
    }
}
