use crate::data::database::Database;
use crate::data::errors::StoreError;
use crate::data::models::user::{NewUser, User};
use crate::data::repos::traits::user_repository::UserRepository;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

#[async_trait]
impl UserRepository for Database {
    async fn add_user(&self, item: NewUser) -> Result<i32, StoreError> {
        use crate::data::models::schema::users::dsl::users;

        let mut conn = self.get_connection().await?;

        let new_id = conn
            .transaction::<i32, result::Error, _>(|connection| {
                async move {
                    diesel::insert_into(users)
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

    async fn get_user_by_email(&self, email_query: &str) -> Result<Option<User>, StoreError> {
        use crate::data::models::schema::users::dsl::{email, users};

        let mut conn = self.get_connection().await?;

        match users
            .filter(email.eq(email_query))
            .select(User::as_select())
            .first::<User>(&mut conn)
            .await
        {
            Ok(value) => Ok(Some(value)),
            Err(result::Error::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
