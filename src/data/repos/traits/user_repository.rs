use crate::data::errors::StoreError;
use crate::data::models::user::{NewUser, User};
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns the id of the inserted user. A taken email is reported as
    /// [`StoreError::Duplicate`].
    async fn add_user(&self, item: NewUser) -> Result<i32, StoreError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}
