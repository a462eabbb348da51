use crate::data::models::user::{NewUser, User, UserRole};
use crate::data::repos::traits::user_repository::UserRepository;
use crate::security::jwt::JwtService;
use crate::security::password::PasswordService;
use crate::services::errors::UserServiceError;

/// Registration and login.
#[derive(Clone)]
pub struct UserService<R> {
    repo: R,
    passwords: PasswordService,
    jwt: JwtService,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R, jwt: JwtService) -> Self {
        UserService {
            repo,
            passwords: PasswordService::default(),
            jwt,
        }
    }

    /// Creates a customer account and returns its id.
    #[tracing::instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<i32, UserServiceError> {
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(UserServiceError::InvalidInput(
                "Name, email and password are required".into(),
            ));
        }

        if self.repo.get_user_by_email(email).await?.is_some() {
            return Err(UserServiceError::EmailTaken);
        }

        let password_hash = self.passwords.hash(password).await?;

        let user_id = self
            .repo
            .add_user(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
                role: UserRole::Customer.as_str().to_string(),
            })
            .await?;

        tracing::info!(user_id, "User registered");
        Ok(user_id)
    }

    /// Checks the credentials and issues an access token.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, User), UserServiceError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(UserServiceError::InvalidInput(
                "Email and password are required".into(),
            ));
        }

        let user = self
            .repo
            .get_user_by_email(email.trim())
            .await?
            .ok_or(UserServiceError::InvalidCredentials)?;

        if !self.passwords.verify(password, &user.password_hash).await? {
            return Err(UserServiceError::InvalidCredentials);
        }

        let token = self.jwt.generate_token(user.user_id, user.get_role())?;
        Ok((token, user))
    }
}
