use crate::security::errors::AuthError;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};
use tokio::task;

/// Argon2id hashing for account passwords.
///
/// Hashes are stored as PHC strings, so verification reads the cost
/// parameters from the stored hash and keeps working after `params` change.
/// Both operations run on the blocking pool.
#[derive(Clone, Debug)]
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(Params::DEFAULT)
    }
}

impl PasswordService {
    pub fn new(params: Params) -> Self {
        PasswordService {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    pub async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let argon2 = self.argon2.clone();
        let password = password.to_owned();

        run_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|_| AuthError::HashingError)
        })
        .await
    }

    /// `Ok(false)` means the password does not match.
    pub async fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, AuthError> {
        let argon2 = self.argon2.clone();
        let password = password.to_owned();
        let stored_hash = stored_hash.to_owned();

        run_blocking(move || {
            let parsed = PasswordHash::new(&stored_hash).map_err(|_| AuthError::MalformedHash)?;

            match argon2.verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(argon2::password_hash::Error::Password) => Ok(false),
                Err(_) => Err(AuthError::VerificationError),
            }
        })
        .await
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T, AuthError>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(work).await.map_err(|e| {
        tracing::error!(error = %e, "Password worker task failed");
        AuthError::WorkerFailed
    })?
}
