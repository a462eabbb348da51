use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("Password hashing failed")]
    HashingError,
    #[error("Password verification failed")]
    VerificationError,
    #[error("Stored password hash is not a valid PHC string")]
    MalformedHash,
    /// The blocking task running the hash panicked or was cancelled.
    #[error("Password worker task failed")]
    WorkerFailed,
    #[error("Authentication token has expired.")]
    TokenExpired,
    #[error("Token creation failed")]
    TokenCreationError,
    #[error("Invalid token credentials provided.")]
    InvalidToken,
}
