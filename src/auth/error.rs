use thiserror::Error;

pub type CryptResult<T> = std::result::Result<T, CryptError>;

/// Failures from password hashing or token signing/verification.
#[derive(Debug, Error)]
pub enum CryptError {
    #[error("password hashing failed: {0}")]
    Argon2Error(#[from] argon2::password_hash::Error),
    #[error("token processing failed: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}
