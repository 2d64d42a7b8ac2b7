use thiserror::Error;

/// Request-scoped failure taxonomy. Every service and store operation
/// surfaces one of these; nothing is retried automatically.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),
    #[error("username or email already taken")]
    DuplicateIdentity,
    #[error("invalid username or password")]
    AuthFailure,
    #[error("not found")]
    NotFound,
    #[error("forbidden")]
    Forbidden,
    #[error("unsupported image format")]
    UnsupportedImageFormat,
    #[error("password hashing failed")]
    Credential,
    #[error("session failure: {0}")]
    Session(String),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("database failure: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
