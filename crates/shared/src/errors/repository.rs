use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Resource not found")]
    NotFound,

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("{0}")]
    Custom(String),
}
