use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Other(String),
}

impl DatabaseError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound(format!("{} with id {} not found", entity, id))
    }

    pub fn duplicate(entity: &str, field: &str) -> Self {
        Self::DuplicateEntry(format!("{} with {} already exists", entity, field))
    }

    /// Whether the underlying driver reported a timeout or a closed pool,
    /// as opposed to a query-level failure.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionError(
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            )
        )
    }
}
