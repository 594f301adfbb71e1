//! Persisted last-posted id.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state io: {0}")]
    Io(#[from] std::io::Error),
    #[error("state db: {0}")]
    Db(String),
}

#[async_trait::async_trait]
pub trait StateStore: Send + Sync {
    async fn get_last_id(&self) -> Result<Option<String>, StateError>;
    async fn set_last_id(&self, id: &str) -> Result<(), StateError>;
}
