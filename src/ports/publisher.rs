//! Outbound channel for a fetched record.
use thiserror::Error;

use crate::domain::model::ImageRecord;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("transport error during {method}: {message}")]
    Transport { method: &'static str, message: String },
    #[error("{method} rejected ({code}): {description}")]
    Api {
        method: &'static str,
        code: i64,
        description: String,
    },
}

#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    /// Sends the photo and then the formatted text. Either send failing fails the whole publish.
    async fn publish(&self, record: &ImageRecord) -> Result<(), PublishError>;
}
