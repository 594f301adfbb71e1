//! Upstream image source: produces a normalized record or nothing.
use crate::domain::model::ImageRecord;

#[async_trait::async_trait]
pub trait ImageSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fails soft: any upstream problem is logged and reported as `None`.
    async fn fetch(&self) -> Option<ImageRecord>;
}
