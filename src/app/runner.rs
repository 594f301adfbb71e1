use thiserror::Error;
use tracing::info;

use crate::app::{context::AppContext, selector::select_source};
use crate::domain::model::RunOutcome;
use crate::ports::{
    publisher::{PublishError, Publisher},
    random::RandomSource,
    state::{StateError, StateStore},
};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),
    #[error("state store failed: {0}")]
    State(#[from] StateError),
}

pub struct Runner;

impl Runner {
    /// One pass: read the last-posted id, fetch from a random source, skip duplicates,
    /// publish, then record the new id. The id is written only after a successful publish.
    pub async fn run_once<S, P, G>(ctx: &AppContext<S, P, G>) -> Result<RunOutcome, RunError>
    where
        S: StateStore,
        P: Publisher,
        G: RandomSource,
    {
        let last = ctx.state.get_last_id().await?;
        info!(last_posted = last.as_deref().unwrap_or("<none>"), "Run start");

        let Some(source) = select_source(&ctx.sources, ctx.rng.as_ref()).await else {
            info!("No image sources configured");
            return Ok(RunOutcome::NothingFetched);
        };

        let Some(record) = source.fetch().await else {
            info!(source = source.name(), "No data received from upstream");
            return Ok(RunOutcome::NothingFetched);
        };

        if last.as_deref() == Some(record.id.as_str()) {
            info!(id = %record.id, source = source.name(), "Already posted this image");
            return Ok(RunOutcome::Duplicate { id: record.id });
        }

        if ctx.cfg.dry_run {
            info!(
                id = %record.id,
                title = %record.title,
                media_url = %record.media_url,
                "Dry run, skipping publish"
            );
            return Ok(RunOutcome::DryRun { id: record.id });
        }

        ctx.publisher.publish(&record).await?;
        ctx.state.set_last_id(&record.id).await?;
        info!(id = %record.id, title = %record.title, "Posted");

        Ok(RunOutcome::Posted { id: record.id })
    }
}
