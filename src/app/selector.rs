//! Uniform random pick among the configured sources, one draw per run.
use tracing::debug;

use crate::ports::{
    random::{index_for, RandomSource},
    source::ImageSource,
};

pub async fn select_source<'a, G>(
    sources: &'a [Box<dyn ImageSource>],
    rng: &G,
) -> Option<&'a dyn ImageSource>
where
    G: RandomSource + ?Sized,
{
    if sources.is_empty() {
        return None;
    }
    let draw = rng.next_f64().await;
    let idx = index_for(draw, sources.len())?;
    let source = sources[idx].as_ref();
    debug!(source = source.name(), draw, "Selected image source");
    Some(source)
}
