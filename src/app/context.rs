use std::sync::Arc;

use crate::domain::model::AppConfig;
use crate::ports::{publisher::Publisher, random::RandomSource, source::ImageSource, state::StateStore};

pub struct AppContext<S, P, G>
where
    S: StateStore,
    P: Publisher,
    G: RandomSource,
{
    pub cfg: Arc<AppConfig>,
    pub state: S,
    pub publisher: P,
    pub sources: Vec<Box<dyn ImageSource>>,
    pub rng: Arc<G>,
}
