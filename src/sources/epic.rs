//! EPIC natural-color imagery: a collection per call, one item picked at random.
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::domain::model::{ImageKind, ImageRecord, NasaConfig};
use crate::ports::{
    http::Http,
    random::{index_for, RandomSource},
    source::ImageSource,
};

use super::{redact_query, success_body, with_api_key};

pub const EPIC_DESCRIPTION: &str = "A photo taken by NASA's EPIC camera on the DSCOVR satellite.";

#[derive(Debug, Clone, Deserialize)]
pub struct EpicItem {
    pub image: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub date: String,
}

pub struct EpicSource<H: Http, G: RandomSource> {
    http: Arc<H>,
    rng: Arc<G>,
    url: String,
    archive_base: String,
}

impl<H: Http, G: RandomSource> EpicSource<H, G> {
    pub fn new(http: Arc<H>, rng: Arc<G>, cfg: &NasaConfig) -> Self {
        Self {
            http,
            rng,
            url: with_api_key(&cfg.epic_url, &cfg.api_key),
            archive_base: cfg.epic_archive_base.trim_end_matches('/').to_string(),
        }
    }
}

pub fn parse_epic_items(body: &[u8]) -> Result<Vec<EpicItem>, String> {
    serde_json::from_slice(body).map_err(|e| format!("epic json: {e}"))
}

/// Derives `{base}/{year}/{month}/{day}/jpg/{image}.jpg` from an item's capture date.
pub fn archive_url(archive_base: &str, item: &EpicItem) -> Result<(NaiveDate, String), String> {
    let day_part = item.date.split_whitespace().next().unwrap_or_default();
    let date = NaiveDate::parse_from_str(day_part, "%Y-%m-%d")
        .map_err(|e| format!("epic date '{}': {e}", item.date))?;
    let url = format!(
        "{}/{:04}/{:02}/{:02}/jpg/{}.jpg",
        archive_base.trim_end_matches('/'),
        date.year(),
        date.month(),
        date.day(),
        item.image
    );
    Ok((date, url))
}

pub fn to_record(archive_base: &str, item: &EpicItem) -> Result<ImageRecord, String> {
    let (date, url) = archive_url(archive_base, item)?;
    Ok(ImageRecord {
        id: url.clone(),
        kind: ImageKind::Epic,
        title: format!("EPIC Earth Image from {}", date.format("%Y-%m-%d")),
        description: EPIC_DESCRIPTION.to_string(),
        media_url: url,
    })
}

#[async_trait::async_trait]
impl<H: Http, G: RandomSource> ImageSource for EpicSource<H, G> {
    fn name(&self) -> &'static str {
        ImageKind::Epic.as_str()
    }

    async fn fetch(&self) -> Option<ImageRecord> {
        debug!(url = redact_query(&self.url), "Fetching EPIC");
        let res = self.http.get(&self.url).await;
        let body = success_body(self.name(), &self.url, &res)?;

        let items = match parse_epic_items(body) {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "Failed to decode EPIC response");
                return None;
            }
        };
        if items.is_empty() {
            info!("No EPIC images found");
            return None;
        }
        let idx = index_for(self.rng.next_f64().await, items.len())?;

        debug!(candidates = items.len(), picked = idx, image = %items[idx].image, "Picked EPIC image");
        match to_record(&self.archive_base, &items[idx]) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "Failed to derive EPIC archive url");
                None
            }
        }
    }
}
