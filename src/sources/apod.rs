//! Astronomy Picture of the Day: one item per day, keyed by its date.
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::model::{ImageKind, ImageRecord, NasaConfig};
use crate::ports::{http::Http, source::ImageSource};

use super::{redact_query, success_body, with_api_key};

#[derive(Debug, Deserialize)]
struct ApodResponse {
    date: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
    url: Option<String>,
}

pub struct ApodSource<H: Http> {
    http: Arc<H>,
    url: String,
}

impl<H: Http> ApodSource<H> {
    pub fn new(http: Arc<H>, cfg: &NasaConfig) -> Self {
        Self {
            http,
            url: with_api_key(&cfg.apod_url, &cfg.api_key),
        }
    }
}

/// Maps an APOD response body into a record. The date is used verbatim as the id.
pub fn parse_apod(body: &[u8]) -> Result<ImageRecord, String> {
    let raw: ApodResponse =
        serde_json::from_slice(body).map_err(|e| format!("apod json: {e}"))?;
    let date = raw
        .date
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| "apod response missing date".to_string())?;
    let media_url = raw
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| "apod response missing url".to_string())?;

    Ok(ImageRecord {
        id: date,
        kind: ImageKind::Apod,
        title: raw.title.unwrap_or_default(),
        description: raw.explanation.unwrap_or_default(),
        media_url,
    })
}

#[async_trait::async_trait]
impl<H: Http> ImageSource for ApodSource<H> {
    fn name(&self) -> &'static str {
        ImageKind::Apod.as_str()
    }

    async fn fetch(&self) -> Option<ImageRecord> {
        debug!(url = redact_query(&self.url), "Fetching APOD");
        let res = self.http.get(&self.url).await;
        let body = success_body(self.name(), &self.url, &res)?;
        match parse_apod(body) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "Failed to decode APOD response");
                None
            }
        }
    }
}
