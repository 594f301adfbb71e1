//! Reqwest-backed HTTP client implementing the `Http` port; maps reqwest errors/statuses
//! into `GetResult` with coarse error kinds.
use std::time::Duration;

use crate::domain::model::{ErrorKind, GetResult};
use crate::ports::http::Http;
use reqwest::StatusCode;
use tracing::{debug, warn};

pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn classify_error(e: &reqwest::Error) -> ErrorKind {
        if e.is_timeout() {
            ErrorKind::Timeout
        } else if e.is_connect() {
            ErrorKind::ConnectionFailure
        } else {
            ErrorKind::Unexpected
        }
    }

    fn status_error_kind(code: StatusCode) -> Option<ErrorKind> {
        let n = code.as_u16();
        if (400..500).contains(&n) {
            Some(ErrorKind::Http4xx(n))
        } else if (500..600).contains(&n) {
            Some(ErrorKind::Http5xx(n))
        } else {
            None
        }
    }
}

/// Shared client settings for the NASA and Telegram adapters.
pub fn build_client(user_agent: &str, timeout_seconds: u64) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
}

#[async_trait::async_trait]
impl Http for ReqwestHttp {
    async fn get(&self, url: &str) -> GetResult {
        let start = tokio::time::Instant::now();
        let log_url = url.split('?').next().unwrap_or(url);
        debug!(url = log_url, "HTTP GET start");
        match self.client.get(url).send().await {
            Ok(resp) => {
                let status = resp.status();
                let body = match resp.bytes().await {
                    Ok(b) => Some(b.to_vec()),
                    Err(e) => {
                        warn!(url = log_url, error = %e, "Failed reading body");
                        None
                    }
                };
                let latency_ms = start.elapsed().as_millis() as u64;
                debug!(url = log_url, status = status.as_u16(), latency_ms, "HTTP GET done");
                GetResult {
                    status: Some(status.as_u16()),
                    body,
                    error: Self::status_error_kind(status),
                    latency_ms,
                }
            }
            Err(e) => {
                // reqwest embeds the full url in its Display impl; drop it to keep the key out.
                let e = e.without_url();
                warn!(url = log_url, error = %e, "HTTP GET failed");
                GetResult {
                    status: None,
                    body: None,
                    error: Some(Self::classify_error(&e)),
                    latency_ms: start.elapsed().as_millis() as u64,
                }
            }
        }
    }
}
