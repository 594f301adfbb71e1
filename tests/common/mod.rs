#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use stellarpost::domain::model::{AppConfig, ErrorKind, GetResult, ImageRecord};
use stellarpost::infra::config::ConfigLoader;
use stellarpost::ports::{
    http::Http,
    publisher::{PublishError, Publisher},
    random::RandomSource,
    state::{StateError, StateStore},
};

pub const APOD_URL: &str = "https://nasa.test/planetary/apod";
pub const EPIC_URL: &str = "https://nasa.test/EPIC/api/natural/images";

pub fn test_config() -> AppConfig {
    let toml = format!(
        r#"
[nasa]
apod_url = "{APOD_URL}"
epic_url = "{EPIC_URL}"
"#
    );
    let env = HashMap::from([
        ("NASA_API".to_string(), "test-key".to_string()),
        ("BOT_TOKEN".to_string(), "123:abc".to_string()),
        ("CHANNEL_ID".to_string(), "@space".to_string()),
    ]);
    ConfigLoader::from_sources(Some(toml.as_str()), &env).expect("test config")
}

pub fn ok_json(body: &str) -> GetResult {
    GetResult {
        status: Some(200),
        body: Some(body.as_bytes().to_vec()),
        error: None,
        latency_ms: 1,
    }
}

pub fn status(code: u16) -> GetResult {
    let error = if code >= 500 {
        ErrorKind::Http5xx(code)
    } else {
        ErrorKind::Http4xx(code)
    };
    GetResult {
        status: Some(code),
        body: Some(b"{\"error\":\"nope\"}".to_vec()),
        error: Some(error),
        latency_ms: 1,
    }
}

/// Serves canned responses keyed by url prefix and records requested urls.
#[derive(Default)]
pub struct FakeHttp {
    routes: Vec<(String, GetResult)>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeHttp {
    pub fn with(mut self, prefix: &str, res: GetResult) -> Self {
        self.routes.push((prefix.to_string(), res));
        self
    }
}

#[async_trait::async_trait]
impl Http for FakeHttp {
    async fn get(&self, url: &str) -> GetResult {
        self.calls.lock().unwrap().push(url.to_string());
        self.routes
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            .map(|(_, res)| res.clone())
            .unwrap_or(GetResult {
                status: None,
                body: None,
                error: Some(ErrorKind::ConnectionFailure),
                latency_ms: 0,
            })
    }
}

/// Replays draws in order, repeating the last one.
pub struct ScriptedRng {
    draws: Mutex<Vec<f64>>,
}

impl ScriptedRng {
    pub fn new(draws: &[f64]) -> Self {
        let mut v = draws.to_vec();
        v.reverse();
        Self { draws: Mutex::new(v) }
    }
}

#[async_trait::async_trait]
impl RandomSource for ScriptedRng {
    async fn next_f64(&self) -> f64 {
        let mut d = self.draws.lock().unwrap();
        if d.len() > 1 {
            d.pop().unwrap()
        } else {
            d.last().copied().unwrap_or(0.0)
        }
    }
}

#[derive(Default)]
pub struct MemoryState {
    pub value: Mutex<Option<String>>,
    pub writes: Mutex<u32>,
}

impl MemoryState {
    pub fn holding(id: &str) -> Self {
        Self {
            value: Mutex::new(Some(id.to_string())),
            writes: Mutex::new(0),
        }
    }

    pub fn current(&self) -> Option<String> {
        self.value.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> u32 {
        *self.writes.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl StateStore for MemoryState {
    async fn get_last_id(&self) -> Result<Option<String>, StateError> {
        Ok(self.current())
    }

    async fn set_last_id(&self, id: &str) -> Result<(), StateError> {
        *self.value.lock().unwrap() = Some(id.to_string());
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    pub published: Mutex<Vec<ImageRecord>>,
    pub fail: bool,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn count(&self) -> usize {
        self.published.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, record: &ImageRecord) -> Result<(), PublishError> {
        if self.fail {
            return Err(PublishError::Api {
                method: "sendMessage",
                code: 403,
                description: "Forbidden: bot is not a member of the channel chat".into(),
            });
        }
        self.published.lock().unwrap().push(record.clone());
        Ok(())
    }
}

pub fn shared<T>(v: T) -> Arc<T> {
    Arc::new(v)
}
