use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Apod,
    Epic,
}

impl ImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Apod => "apod",
            ImageKind::Epic => "epic",
        }
    }
}

/// One postable item, normalized from either upstream.
///
/// `id` is the dedup key: the APOD date verbatim, or the derived EPIC archive URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: String,
    pub kind: ImageKind,
    pub title: String,
    pub description: String,
    pub media_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    NothingFetched,
    Duplicate { id: String },
    DryRun { id: String },
    Posted { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateBackend {
    File,
    Sqlite,
}

#[derive(Debug, Clone)]
pub struct StateConfig {
    pub backend: StateBackend,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct NasaConfig {
    pub api_key: String,
    pub apod_url: String,
    pub epic_url: String,
    pub epic_archive_base: String,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub channel_id: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub nasa: NasaConfig,
    pub telegram: TelegramConfig,
    pub state: StateConfig,
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub log_level: String,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Timeout,
    ConnectionFailure,
    Http4xx(u16),
    Http5xx(u16),
    Unexpected,
}

#[derive(Debug, Clone)]
pub struct GetResult {
    pub status: Option<u16>,
    pub body: Option<Vec<u8>>,
    pub error: Option<ErrorKind>,
    pub latency_ms: u64,
}

impl GetResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none() && matches!(self.status, Some(s) if (200..300).contains(&s))
    }
}
