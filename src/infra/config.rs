//! Loads the optional TOML file, overlays environment variables, and validates the
//! result into `AppConfig`.
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tokio::fs;

use crate::domain::model::{
    AppConfig, NasaConfig, StateBackend, StateConfig, TelegramConfig,
};

pub const ENV_API_KEY: &str = "NASA_API";
pub const ENV_BOT_TOKEN: &str = "BOT_TOKEN";
pub const ENV_CHANNEL_ID: &str = "CHANNEL_ID";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_STATE_PATH: &str = "STATE_PATH";
pub const ENV_DRY_RUN: &str = "DRY_RUN";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawFile {
    #[serde(default)]
    app: RawApp,
    #[serde(default)]
    nasa: RawNasa,
    #[serde(default)]
    telegram: RawTelegram,
    #[serde(default)]
    state: RawState,
    #[serde(default)]
    http: RawHttp,
    #[serde(default)]
    logging: RawLogging,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawApp {
    dry_run: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawNasa {
    api_key: Option<String>,
    apod_url: Option<String>,
    epic_url: Option<String>,
    epic_archive_base: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawTelegram {
    bot_token: Option<String>,
    channel_id: Option<String>,
    api_base: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawState {
    backend: Option<String>,
    path: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawHttp {
    user_agent: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawLogging {
    level: Option<String>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Reads `config_path` when given and overlays the process environment.
    pub async fn load(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_with_env(config_path, &env).await
    }

    pub async fn load_with_env(
        config_path: Option<&Path>,
        env: &HashMap<String, String>,
    ) -> Result<AppConfig, ConfigError> {
        let content = match config_path {
            Some(p) => Some(fs::read_to_string(p).await?),
            None => None,
        };
        Self::from_sources(content.as_deref(), env)
    }

    /// Environment values win over file values. Blank values count as unset.
    pub fn from_sources(
        toml_text: Option<&str>,
        env: &HashMap<String, String>,
    ) -> Result<AppConfig, ConfigError> {
        let raw: RawFile = match toml_text {
            Some(t) => toml::from_str(t)?,
            None => RawFile::default(),
        };
        let env_get = |key: &str| {
            env.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = required(env_get(ENV_API_KEY).or(raw.nasa.api_key), ENV_API_KEY)?;
        let bot_token = required(env_get(ENV_BOT_TOKEN).or(raw.telegram.bot_token), ENV_BOT_TOKEN)?;
        let channel_id =
            required(env_get(ENV_CHANNEL_ID).or(raw.telegram.channel_id), ENV_CHANNEL_ID)?;

        let nasa = NasaConfig {
            api_key,
            apod_url: url_or(raw.nasa.apod_url, default_apod_url(), "nasa.apod_url")?,
            epic_url: url_or(raw.nasa.epic_url, default_epic_url(), "nasa.epic_url")?,
            epic_archive_base: url_or(
                raw.nasa.epic_archive_base,
                default_epic_archive_base(),
                "nasa.epic_archive_base",
            )?,
        };
        let telegram = TelegramConfig {
            bot_token,
            channel_id,
            api_base: url_or(raw.telegram.api_base, default_telegram_api_base(), "telegram.api_base")?,
        };

        let backend = parse_backend(raw.state.backend.as_deref())?;
        let state_path = env_get(ENV_STATE_PATH)
            .or(raw.state.path.filter(|p| !p.trim().is_empty()))
            .map(PathBuf::from)
            .unwrap_or_else(|| default_state_path(backend));

        let timeout_seconds = raw.http.timeout_seconds.unwrap_or(30);
        if timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "http.timeout_seconds must be greater than 0".into(),
            ));
        }
        let user_agent = raw
            .http
            .user_agent
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(default_user_agent);

        let log_level = normalize_log_level(
            &env_get(ENV_LOG_LEVEL)
                .or(raw.logging.level)
                .unwrap_or_else(|| "info".to_string()),
        )?;

        let dry_run = match env_get(ENV_DRY_RUN) {
            Some(v) => parse_bool(&v, ENV_DRY_RUN)?,
            None => raw.app.dry_run.unwrap_or(false),
        };

        Ok(AppConfig {
            nasa,
            telegram,
            state: StateConfig {
                backend,
                path: state_path,
            },
            user_agent,
            timeout_seconds,
            log_level,
            dry_run,
        })
    }
}

fn required(value: Option<String>, name: &str) -> Result<String, ConfigError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::Invalid(format!("{name} is required")))
}

fn url_or(value: Option<String>, default: String, field: &str) -> Result<String, ConfigError> {
    let v = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or(default);
    if v.starts_with("http://") || v.starts_with("https://") {
        Ok(v)
    } else {
        Err(ConfigError::Invalid(format!(
            "{field} must be an http(s) url, got '{v}'"
        )))
    }
}

fn parse_backend(s: Option<&str>) -> Result<StateBackend, ConfigError> {
    match s.map(|x| x.trim().to_ascii_lowercase()) {
        None => Ok(StateBackend::File),
        Some(b) if b == "file" => Ok(StateBackend::File),
        Some(b) if b == "sqlite" => Ok(StateBackend::Sqlite),
        Some(other) => Err(ConfigError::Invalid(format!(
            "invalid state.backend '{other}', expected 'file' or 'sqlite'"
        ))),
    }
}

fn parse_bool(s: &str, name: &str) -> Result<bool, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid(format!(
            "invalid {name} '{other}', expected true or false"
        ))),
    }
}

fn normalize_log_level(level: &str) -> Result<String, ConfigError> {
    let l = level.trim().to_ascii_lowercase();
    match l.as_str() {
        "error" | "warn" | "info" | "debug" | "trace" | "off" => Ok(l),
        _ => Err(ConfigError::Invalid(format!(
            "invalid logging.level '{level}', expected error|warn|info|debug|trace|off"
        ))),
    }
}

fn default_state_path(backend: StateBackend) -> PathBuf {
    match backend {
        StateBackend::File => PathBuf::from("last.txt"),
        StateBackend::Sqlite => PathBuf::from("stellarpost.db"),
    }
}

fn default_apod_url() -> String {
    "https://api.nasa.gov/planetary/apod".to_string()
}

fn default_epic_url() -> String {
    "https://api.nasa.gov/EPIC/api/natural/images".to_string()
}

fn default_epic_archive_base() -> String {
    "https://epic.gsfc.nasa.gov/archive/natural".to_string()
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_user_agent() -> String {
    format!("stellarpost/{}", env!("CARGO_PKG_VERSION"))
}
