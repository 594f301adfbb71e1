//! Telegram Bot API publisher: a photo with caption, then an HTML text message.
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::model::{ImageRecord, TelegramConfig};
use crate::ports::publisher::{PublishError, Publisher};

pub const CAPTION_LIMIT: usize = 1024;
pub const MESSAGE_LIMIT: usize = 4096;

#[derive(Debug, Serialize)]
struct SendPhoto<'a> {
    chat_id: &'a str,
    photo: &'a str,
    caption: &'a str,
    parse_mode: &'static str,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

#[derive(Debug, Deserialize)]
struct ApiReply {
    ok: bool,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramPublisher {
    client: reqwest::Client,
    base: String,
    chat_id: String,
}

impl TelegramPublisher {
    pub fn new(client: reqwest::Client, cfg: &TelegramConfig) -> Self {
        Self {
            client,
            base: format!("{}/bot{}", cfg.api_base.trim_end_matches('/'), cfg.bot_token),
            chat_id: cfg.channel_id.clone(),
        }
    }

    async fn call<T: Serialize + Sync>(&self, method: &'static str, body: &T) -> Result<(), PublishError> {
        let url = format!("{}/{method}", self.base);
        // The bot token is part of the path; `transport` strips it from errors.
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport(method, e))?;
        let status = resp.status();
        let reply: ApiReply = resp
            .json()
            .await
            .map_err(|e| transport(method, e))?;

        if !reply.ok {
            return Err(PublishError::Api {
                method,
                code: reply.error_code.unwrap_or(status.as_u16() as i64),
                description: reply.description.unwrap_or_default(),
            });
        }
        debug!(method, status = status.as_u16(), "Telegram call ok");
        Ok(())
    }
}

fn transport(method: &'static str, e: reqwest::Error) -> PublishError {
    PublishError::Transport {
        method,
        message: e.without_url().to_string(),
    }
}

#[async_trait::async_trait]
impl Publisher for TelegramPublisher {
    async fn publish(&self, record: &ImageRecord) -> Result<(), PublishError> {
        let caption = format_caption(record);
        self.call(
            "sendPhoto",
            &SendPhoto {
                chat_id: &self.chat_id,
                photo: &record.media_url,
                caption: &caption,
                parse_mode: "HTML",
            },
        )
        .await?;

        let text = format_message(record);
        self.call(
            "sendMessage",
            &SendMessage {
                chat_id: &self.chat_id,
                text: &text,
                parse_mode: "HTML",
            },
        )
        .await?;

        info!(id = %record.id, kind = record.kind.as_str(), "Published to channel");
        Ok(())
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Cuts to at most `max` chars without splitting a char or an HTML entity.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
    if let Some(amp) = cut.rfind('&') {
        if !cut[amp..].contains(';') {
            cut.truncate(amp);
        }
    }
    cut.push('…');
    cut
}

pub fn format_caption(record: &ImageRecord) -> String {
    truncate_chars(&escape_html(&record.title), CAPTION_LIMIT)
}

pub fn format_message(record: &ImageRecord) -> String {
    let title = format_caption(record);
    let head = format!("<b>{title}</b>\n\n");
    let room = MESSAGE_LIMIT.saturating_sub(head.chars().count());
    format!("{head}{}", truncate_chars(&escape_html(&record.description), room))
}
