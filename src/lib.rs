//! Posts one NASA image (APOD or EPIC) per run to a Telegram channel, skipping repeats.
pub mod app;
pub mod domain;
pub mod infra;
pub mod ports;
pub mod sources;
