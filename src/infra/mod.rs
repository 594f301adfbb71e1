pub mod config;
pub mod file_state;
pub mod logging;
pub mod random;
pub mod reqwest_http;
pub mod sqlite_state;
pub mod telegram;
