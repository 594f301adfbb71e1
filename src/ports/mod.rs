pub mod http;
pub mod publisher;
pub mod random;
pub mod source;
pub mod state;
