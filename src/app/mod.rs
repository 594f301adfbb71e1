pub mod context;
pub mod runner;
pub mod selector;
