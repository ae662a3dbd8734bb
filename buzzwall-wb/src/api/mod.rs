//! HTTP API handlers for buzzwall-wb

pub mod health;
pub mod words;

pub use health::health_routes;
pub use words::{clear_words, list_words, submit_words};
