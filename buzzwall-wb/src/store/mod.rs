//! Process-wide in-memory stores
//!
//! Both stores are single shared instances constructed once at startup and
//! carried in [`crate::AppState`]; running multiple service processes yields
//! independent stores (accepted limitation, single-instance deployment).

pub mod rate_limit;
pub mod words;

pub use rate_limit::{RateLimitDecision, RateLimiter};
pub use words::WordStore;
