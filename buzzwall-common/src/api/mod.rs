//! Shared API types for the Buzzwall HTTP boundary

pub mod types;
