//! # Buzzwall Common Library
//!
//! Shared code for the Buzzwall services including:
//! - API request/response types and the Word model
//! - Configuration loading
//! - Common error types

pub mod api;
pub mod config;
pub mod error;

pub use error::{Error, Result};
