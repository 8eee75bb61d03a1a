//! HTTP server for the metadata gateway.
//!
//! This module provides:
//! - The axum router exposing one GET route per operation (`router`)
//! - Handlers translating query strings into gateway calls (`handlers`)
//! - Error-to-response mapping (`error`)
//! - Query extraction with JSON rejections (`extract`)
//! - Configuration and secrets loading (`config`)

pub mod config;
pub mod error;
mod extract;
mod handlers;
mod router;

pub use config::{Config, Secrets};
pub use error::{ApiError, ErrorBody};
pub use router::create_router;
