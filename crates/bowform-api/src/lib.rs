//! Axum HTTP API for archery shot analysis.
//!
//! This crate provides:
//! - Video upload and sample analysis endpoints
//! - Stored result lookup
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::{AppState, VideoAnalyzer};
