//! HTTP server.
//!
//! This module provides:
//! - JSON request/response bodies (`convert`)
//! - The axum router and handlers (`service`)
//! - Configuration types (`config`)
//!
//! Routes:
//! - `POST /api/tokenize` — encode text, report tokens with offsets
//! - `POST /api/decode` — reconstruct text and spans from raw ids
//! - `GET /health`, `GET /version`

pub mod config;
pub mod convert;
pub mod service;

pub use config::Config;
pub use service::{ApiError, AppState, router, serve};
