//! # inkquote-api: HTTP Estimate Service
//!
//! Serves the pricing engine over JSON.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Estimate Service                                 │
//! │                                                                         │
//! │  web estimator ─┐                                                       │
//! │  cart/checkout ─┼──► axum (8080) ──► routes ──► inkquote-core engine    │
//! │  staff tool ────┤                      │                                │
//! │  quote emails ──┘                      ▼                                │
//! │                               CatalogStore (Arc snapshot)               │
//! │                                        ▲                                │
//! │                  SIGHUP / POST /rules/reload ──► rules/*.csv            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - TOML + environment configuration
//! - [`state`] - Catalog snapshot store and shared state
//! - [`routes`] - Request handlers
//! - [`router`] - Middleware stack
//! - [`error`] - BLOCKED-envelope error responses

pub mod config;
pub mod error;
pub mod router;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use router::build_app_router;
pub use state::{AppState, CatalogStore};
