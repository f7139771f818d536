//! HTTP API layer for lisan-rs.
//!
//! This crate provides the admin REST API and real-time updates:
//!
//! - **Endpoints**: user, content and support management
//! - **Extractors**: authentication
//! - **Middleware**: bearer-token auth
//! - **SSE**: change notifications for open dashboard views
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod sse;

pub use endpoints::router;
pub use middleware::AppState;
