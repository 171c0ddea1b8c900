//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Authenticate each request as an admin session (no global login state).
//! - Inject shared application state (`AppState`) into handlers.
//!
//! TLS is terminated in front of this service, not here.

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
