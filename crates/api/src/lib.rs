//! LP Builder API server library.
//!
//! Exposes config, state, error handling, auth extractors, and routes so
//! integration tests and the binaries share one construction path.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
