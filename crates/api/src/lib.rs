//! Campus scheduling API server library.
//!
//! Exposes config, state, error handling, authentication, and routes so
//! integration tests and the binary entrypoint share them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod server;
pub mod state;
