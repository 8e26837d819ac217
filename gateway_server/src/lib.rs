//! # Scoped Data Gateway server
//! This crate hosts the HTTP server for the scoped data gateway. It is responsible for:
//! * Enforcing the origin allow-list on every inbound request.
//! * Verifying bearer credentials against the identity authority and attaching the resulting principal.
//! * Serving the principal-scoped resource endpoints backed by the gateway engine.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/`: An API info banner.
//! * `/api/health`: A health check route, no authentication required.
//! * `/api/protected`: Fetch-or-create the caller's profile. Requires a bearer credential.
//! * `/api/data`: Create (POST) and list (GET) the caller's data records. Requires a bearer credential.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod server;
