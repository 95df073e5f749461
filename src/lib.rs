//! # jwt-gate
//!
//! Request-time bearer authentication for axum services.
//!
//! The [`security`] module holds the pipeline itself; the remaining modules
//! wire it into the demo server (`src/main.rs`).

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod security;
pub mod services;
pub mod state;
