//! ttsq API server library.
//!
//! Exposes the core building blocks (config, state, job table and queue,
//! worker, error handling, routes) so integration tests and the binary
//! entrypoint can both access them.

pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod router;
pub mod routes;
pub mod state;
