//! Background processing.
//!
//! The worker is spawned once at startup and accepts a
//! [`CancellationToken`](tokio_util::sync::CancellationToken) for graceful
//! shutdown.

pub mod worker;
