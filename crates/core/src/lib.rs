//! Domain types and pure logic for the ttsq text-to-speech job service.
//!
//! Nothing in this crate knows about HTTP. The API crate builds the job
//! table, work queue and worker loop on top of these types.

pub mod audio;
pub mod error;
pub mod job;
pub mod synthesis;
pub mod types;
