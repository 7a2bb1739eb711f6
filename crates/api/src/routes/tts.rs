//! Route definitions for the TTS job API.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{audio, tts};
use crate::state::AppState;

/// TTS routes, mounted at the root.
///
/// ```text
/// POST   /submit_tts_job        -> submit_tts_job
/// GET    /query_tts_status      -> query_tts_status
/// GET    /audio/{filename}      -> get_audio
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/submit_tts_job", post(tts::submit_tts_job))
        .route("/query_tts_status", get(tts::query_tts_status))
        .route("/audio/{filename}", get(audio::get_audio))
}
