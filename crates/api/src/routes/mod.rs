pub mod health;
pub mod tts;

use axum::Router;

use crate::state::AppState;

/// Build the service route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                   service + queue health
/// /submit_tts_job           submit text (POST)
/// /query_tts_status         poll a job (GET, ?task_id=)
/// /audio/{filename}         download finished audio
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(health::router()).merge(tts::router())
}
