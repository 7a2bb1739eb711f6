//! Handlers for TTS job submission and status polling.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use ttsq_core::audio;
use ttsq_core::job::JobStatus;

use crate::error::{AppError, AppResult};
use crate::jobs;
use crate::state::AppState;

/// Status reported for ids the table has never seen.
pub const STATUS_NOT_FOUND: &str = "not_found";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /submit_tts_job`. A missing `text` field counts as empty.
#[derive(Debug, Deserialize)]
pub struct SubmitTtsJob {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitTtsJobResponse {
    pub task_id: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub task_id: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /submit_tts_job
///
/// Record a `pending` job, enqueue it for the worker and return its id.
/// Returns 400 if `text` is empty.
pub async fn submit_tts_job(
    State(state): State<AppState>,
    payload: Result<Json<SubmitTtsJob>, JsonRejection>,
) -> AppResult<Json<SubmitTtsJobResponse>> {
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let job = jobs::submit(&state.jobs, &state.queue, &state.config.audio_dir, input.text).await?;

    tracing::info!(
        job_id = %job.id,
        queue_depth = state.queue.depth(),
        "TTS job submitted",
    );

    Ok(Json(SubmitTtsJobResponse {
        task_id: job.id.to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// GET /query_tts_status?task_id=...
///
/// Report the job's status; unknown ids yield `not_found`. Finished jobs
/// also carry the `audio_url` to download from. A missing `task_id` is a
/// 400.
pub async fn query_tts_status(
    State(state): State<AppState>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> AppResult<Json<StatusResponse>> {
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let Some(job) = state.jobs.get(&params.task_id).await else {
        return Ok(Json(StatusResponse {
            status: STATUS_NOT_FOUND,
            audio_url: None,
        }));
    };

    let audio_url = match job.status {
        JobStatus::Done => job.output_filename().map(audio::audio_url),
        _ => None,
    };

    Ok(Json(StatusResponse {
        status: job.status.as_str(),
        audio_url,
    }))
}
