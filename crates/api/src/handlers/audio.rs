//! Download endpoint for synthesized audio.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::Response;
use ttsq_core::audio;
use ttsq_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

fn file_not_found(filename: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "File",
        id: filename.to_string(),
    })
}

/// GET /audio/{filename}
///
/// Serve a file from the audio directory. Names that are absent, or that
/// would resolve outside the directory, return 404.
pub async fn get_audio(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let path = audio::resolve_audio_path(&state.config.audio_dir, &filename)
        .ok_or_else(|| file_not_found(&filename))?;

    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(file_not_found(&filename));
        }
        // A directory of that name is not a downloadable file either.
        Err(_) if path.is_dir() => return Err(file_not_found(&filename)),
        Err(e) => return Err(AppError::InternalError(e.to_string())),
    };

    Response::builder()
        .header(header::CONTENT_TYPE, audio::content_type_for_extension(&filename))
        .header(header::CONTENT_LENGTH, data.len().to_string())
        .body(Body::from(data))
        .map_err(|e| AppError::InternalError(e.to_string()))
}
