//! Audio file naming and lookup helpers.
//!
//! Every job writes `<audio_dir>/<job_id>.wav`; clients download it from
//! `/audio/<job_id>.wav`.

use std::path::{Path, PathBuf};

use crate::job::JobId;

/// Extension of every synthesized file.
pub const OUTPUT_EXTENSION: &str = "wav";

/// Route prefix under which audio files are served.
pub const AUDIO_ROUTE_PREFIX: &str = "/audio";

/// Filename the worker writes for a job.
pub fn output_filename(job_id: &JobId) -> String {
    format!("{job_id}.{OUTPUT_EXTENSION}")
}

/// Full output path for a job under `audio_dir`.
pub fn output_path(audio_dir: &Path, job_id: &JobId) -> PathBuf {
    audio_dir.join(output_filename(job_id))
}

/// Download URL for a finished file.
pub fn audio_url(filename: &str) -> String {
    format!("{AUDIO_ROUTE_PREFIX}/{filename}")
}

/// A filename is only looked up if it names a plain entry of the audio
/// directory: non-empty, no separators, not `.` or `..`.
pub fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains('/')
        && !filename.contains('\\')
        && !filename.contains('\0')
}

/// Resolve a requested filename to a path under `audio_dir`.
///
/// Returns `None` for names that could escape the directory.
pub fn resolve_audio_path(audio_dir: &Path, filename: &str) -> Option<PathBuf> {
    is_safe_filename(filename).then(|| audio_dir.join(filename))
}

/// Map a filename's extension to an audio MIME type.
///
/// Unknown extensions fall back to `audio/wav`, the only format the worker
/// produces.
pub fn content_type_for_extension(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("ogg") => "audio/ogg",
        _ => "audio/wav",
    }
}
