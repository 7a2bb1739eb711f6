//! The synthesis collaborator seam.
//!
//! The TTS model is an external program. The worker only sees the
//! [`Synthesizer`] trait: hand it a [`SynthesisRequest`], get back either a
//! written audio file or a typed [`SynthesisError`].

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Default number of flow-matching inference steps.
pub const DEFAULT_NFE_STEP: u32 = 6;

/// Error type for synthesis runs.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("synthesis program could not be started: {0}")]
    Launch(std::io::Error),

    #[error("synthesis failed (exit code {exit_code:?}): {stderr}")]
    Failed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("synthesis reported success but wrote no file at {0}")]
    MissingOutput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything the model needs for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    /// Reference recording whose voice is cloned.
    pub reference_audio: PathBuf,
    /// Transcript of the reference recording.
    pub reference_text: String,
    /// Text to speak.
    pub text: String,
    /// Where the audio file must be written.
    pub output_path: PathBuf,
    pub nfe_step: u32,
    pub seed: u32,
}

/// Fixed per-process inference settings.
#[derive(Debug, Clone)]
pub struct SynthesisSettings {
    pub reference_audio: PathBuf,
    pub reference_text: String,
    pub nfe_step: u32,
    /// `None` draws a fresh random seed for every job.
    pub seed: Option<u32>,
}

impl SynthesisSettings {
    /// Build the request for one job.
    pub fn request(&self, text: &str, output_path: &Path) -> SynthesisRequest {
        SynthesisRequest {
            reference_audio: self.reference_audio.clone(),
            reference_text: self.reference_text.clone(),
            text: text.to_string(),
            output_path: output_path.to_path_buf(),
            nfe_step: self.nfe_step,
            seed: self.seed.unwrap_or_else(rand::random),
        }
    }
}

/// Turns text into an audio file.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<(), SynthesisError>;
}

/// Check that a run which reported success actually left a file behind.
pub async fn ensure_output_written(path: &Path) -> Result<(), SynthesisError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(SynthesisError::MissingOutput(path.display().to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SynthesisError::MissingOutput(path.display().to_string()))
        }
        Err(e) => Err(SynthesisError::Io(e)),
    }
}

// ---------------------------------------------------------------------------
// CommandSynthesizer
// ---------------------------------------------------------------------------

/// Runs an external inference CLI once per job.
///
/// Invocation: `<program> <extra_args...> --ref_audio <path> --ref_text <text>
/// --gen_text <text> --output_file <path> --nfe_step <n> --seed <n>`.
#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    program: String,
    extra_args: Vec<String>,
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<String>, extra_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            extra_args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument list for a request.
    pub fn args(&self, request: &SynthesisRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.extra_args.iter().map(OsString::from).collect();
        args.push("--ref_audio".into());
        args.push(request.reference_audio.clone().into_os_string());
        args.push("--ref_text".into());
        args.push(request.reference_text.clone().into());
        args.push("--gen_text".into());
        args.push(request.text.clone().into());
        args.push("--output_file".into());
        args.push(request.output_path.clone().into_os_string());
        args.push("--nfe_step".into());
        args.push(request.nfe_step.to_string().into());
        args.push("--seed".into());
        args.push(request.seed.to_string().into());
        args
    }
}

#[async_trait]
impl Synthesizer for CommandSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<(), SynthesisError> {
        let output = tokio::process::Command::new(&self.program)
            .args(self.args(request))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(SynthesisError::Launch)?;

        if !output.status.success() {
            return Err(SynthesisError::Failed {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
