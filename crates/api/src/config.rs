use std::path::PathBuf;

use ttsq_core::synthesis::{SynthesisSettings, DEFAULT_NFE_STEP};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for the worker to finish its current job on shutdown
    /// (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Directory synthesized audio is written to and served from
    /// (default: `output`).
    pub audio_dir: PathBuf,
    /// External synthesis program settings.
    pub synthesis: SynthesisConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    /// | `AUDIO_DIR`            | `output`                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let audio_dir = PathBuf::from(std::env::var("AUDIO_DIR").unwrap_or_else(|_| "output".into()));

        let synthesis = SynthesisConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            audio_dir,
            synthesis,
        }
    }
}

/// Settings for the external TTS program.
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    /// Inference executable (default: `f5-tts_infer-cli`).
    pub program: String,
    /// Arguments placed before the per-job flags, e.g. a model selector.
    pub extra_args: Vec<String>,
    /// Reference recording the voice is cloned from.
    pub reference_audio: PathBuf,
    /// Transcript of the reference recording.
    pub reference_text: String,
    /// Inference step count (default: `6`).
    pub nfe_step: u32,
    /// Fixed seed; unset means a random seed per job.
    pub seed: Option<u32>,
}

impl SynthesisConfig {
    /// Load synthesis settings from environment variables.
    ///
    /// | Env Var          | Default              |
    /// |------------------|----------------------|
    /// | `TTS_PROGRAM`    | `f5-tts_infer-cli`   |
    /// | `TTS_EXTRA_ARGS` | (empty)              |
    /// | `TTS_REF_AUDIO`  | `reference/demo.wav` |
    /// | `TTS_REF_TEXT`   | (empty)              |
    /// | `TTS_NFE_STEP`   | `6`                  |
    /// | `TTS_SEED`       | (random per job)     |
    pub fn from_env() -> Self {
        let program = std::env::var("TTS_PROGRAM").unwrap_or_else(|_| "f5-tts_infer-cli".into());

        let extra_args: Vec<String> = std::env::var("TTS_EXTRA_ARGS")
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let reference_audio = PathBuf::from(
            std::env::var("TTS_REF_AUDIO").unwrap_or_else(|_| "reference/demo.wav".into()),
        );

        let reference_text = std::env::var("TTS_REF_TEXT").unwrap_or_default();

        let nfe_step: u32 = std::env::var("TTS_NFE_STEP")
            .map(|v| v.parse().expect("TTS_NFE_STEP must be a valid u32"))
            .unwrap_or(DEFAULT_NFE_STEP);

        let seed: Option<u32> = std::env::var("TTS_SEED")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.trim().parse().expect("TTS_SEED must be a valid u32"));

        Self {
            program,
            extra_args,
            reference_audio,
            reference_text,
            nfe_step,
            seed,
        }
    }

    /// Per-job inference settings derived from this configuration.
    pub fn settings(&self) -> SynthesisSettings {
        SynthesisSettings {
            reference_audio: self.reference_audio.clone(),
            reference_text: self.reference_text.clone(),
            nfe_step: self.nfe_step,
            seed: self.seed,
        }
    }
}
