#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use ttsq_api::config::{ServerConfig, SynthesisConfig};
use ttsq_api::router::build_app_router;
use ttsq_api::state::AppState;
use ttsq_core::synthesis::{SynthesisError, SynthesisRequest, Synthesizer};

/// Bytes the fake synthesizer writes as "audio".
pub const FAKE_AUDIO: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt ";

/// Build a test `ServerConfig` writing audio into `audio_dir`.
pub fn test_config(audio_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        audio_dir: audio_dir.to_path_buf(),
        synthesis: SynthesisConfig {
            program: "unused".to_string(),
            extra_args: Vec::new(),
            reference_audio: PathBuf::from("reference/demo.wav"),
            reference_text: "reference transcript".to_string(),
            nfe_step: 6,
            seed: Some(1234),
        },
    }
}

// ---------------------------------------------------------------------------
// Fake synthesizer
// ---------------------------------------------------------------------------

/// In-process stand-in for the TTS model.
///
/// Records every request, writes [`FAKE_AUDIO`] to the output path, and can
/// be told to fail, to "succeed" without writing, or to wait for a permit
/// before each job.
#[derive(Default)]
pub struct FakeSynthesizer {
    requests: Mutex<Vec<SynthesisRequest>>,
    fail_marker: Option<String>,
    skip_write: bool,
    gate: Option<Arc<Semaphore>>,
}

impl FakeSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every job whose text contains `marker`.
    pub fn failing_on(mut self, marker: &str) -> Self {
        self.fail_marker = Some(marker.to_string());
        self
    }

    /// Report success without writing the output file.
    pub fn without_output(mut self) -> Self {
        self.skip_write = true;
        self
    }

    /// Block each job until a permit is added to `gate`.
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Texts synthesized so far, in the order the worker ran them.
    pub fn texts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.text.clone())
            .collect()
    }

    pub fn requests(&self) -> Vec<SynthesisRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Synthesizer for FakeSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<(), SynthesisError> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        self.requests.lock().unwrap().push(request.clone());

        if let Some(marker) = &self.fail_marker {
            if request.text.contains(marker.as_str()) {
                return Err(SynthesisError::Failed {
                    exit_code: Some(1),
                    stderr: "fake model failure".to_string(),
                });
            }
        }

        if !self.skip_write {
            tokio::fs::write(&request.output_path, FAKE_AUDIO).await?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Test application
// ---------------------------------------------------------------------------

/// A running app: router, shared state, worker and its temp audio dir.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub synthesizer: Arc<FakeSynthesizer>,
    pub cancel: CancellationToken,
    pub worker: JoinHandle<()>,
    pub audio_dir: TempDir,
}

impl TestApp {
    pub fn audio_path(&self) -> &Path {
        self.audio_dir.path()
    }
}

/// Build the full application router with all middleware layers, backed by
/// `synthesizer` and a fresh temporary audio directory.
///
/// Uses the same [`build_app_router`] as `main.rs` so integration tests
/// exercise the production middleware stack.
pub fn build_test_app(synthesizer: FakeSynthesizer) -> TestApp {
    let audio_dir = tempfile::tempdir().unwrap();
    let config = test_config(audio_dir.path());
    let synthesizer = Arc::new(synthesizer);
    let cancel = CancellationToken::new();

    let (state, worker) = AppState::start(
        config.clone(),
        Arc::clone(&synthesizer) as Arc<dyn Synthesizer>,
        cancel.clone(),
    );
    let router = build_app_router(state.clone(), &config);

    TestApp {
        router,
        state,
        synthesizer,
        cancel,
        worker,
        audio_dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Submit `text` and return the `task_id`.
pub async fn submit(app: &Router, text: &str) -> String {
    let response = post_json(
        app.clone(),
        "/submit_tts_job",
        serde_json::json!({ "text": text }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["task_id"].as_str().unwrap().to_string()
}

/// Fetch the status payload for `task_id`.
pub async fn query(app: &Router, task_id: &str) -> serde_json::Value {
    let response = get(
        app.clone(),
        &format!("/query_tts_status?task_id={task_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

/// Poll until the job reaches a terminal status (`done` or `error`).
pub async fn wait_for_terminal(app: &Router, task_id: &str) -> serde_json::Value {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let json = query(app, task_id).await;
        if json["status"] == "done" || json["status"] == "error" {
            return json;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "job {task_id} did not finish in time, last status: {json}"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
