//! API integration tests.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::watch;
use tower::ServiceExt;

use bowform_api::{create_router, ApiConfig, AppState, VideoAnalyzer};
use bowform_media::MediaError;
use bowform_models::{
    AnalysisId, AnalysisResult, FrameRecord, Landmark, MetricReport, PhaseRange, ShotAnalysis, ShotPhase,
};
use bowform_pipeline::{PipelineError, PipelineResult};

const BOUNDARY: &str = "bowform-test-boundary";

fn canned_result() -> AnalysisResult {
    AnalysisResult {
        total_frames: 30,
        fps: 30.0,
        duration: 1.0,
        pose_data: vec![FrameRecord::new(0, 0.0, vec![Landmark::at(0.5, 0.5)])],
        analysis: ShotAnalysis {
            phases: vec![
                PhaseRange::new(ShotPhase::Setup, 0, 0),
                PhaseRange::new(ShotPhase::Draw, 0, 0),
                PhaseRange::new(ShotPhase::Anchor, 0, 0),
                PhaseRange::new(ShotPhase::Release, 0, 1),
            ],
            stance_analysis: MetricReport::new(),
            draw_analysis: MetricReport::new(),
            anchor_analysis: MetricReport::new(),
            release_analysis: MetricReport::new(),
            errors: Vec::new(),
            overall_score: 100,
            recommendations: vec![
                "Great form! Continue practicing to maintain consistency".to_string(),
            ],
        },
    }
}

/// Reads the video file and returns a canned result; `no pose` bodies fail.
#[derive(Default)]
struct FakeAnalyzer {
    seen: Mutex<Vec<Vec<u8>>>,
    run_ids: Mutex<Vec<AnalysisId>>,
    hang: bool,
    cancelled: AtomicBool,
}

impl VideoAnalyzer for FakeAnalyzer {
    fn analyze(
        &self,
        id: &AnalysisId,
        path: &Path,
        cancel_rx: watch::Receiver<bool>,
    ) -> PipelineResult<AnalysisResult> {
        self.run_ids.lock().unwrap().push(id.clone());
        if self.hang {
            for _ in 0..400 {
                if *cancel_rx.borrow() {
                    self.cancelled.store(true, Ordering::SeqCst);
                    return Err(MediaError::Cancelled.into());
                }
                std::thread::sleep(Duration::from_millis(5));
            }
            return Err(MediaError::Cancelled.into());
        }

        let bytes = std::fs::read(path).map_err(MediaError::from)?;
        if bytes == b"no pose" {
            return Err(PipelineError::NoPoseData);
        }
        self.seen.lock().unwrap().push(bytes);
        Ok(canned_result())
    }
}

struct TestApp {
    router: Router,
    analyzer: Arc<FakeAnalyzer>,
    dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        Self::with(FakeAnalyzer::default(), Duration::from_secs(30)).await
    }

    async fn with(analyzer: FakeAnalyzer, timeout: Duration) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let samples = dir.path().join("samples");
        std::fs::create_dir_all(&samples).unwrap();
        std::fs::write(samples.join("recurve.mp4"), b"sample video").unwrap();
        std::fs::write(samples.join("compound.mp4"), b"another").unwrap();
        std::fs::write(samples.join("readme.txt"), b"ignored").unwrap();

        let config = ApiConfig {
            upload_dir: dir.path().join("uploads"),
            results_dir: dir.path().join("results"),
            samples_dir: samples,
            request_timeout: timeout,
            ..Default::default()
        };

        let analyzer = Arc::new(analyzer);
        let state = AppState::with_analyzer(config, analyzer.clone()).await.unwrap();
        Self {
            router: create_router(state),
            analyzer,
            dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn post(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn upload(&self, field: &str, file_name: &str, content_type: &str, data: &[u8]) -> (StatusCode, Value) {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        self.send(
            Request::builder()
                .method("POST")
                .uri("/api/analyze-video")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    fn upload_count(&self) -> usize {
        std::fs::read_dir(self.dir.path().join("uploads"))
            .unwrap()
            .count()
    }
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new().await;
    for uri in ["/health", "/api/health"] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert!(body["version"].is_string());
    }
}

#[tokio::test]
async fn test_metrics_disabled_by_default() {
    let app = TestApp::new().await;
    let (status, _) = app.get("/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_sample_videos() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/sample-videos").await;
    assert_eq!(status, StatusCode::OK);

    let videos = body["videos"].as_array().unwrap();
    let names: Vec<&str> = videos.iter().map(|v| v["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["compound.mp4", "recurve.mp4"]);
    assert_eq!(videos[1]["size"], 12);
}

#[tokio::test]
async fn test_analyze_sample_and_fetch_result() {
    let app = TestApp::new().await;
    let (status, body) = app.post("/api/analyze-sample/recurve.mp4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["source_name"], "recurve.mp4");
    assert_eq!(body["analysis"]["analysis"]["overall_score"], 100);
    assert_eq!(app.analyzer.seen.lock().unwrap().as_slice(), &[b"sample video".to_vec()]);

    let identifier = body["identifier"].as_str().unwrap().to_string();
    assert!(app
        .dir
        .path()
        .join("results")
        .join(format!("{identifier}.json"))
        .is_file());
    assert_eq!(
        app.analyzer.run_ids.lock().unwrap().as_slice(),
        &[AnalysisId::from_string(identifier.clone())]
    );

    let (status, stored) = app.get(&format!("/api/results/{identifier}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored, body["analysis"]);
}

#[tokio::test]
async fn test_analyze_missing_sample() {
    let app = TestApp::new().await;
    let (status, body) = app.post("/api/analyze-sample/missing.mp4").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Video not found");
}

#[tokio::test]
async fn test_analyze_sample_rejects_traversal() {
    let app = TestApp::new().await;
    let (status, _) = app.post("/api/analyze-sample/..%2Frecurve.mp4").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Double dots inside a plain file name are not traversal
    let (status, _) = app.post("/api/analyze-sample/take..2.mp4").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.analyzer.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_is_analyzed_and_removed() {
    let app = TestApp::new().await;
    let (status, body) = app.upload("file", "my shot.mp4", "video/mp4", b"uploaded bytes").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source_name"], "my shot.mp4");
    assert_eq!(
        app.analyzer.seen.lock().unwrap().as_slice(),
        &[b"uploaded bytes".to_vec()]
    );
    assert_eq!(app.upload_count(), 0);
}

#[tokio::test]
async fn test_upload_requires_video_content_type() {
    let app = TestApp::new().await;
    let (status, body) = app.upload("file", "notes.txt", "text/plain", b"hello").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "File must be a video");
    assert_eq!(app.upload_count(), 0);
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let app = TestApp::new().await;
    let (status, body) = app.upload("video", "shot.mp4", "video/mp4", b"data").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "No file uploaded");
}

#[tokio::test]
async fn test_failed_analysis_is_500_and_cleans_up() {
    let app = TestApp::new().await;
    let (status, body) = app.upload("file", "shot.mp4", "video/mp4", b"no pose").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Analysis failed: No valid pose data found");
    assert_eq!(app.upload_count(), 0);

    let results = std::fs::read_dir(app.dir.path().join("results")).unwrap().count();
    assert_eq!(results, 0);
}

#[tokio::test]
async fn test_unknown_result() {
    let app = TestApp::new().await;
    let (status, body) = app
        .get("/api/results/550e8400-e29b-41d4-a716-446655440000")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Result not found");

    let (status, _) = app.get("/api/results/not-a-uuid").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_timeout_cancels_analysis() {
    let analyzer = FakeAnalyzer {
        hang: true,
        ..Default::default()
    };
    let app = TestApp::with(analyzer, Duration::from_millis(50)).await;

    let (status, _) = app.post("/api/analyze-sample/recurve.mp4").await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);

    // The blocking task notices the flag on its next poll
    for _ in 0..200 {
        if app.analyzer.cancelled.load(Ordering::SeqCst) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("analysis was not cancelled");
}
