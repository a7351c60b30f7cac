//! Application state.

use std::path::Path;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::watch;

use bowform_media::BlazePoseEstimator;
use bowform_models::{AnalysisId, AnalysisResult};
use bowform_pipeline::{Pipeline, PipelineConfig, PipelineResult};
use bowform_storage::{ResultStore, SampleLibrary, UploadArea};

use crate::config::ApiConfig;

/// Runs one analysis over a video file. Called from a blocking thread.
///
/// `id` is the identifier the result will be stored under.
pub trait VideoAnalyzer: Send + Sync {
    fn analyze(
        &self,
        id: &AnalysisId,
        path: &Path,
        cancel_rx: watch::Receiver<bool>,
    ) -> PipelineResult<AnalysisResult>;
}

impl VideoAnalyzer for Pipeline {
    fn analyze(
        &self,
        id: &AnalysisId,
        path: &Path,
        cancel_rx: watch::Receiver<bool>,
    ) -> PipelineResult<AnalysisResult> {
        self.run_file(id, path, Some(cancel_rx))
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub analyzer: Arc<dyn VideoAnalyzer>,
    pub results: ResultStore,
    pub samples: SampleLibrary,
    pub uploads: UploadArea,
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Create application state with the ONNX pose model from `pipeline_config`.
    pub async fn new(
        config: ApiConfig,
        pipeline_config: PipelineConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        pipeline_config.validate()?;
        let estimator =
            BlazePoseEstimator::load(&pipeline_config.pose_model_path, pipeline_config.pose_config())?;
        let pipeline = Pipeline::new(Arc::new(estimator), pipeline_config)?;
        Ok(Self::with_analyzer(config, Arc::new(pipeline)).await?)
    }

    /// Create application state around an existing analyzer.
    pub async fn with_analyzer(
        config: ApiConfig,
        analyzer: Arc<dyn VideoAnalyzer>,
    ) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(&config.upload_dir).await?;
        tokio::fs::create_dir_all(&config.results_dir).await?;

        Ok(Self {
            results: ResultStore::new(&config.results_dir),
            samples: SampleLibrary::new(&config.samples_dir),
            uploads: UploadArea::new(&config.upload_dir),
            analyzer,
            metrics_handle: None,
            config,
        })
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}
