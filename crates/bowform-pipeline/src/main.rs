//! Command line video analysis.
//!
//! Usage: `bowform-analyze <video> [output.json]`. Prints the result JSON to
//! stdout when no output path is given.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bowform_media::BlazePoseEstimator;
use bowform_models::AnalysisId;
use bowform_pipeline::{Pipeline, PipelineConfig};

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays clean JSON
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("bowform=info".parse()?)
        .add_directive("ort=warn".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true),
            )
            .with(env_filter)
            .init();
    }

    let mut args = std::env::args().skip(1);
    let Some(video) = args.next().map(PathBuf::from) else {
        bail!("usage: bowform-analyze <video> [output.json]");
    };
    let output = args.next().map(PathBuf::from);

    let config = PipelineConfig::from_env();
    config.validate()?;
    info!("Pipeline config: {:?}", config);

    let estimator = BlazePoseEstimator::load(&config.pose_model_path, config.pose_config())
        .with_context(|| format!("loading pose model {}", config.pose_model_path.display()))?;
    let pipeline = Pipeline::new(Arc::new(estimator), config)?;

    let run_id = AnalysisId::new();
    let result = pipeline
        .run_file(&run_id, &video, None)
        .with_context(|| format!("Analysis failed: {}", video.display()))?;

    let json = serde_json::to_string_pretty(&result)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), score = result.analysis.overall_score, "Result written");
        }
        None => println!("{json}"),
    }

    Ok(())
}
