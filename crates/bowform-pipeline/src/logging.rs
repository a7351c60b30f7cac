//! Structured run logging utilities.
//!
//! Provides consistent, structured logging for analysis runs with
//! tracing spans and contextual information.

use tracing::{error, info, warn, Span};

use bowform_models::AnalysisId;

use crate::pipeline::PipelineStage;

/// Run logger for structured logging with consistent formatting.
#[derive(Debug, Clone)]
pub struct RunLogger {
    run_id: String,
    operation: String,
}

impl RunLogger {
    /// Create a new logger for a specific run and operation.
    ///
    /// # Arguments
    /// * `run_id` - The identifier the result is stored under, or a fresh one for unstored runs
    /// * `operation` - The type of operation (e.g., "analyze_file", "analyze_source")
    pub fn new(run_id: &AnalysisId, operation: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Log the start of a run.
    pub fn log_start(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            operation = %self.operation,
            "Run started: {}", message
        );
    }

    /// Log a stage transition.
    pub fn log_stage(&self, stage: PipelineStage, message: &str) {
        info!(
            run_id = %self.run_id,
            operation = %self.operation,
            stage = stage.as_str(),
            "Run stage {}: {}", stage, message
        );
    }

    /// Log a warning during the run.
    pub fn log_warning(&self, message: &str) {
        warn!(
            run_id = %self.run_id,
            operation = %self.operation,
            "Run warning: {}", message
        );
    }

    /// Log a terminal error.
    pub fn log_error(&self, message: &str) {
        error!(
            run_id = %self.run_id,
            operation = %self.operation,
            "Run failed: {}", message
        );
    }

    /// Log the completion of a run.
    pub fn log_completion(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            operation = %self.operation,
            "Run completed: {}", message
        );
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Create a tracing span for this run.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "analysis_run",
            run_id = %self.run_id,
            operation = %self.operation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_logger_creation() {
        let run_id = AnalysisId::new();
        let logger = RunLogger::new(&run_id, "analyze_file");

        assert_eq!(logger.run_id(), run_id.as_str());
        assert_eq!(logger.operation(), "analyze_file");
    }
}
