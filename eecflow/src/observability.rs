//! Structured tracing for pipeline requests.
//!
//! Each request runs inside a `pipeline.build` span. Fields that are only
//! known once the pipeline exists (build id, device, stage count) are
//! recorded on the span as they become available, and the outcome is logged
//! against it with the elapsed time.

use crate::core::{Pipeline, PipelineMode};
use crate::errors::EecflowError;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::field::Empty;
use tracing::{debug, info, info_span, warn, Span};

/// Span attributes for one pipeline request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSpanAttributes {
    /// Requested mode.
    pub mode: Option<PipelineMode>,
    /// Build id, once the pipeline exists.
    pub build_id: Option<String>,
    /// Target device id.
    pub device_id: Option<String>,
    /// Number of invocations produced.
    pub stage_count: Option<usize>,
}

impl BuildSpanAttributes {
    /// Creates attributes for a request.
    #[must_use]
    pub fn new(mode: PipelineMode) -> Self {
        Self {
            mode: Some(mode),
            ..Default::default()
        }
    }

    /// Fills in what a built pipeline knows.
    #[must_use]
    pub fn with_pipeline(mut self, pipeline: &Pipeline) -> Self {
        self.build_id = Some(pipeline.build_id.to_string());
        self.device_id.clone_from(&pipeline.device_id);
        self.stage_count = Some(pipeline.len());
        self
    }
}

/// The tracing span of one pipeline request.
#[derive(Debug)]
pub struct BuildSpan {
    span: Span,
    started: Instant,
    attributes: BuildSpanAttributes,
}

impl BuildSpan {
    /// Opens the span for a request in `mode`.
    #[must_use]
    pub fn start(mode: PipelineMode) -> Self {
        let span = info_span!(
            "pipeline.build",
            mode = %mode,
            build_id = Empty,
            device_id = Empty,
            stage_count = Empty
        );
        debug!(parent: &span, "Pipeline request started");

        Self {
            span,
            started: Instant::now(),
            attributes: BuildSpanAttributes::new(mode),
        }
    }

    /// The underlying span, for instrumenting the request's future.
    #[must_use]
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Attributes recorded so far.
    #[must_use]
    pub fn attributes(&self) -> &BuildSpanAttributes {
        &self.attributes
    }

    /// Records the identity of the built pipeline on the span.
    pub fn record_pipeline(&mut self, pipeline: &Pipeline) {
        self.attributes = self.attributes.clone().with_pipeline(pipeline);

        self.span.record("build_id", tracing::field::display(pipeline.build_id));
        if let Some(id) = &pipeline.device_id {
            self.span.record("device_id", id.as_str());
        }
        self.span.record("stage_count", pipeline.len());
    }

    /// Milliseconds since the span was opened.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Logs the outcome of the request and closes the span.
    pub fn finish<T>(self, result: &Result<T, EecflowError>) {
        let elapsed_ms = self.elapsed_ms();
        match result {
            Ok(_) => info!(
                parent: &self.span,
                elapsed_ms,
                attributes = ?self.attributes,
                "Pipeline request finished"
            ),
            Err(err) => warn!(
                parent: &self.span,
                elapsed_ms,
                attributes = ?self.attributes,
                code = %err.error_info().code,
                error = %err,
                "Pipeline request failed"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SelectionError;
    use crate::pipeline::PipelineBuilder;
    use crate::testing::sample_snapshot;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn device_pipeline() -> Pipeline {
        PipelineBuilder::new(&sample_snapshot(), Path::new("/eec/bin"), Path::new("/ws"))
            .build(PipelineMode::Device)
            .unwrap()
    }

    #[test]
    fn test_attributes_before_build() {
        let attrs = BuildSpanAttributes::new(PipelineMode::Simulate);
        assert_eq!(attrs.mode, Some(PipelineMode::Simulate));
        assert_eq!(attrs.build_id, None);
        assert_eq!(attrs.stage_count, None);
    }

    #[test]
    fn test_attributes_from_pipeline() {
        let pipeline = device_pipeline();
        let attrs = BuildSpanAttributes::new(PipelineMode::Device).with_pipeline(&pipeline);

        assert_eq!(attrs.device_id.as_deref(), Some("devA"));
        assert_eq!(attrs.stage_count, Some(4));
        assert_eq!(attrs.build_id, Some(pipeline.build_id.to_string()));
    }

    #[test]
    fn test_fallback_pipeline_has_no_device_attribute() {
        let pipeline = PipelineBuilder::fallback(Path::new("/ws")).unwrap();
        let attrs = BuildSpanAttributes::new(PipelineMode::Fallback).with_pipeline(&pipeline);
        assert_eq!(attrs.device_id, None);
        assert_eq!(attrs.stage_count, Some(5));
    }

    #[test]
    fn test_span_records_pipeline() {
        let pipeline = device_pipeline();
        let mut span = BuildSpan::start(PipelineMode::Device);
        span.record_pipeline(&pipeline);

        assert_eq!(span.attributes().device_id.as_deref(), Some("devA"));
        assert_eq!(span.attributes().stage_count, Some(4));
        span.finish(&Ok::<_, EecflowError>(()));
    }

    #[test]
    fn test_span_finishes_with_error() {
        let span = BuildSpan::start(PipelineMode::Device);
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(span.elapsed_ms() >= 5.0);
        assert_eq!(span.attributes().build_id, None);
        span.finish(&Err::<(), _>(EecflowError::from(SelectionError)));
    }
}
