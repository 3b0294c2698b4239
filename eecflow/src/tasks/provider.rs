//! Task provider: collaborators in, ready invocations out.

use super::collaborators::{ConfigStore, DeviceSelector, InvocationSink};
use super::definition::{TaskDefinition, TASK_TYPE};
use crate::config::ConfigSnapshot;
use crate::core::{InvocationDescriptor, PipelineMode, ReadyInvocation, StageKind};
use crate::errors::{BuildError, EecflowError, SelectionError, ToolchainError};
use crate::materialize::Materializer;
use crate::observability::BuildSpan;
use crate::pipeline::PipelineBuilder;
use crate::stages::template;
use crate::toolchain::{resolve_root, Toolchain};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, Instrument};

/// Produces ready invocations for a workspace.
#[derive(Debug, Clone)]
pub struct TaskProvider {
    toolchain: Arc<dyn Toolchain>,
    config: Arc<dyn ConfigStore>,
    selector: Arc<dyn DeviceSelector>,
    workspace: PathBuf,
}

impl TaskProvider {
    /// Creates a provider for `workspace`.
    #[must_use]
    pub fn new(
        toolchain: Arc<dyn Toolchain>,
        config: Arc<dyn ConfigStore>,
        selector: Arc<dyn DeviceSelector>,
        workspace: impl Into<PathBuf>,
    ) -> Self {
        Self {
            toolchain,
            config,
            selector,
            workspace: workspace.into(),
        }
    }

    /// Lists the fallback tasks shown before a device is chosen.
    pub async fn provide_tasks(&self) -> Result<Vec<ReadyInvocation>, EecflowError> {
        let pipeline = PipelineBuilder::fallback(&self.workspace)?;
        let materializer = Materializer::new(Arc::clone(&self.toolchain));
        Ok(materializer.materialize_all(&pipeline).await?)
    }

    /// Builds and materializes every stage of `mode`.
    ///
    /// The toolchain is checked first, then the device selection. Nothing is
    /// built, and no directory created, unless both succeed.
    pub async fn create_pipeline(
        &self,
        mode: PipelineMode,
    ) -> Result<Vec<ReadyInvocation>, EecflowError> {
        if mode == PipelineMode::Fallback {
            return self.provide_tasks().await;
        }

        let mut span = BuildSpan::start(mode);
        let current = span.span().clone();
        let result = self
            .build_and_materialize(mode, &mut span)
            .instrument(current)
            .await;
        span.finish(&result);
        result
    }

    async fn build_and_materialize(
        &self,
        mode: PipelineMode,
        span: &mut BuildSpan,
    ) -> Result<Vec<ReadyInvocation>, EecflowError> {
        let root = self.toolchain_root().await?;
        let snapshot = self.active_snapshot().await?;

        let pipeline = PipelineBuilder::new(&snapshot, &root, &self.workspace).build(mode)?;
        span.record_pipeline(&pipeline);

        let materializer = Materializer::new(Arc::clone(&self.toolchain));
        Ok(materializer.materialize_all(&pipeline).await?)
    }

    /// Builds and materializes a single stage.
    pub async fn create_task(&self, kind: StageKind) -> Result<ReadyInvocation, EecflowError> {
        let root = self.toolchain_root().await?;
        let snapshot = self.active_snapshot().await?;

        let descriptor = PipelineBuilder::new(&snapshot, &root, &self.workspace).stage(kind)?;
        let materializer = Materializer::new(Arc::clone(&self.toolchain));
        Ok(materializer.materialize(&descriptor).await?)
    }

    /// Resolves a user-authored task definition.
    ///
    /// Returns `Ok(None)` for definitions of another type or with an unknown
    /// command. Arguments are used as written.
    pub async fn resolve_task(
        &self,
        definition: &TaskDefinition,
    ) -> Result<Option<ReadyInvocation>, EecflowError> {
        if !self.toolchain.is_installed().await {
            return Err(ToolchainError::NotInstalled.into());
        }
        if definition.task_type != TASK_TYPE {
            return Ok(None);
        }
        let Some(kind) = StageKind::from_command(&definition.command) else {
            debug!(command = %definition.command, "Ignoring task with unknown command");
            return Ok(None);
        };

        let working_dir = definition
            .cwd
            .as_ref()
            .map_or_else(|| self.workspace.clone(), |cwd| self.workspace.join(cwd));
        let descriptor = InvocationDescriptor::new(kind, definition.args.clone(), working_dir)
            .with_group(template(kind).group);

        let materializer = Materializer::new(Arc::clone(&self.toolchain));
        Ok(Some(materializer.materialize(&descriptor).await?))
    }

    /// Builds a pipeline and hands it to `sink`, returning how many
    /// invocations were submitted.
    pub async fn publish(
        &self,
        mode: PipelineMode,
        sink: &dyn InvocationSink,
    ) -> Result<usize, EecflowError> {
        let ready = self.create_pipeline(mode).await?;
        let count = ready.len();
        sink.submit(ready).await?;
        info!(mode = %mode, count, "Published tasks");
        Ok(count)
    }

    async fn toolchain_root(&self) -> Result<PathBuf, BuildError> {
        resolve_root(self.toolchain.as_ref()).await
    }

    /// Reads the configuration, prompting once for a device if none is
    /// selected.
    async fn active_snapshot(&self) -> Result<ConfigSnapshot, SelectionError> {
        let snapshot = self.config.snapshot().await;
        if snapshot.device.is_selected() {
            return Ok(snapshot);
        }

        info!("No target device selected, prompting");
        self.selector.select_device().await;

        let snapshot = self.config.snapshot().await;
        if snapshot.device.is_selected() {
            Ok(snapshot)
        } else {
            Err(SelectionError)
        }
    }
}
