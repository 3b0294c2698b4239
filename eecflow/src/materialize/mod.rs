//! Invocation materialization.
//!
//! Binds descriptors to concrete executables and acquires the output
//! directory each invocation writes into.

mod directory;

pub use crate::core::{DirStatus, OutputDirectory};
pub use directory::{acquire_output_dir, DirectoryAcquisition};

use crate::core::{InvocationDescriptor, Pipeline, ReadyInvocation};
use crate::errors::MaterializeError;
use crate::toolchain::Toolchain;
use std::sync::Arc;
use tracing::{debug, warn};

/// Turns descriptors into ready invocations.
#[derive(Debug, Clone)]
pub struct Materializer {
    toolchain: Arc<dyn Toolchain>,
}

impl Materializer {
    /// Creates a materializer backed by a toolchain.
    #[must_use]
    pub fn new(toolchain: Arc<dyn Toolchain>) -> Self {
        Self { toolchain }
    }

    /// Materializes one descriptor.
    ///
    /// The executable is looked up once. If the arguments contain `-o`, the
    /// parent of its value is created under the working directory.
    pub async fn materialize(
        &self,
        descriptor: &InvocationDescriptor,
    ) -> Result<ReadyInvocation, MaterializeError> {
        let executable = self.toolchain.executable_path(descriptor.role()).await?;

        let output_dir = match descriptor.output_dir() {
            Some(dir) => Some(acquire_output_dir(&dir).await.into_result()?),
            None => None,
        };

        debug!(
            stage = %descriptor.kind(),
            executable = %executable.display(),
            output_dir = ?output_dir.as_ref().map(|d| (&d.path, d.status)),
            "Materialized invocation"
        );

        Ok(ReadyInvocation {
            descriptor: descriptor.clone(),
            executable,
            output_dir,
        })
    }

    /// Materializes every invocation of a pipeline in order.
    ///
    /// Stops at the first failure. Directories created for earlier stages are
    /// left in place.
    pub async fn materialize_all(
        &self,
        pipeline: &Pipeline,
    ) -> Result<Vec<ReadyInvocation>, MaterializeError> {
        let mut ready = Vec::with_capacity(pipeline.len());

        for descriptor in pipeline.invocations() {
            match self.materialize(descriptor).await {
                Ok(invocation) => ready.push(invocation),
                Err(err) => {
                    warn!(
                        build_id = %pipeline.build_id,
                        stage = %descriptor.kind(),
                        completed = ready.len(),
                        error = %err,
                        "Materialization aborted"
                    );
                    return Err(err);
                }
            }
        }

        Ok(ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildOptions, ConfigSnapshot};
    use crate::core::{ExecutableRole, PipelineMode, StageKind};
    use crate::errors::ToolchainError;
    use crate::pipeline::PipelineBuilder;
    use crate::testing::{sample_device, MockToolchain};
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn pipeline(workspace: &Path, mode: PipelineMode) -> Pipeline {
        let snapshot =
            ConfigSnapshot::new(sample_device("devA"), BuildOptions::default(), "main.es");
        PipelineBuilder::new(&snapshot, Path::new("/eec/bin"), workspace)
            .build(mode)
            .unwrap()
    }

    #[tokio::test]
    async fn test_materialize_creates_device_directory() {
        let ws = tempfile::tempdir().unwrap();
        let toolchain = Arc::new(MockToolchain::installed("/eec/bin"));
        let materializer = Materializer::new(toolchain.clone());

        let pipeline = pipeline(ws.path(), PipelineMode::Device);
        let compile = pipeline.get(StageKind::Compile).unwrap();
        let ready = materializer.materialize(compile).await.unwrap();

        assert_eq!(
            ready.executable,
            Path::new("/eec/bin").join(ExecutableRole::Compiler.file_name())
        );
        let dir = ready.output_dir.unwrap();
        assert_eq!(dir.path, ws.path().join("out/devA"));
        assert_eq!(dir.status, DirStatus::Created);
        assert!(ws.path().join("out/devA").is_dir());
        assert_eq!(toolchain.lookups(), vec![ExecutableRole::Compiler]);
    }

    #[tokio::test]
    async fn test_materialize_twice_is_idempotent() {
        let ws = tempfile::tempdir().unwrap();
        let materializer = Materializer::new(Arc::new(MockToolchain::installed("/eec/bin")));
        let pipeline = pipeline(ws.path(), PipelineMode::Device);
        let link = pipeline.get(StageKind::Link).unwrap();

        let first = materializer.materialize(link).await.unwrap();
        let second = materializer.materialize(link).await.unwrap();

        assert_eq!(first.executable, second.executable);
        assert_eq!(second.output_dir.unwrap().status, DirStatus::Exists);
    }

    #[tokio::test]
    async fn test_link_declares_compile_output_as_input() {
        let ws = tempfile::tempdir().unwrap();
        let materializer = Materializer::new(Arc::new(MockToolchain::installed("/eec/bin")));
        let pipeline = pipeline(ws.path(), PipelineMode::Device);

        let ready = materializer.materialize_all(&pipeline).await.unwrap();
        let compile = &ready[0].descriptor;
        let link = &ready[1].descriptor;

        assert_eq!(compile.output(), Some("out/devA/output.o"));
        assert_eq!(link.input(), Some("out/devA/output.o"));
        assert_eq!(link.args()[0], "out/devA/output.o");
    }

    #[tokio::test]
    async fn test_flash_has_no_output_directory() {
        let ws = tempfile::tempdir().unwrap();
        let materializer = Materializer::new(Arc::new(MockToolchain::installed("/eec/bin")));
        let pipeline = pipeline(ws.path(), PipelineMode::Device);

        let ready = materializer
            .materialize(pipeline.get(StageKind::Flash).unwrap())
            .await
            .unwrap();
        assert_eq!(ready.output_dir, None);
    }

    #[tokio::test]
    async fn test_directory_failure_stops_remaining_stages() {
        let ws = tempfile::tempdir().unwrap();
        tokio::fs::create_dir(ws.path().join("out")).await.unwrap();
        tokio::fs::write(ws.path().join("out/devA"), b"blocker").await.unwrap();

        let toolchain = Arc::new(MockToolchain::installed("/eec/bin"));
        let materializer = Materializer::new(toolchain.clone());
        let err = materializer
            .materialize_all(&pipeline(ws.path(), PipelineMode::Device))
            .await
            .unwrap_err();

        assert!(matches!(err, MaterializeError::Resource(_)));
        assert_eq!(toolchain.lookups().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_executable_is_toolchain_error() {
        let ws = tempfile::tempdir().unwrap();
        let toolchain = MockToolchain::installed("/eec/bin").without_role(ExecutableRole::Packager);
        let materializer = Materializer::new(Arc::new(toolchain));

        let err = materializer
            .materialize_all(&pipeline(ws.path(), PipelineMode::Device))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MaterializeError::Toolchain(ToolchainError::ExecutableUnavailable { .. })
        ));
        // Compile and Link already acquired their directory.
        assert!(ws.path().join("out/devA").is_dir());
    }
}
