//! Invocation descriptors, pipelines and ready invocations.

use super::{ExecutableRole, StageKind, TaskGroup};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// The argument that introduces a stage's primary output.
pub const OUTPUT_FLAG: &str = "-o";

/// A fully resolved description of one process invocation.
///
/// Descriptors are created by the pipeline builder and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationDescriptor {
    kind: StageKind,
    role: ExecutableRole,
    name: String,
    command: String,
    args: Vec<String>,
    working_dir: PathBuf,
    group: TaskGroup,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output: Option<String>,
}

impl InvocationDescriptor {
    /// Creates a descriptor for a stage with its resolved arguments.
    #[must_use]
    pub fn new(kind: StageKind, args: Vec<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            role: kind.role(),
            name: kind.display_name().to_string(),
            command: kind.command().to_string(),
            args,
            working_dir: working_dir.into(),
            group: TaskGroup::None,
            input: None,
            output: None,
        }
    }

    /// Sets the scheduling group.
    #[must_use]
    pub fn with_group(mut self, group: TaskGroup) -> Self {
        self.group = group;
        self
    }

    /// Sets the declared input artifact.
    #[must_use]
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Sets the declared output artifact.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// The pipeline stage.
    #[must_use]
    pub fn kind(&self) -> StageKind {
        self.kind
    }

    /// The executable role to run.
    #[must_use]
    pub fn role(&self) -> ExecutableRole {
        self.role
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Task command name.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Resolved argument list.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Directory relative paths in the arguments resolve against.
    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Scheduling group.
    #[must_use]
    pub fn group(&self) -> TaskGroup {
        self.group
    }

    /// The artifact this stage reads, if declared.
    #[must_use]
    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    /// The artifact this stage produces, if declared.
    #[must_use]
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// The value following the last `-o` argument.
    #[must_use]
    pub fn output_arg(&self) -> Option<&str> {
        let index = self.args.iter().rposition(|arg| arg == OUTPUT_FLAG)?;
        self.args.get(index + 1).map(String::as_str)
    }

    /// Directory that must exist before the stage runs, resolved against the
    /// working directory.
    #[must_use]
    pub fn output_dir(&self) -> Option<PathBuf> {
        let output = Path::new(self.output_arg()?);
        let parent = output.parent().filter(|p| !p.as_os_str().is_empty())?;
        Some(self.working_dir.join(parent))
    }
}

/// Which stages a pipeline contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineMode {
    /// Compile, link, package and flash for the selected device.
    #[default]
    Device,
    /// Run the source in the simulator.
    Simulate,
    /// Placeholder-free listing used before any device is chosen.
    Fallback,
}

impl PipelineMode {
    /// Stage kinds in execution order for this mode.
    #[must_use]
    pub fn stages(self) -> &'static [StageKind] {
        match self {
            Self::Device => &[
                StageKind::Compile,
                StageKind::Link,
                StageKind::Package,
                StageKind::Flash,
            ],
            Self::Simulate => &[StageKind::Simulate],
            Self::Fallback => &StageKind::ALL,
        }
    }
}

impl fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device => write!(f, "device"),
            Self::Simulate => write!(f, "simulate"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// An ordered sequence of invocations produced by one build call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    /// Identifier of this build call.
    pub build_id: Uuid,
    /// When the pipeline was built.
    pub created_at: DateTime<Utc>,
    /// Which stages were built.
    pub mode: PipelineMode,
    /// The device the pipeline targets, absent for the fallback listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    invocations: Vec<InvocationDescriptor>,
}

impl Pipeline {
    /// Creates a pipeline with a fresh build id.
    #[must_use]
    pub fn new(
        mode: PipelineMode,
        device_id: Option<String>,
        invocations: Vec<InvocationDescriptor>,
    ) -> Self {
        Self {
            build_id: Uuid::new_v4(),
            created_at: Utc::now(),
            mode,
            device_id,
            invocations,
        }
    }

    /// The invocations in execution order.
    #[must_use]
    pub fn invocations(&self) -> &[InvocationDescriptor] {
        &self.invocations
    }

    /// Finds the invocation for a stage.
    #[must_use]
    pub fn get(&self, kind: StageKind) -> Option<&InvocationDescriptor> {
        self.invocations.iter().find(|inv| inv.kind() == kind)
    }

    /// Number of invocations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.invocations.len()
    }

    /// Returns true if the pipeline has no invocations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.invocations.is_empty()
    }
}

/// Whether an output directory had to be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirStatus {
    /// The directory was already present.
    Exists,
    /// The directory was created.
    Created,
}

/// An output directory acquired for an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDirectory {
    /// Absolute or working-directory-relative path.
    pub path: PathBuf,
    /// How it was acquired.
    pub status: DirStatus,
}

/// An invocation bound to a concrete executable, ready to hand to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyInvocation {
    /// The descriptor this was materialized from.
    pub descriptor: InvocationDescriptor,
    /// Path of the executable to run.
    pub executable: PathBuf,
    /// The output directory, when the invocation writes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<OutputDirectory>,
}

impl ReadyInvocation {
    /// The full command line, executable first.
    #[must_use]
    pub fn command_line(&self) -> Vec<String> {
        std::iter::once(self.executable.display().to_string())
            .chain(self.descriptor.args().iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn link_descriptor() -> InvocationDescriptor {
        InvocationDescriptor::new(
            StageKind::Link,
            vec![
                "out/devA/output.o".to_string(),
                "-o".to_string(),
                "out/devA/output.elf".to_string(),
                "-nostdlib".to_string(),
            ],
            "/ws",
        )
        .with_input("out/devA/output.o")
        .with_output("out/devA/output.elf")
    }

    #[test]
    fn test_descriptor_metadata_follows_kind() {
        let desc = link_descriptor();
        assert_eq!(desc.name(), "linker");
        assert_eq!(desc.command(), "link");
        assert_eq!(desc.role(), ExecutableRole::Linker);
        assert_eq!(desc.group(), TaskGroup::None);
    }

    #[test]
    fn test_output_arg_uses_last_flag() {
        let desc = InvocationDescriptor::new(
            StageKind::Package,
            ["-o", "a/first", "-o", "b/second"].map(String::from).to_vec(),
            "/ws",
        );
        assert_eq!(desc.output_arg(), Some("b/second"));
        assert_eq!(desc.output_dir(), Some(PathBuf::from("/ws/b")));
    }

    #[test]
    fn test_output_dir_resolves_against_working_dir() {
        assert_eq!(link_descriptor().output_dir(), Some(PathBuf::from("/ws/out/devA")));
    }

    #[test]
    fn test_no_output_dir_without_flag() {
        let desc = InvocationDescriptor::new(
            StageKind::Flash,
            vec!["out/devA/prog.alf".to_string()],
            "/ws",
        );
        assert_eq!(desc.output_arg(), None);
        assert_eq!(desc.output_dir(), None);

        let dangling = InvocationDescriptor::new(StageKind::Link, vec!["-o".to_string()], "/ws");
        assert_eq!(dangling.output_arg(), None);
    }

    #[test]
    fn test_pipeline_mode_stages() {
        assert_eq!(PipelineMode::Simulate.stages(), &[StageKind::Simulate]);
        assert_eq!(PipelineMode::Device.stages().len(), 4);
        assert!(!PipelineMode::Device.stages().contains(&StageKind::Simulate));
    }

    #[test]
    fn test_pipeline_lookup() {
        let pipeline =
            Pipeline::new(PipelineMode::Device, Some("devA".into()), vec![link_descriptor()]);
        assert_eq!(pipeline.len(), 1);
        assert!(pipeline.get(StageKind::Link).is_some());
        assert!(pipeline.get(StageKind::Compile).is_none());
    }

    #[test]
    fn test_command_line_starts_with_executable() {
        let ready = ReadyInvocation {
            descriptor: link_descriptor(),
            executable: PathBuf::from("/eec/bin/ld.lld"),
            output_dir: None,
        };
        let line = ready.command_line();
        assert_eq!(line[0], "/eec/bin/ld.lld");
        assert_eq!(line[1], "out/devA/output.o");
        assert_eq!(line.len(), 5);
    }
}
