//! Core domain model types for eecflow.
//!
//! This module contains the fundamental types used throughout the crate:
//! - Stage kind, executable role and task group enums
//! - Invocation descriptors and the pipelines that order them
//! - Ready invocations handed to the host

mod invocation;
mod kind;

pub use invocation::{
    DirStatus, InvocationDescriptor, OutputDirectory, Pipeline, PipelineMode, ReadyInvocation,
    OUTPUT_FLAG,
};
pub use kind::{ExecutableRole, StageKind, TaskGroup};
