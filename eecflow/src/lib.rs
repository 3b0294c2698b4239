//! # eecflow
//!
//! Build-pipeline synthesis for the `eec` embedded toolchain.
//!
//! Given a device selection and a set of build options, eecflow computes the
//! external-process invocations needed to turn a source file into a flashed
//! program image:
//!
//! - **Preset resolution**: named build presets become compiler flags
//! - **Path resolution**: linker script, stdlib root and the `out/<device>/` tree
//! - **Stage table**: one typed argument template per pipeline stage
//! - **Pipeline building**: templates are instantiated in fixed order, with
//!   each stage reading the artifact the previous one declared
//! - **Materialization**: executables are looked up and output directories
//!   created before anything runs
//!
//! eecflow never runs processes itself. Ready invocations are handed to an
//! [`InvocationSink`](crate::tasks::InvocationSink) owned by the host.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use eecflow::prelude::*;
//!
//! let snapshot = store.snapshot().await;
//! let pipeline = PipelineBuilder::new(&snapshot, &toolchain_root, &workspace)
//!     .build(PipelineMode::Device)?;
//!
//! let ready = Materializer::new(toolchain).materialize_all(&pipeline).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod errors;
pub mod materialize;
pub mod observability;
pub mod paths;
pub mod pipeline;
pub mod presets;
pub mod stages;
pub mod tasks;
pub mod testing;
pub mod toolchain;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{
        BuildOptions, ConfigSnapshot, CustomOptions, DeviceSelection, DeviceTarget, Preset,
    };
    pub use crate::core::{
        ExecutableRole, InvocationDescriptor, Pipeline, PipelineMode, ReadyInvocation, StageKind,
        TaskGroup,
    };
    pub use crate::errors::{
        BuildError, ConfigurationError, EecflowError, ErrorInfo, MaterializeError,
        ResourceError, SelectionError, TemplateError, ToolchainError,
    };
    pub use crate::materialize::{DirectoryAcquisition, Materializer, OutputDirectory};
    pub use crate::paths::ResolvedPaths;
    pub use crate::pipeline::PipelineBuilder;
    pub use crate::presets::resolve_flags;
    pub use crate::stages::{Arg, Placeholder, StageTemplate, STAGE_TABLE};
    pub use crate::tasks::{
        ConfigStore, DeviceSelector, InvocationSink, TaskDefinition, TaskProvider,
    };
    pub use crate::toolchain::{InstallDirToolchain, Toolchain};
}
