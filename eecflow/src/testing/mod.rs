//! Testing utilities for eecflow hosts.
//!
//! This module provides:
//! - Sample devices and configuration snapshots
//! - Mock toolchain, device selector and invocation sink
//! - Assertions over produced invocations

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{assert_chained, assert_has_flag};
pub use fixtures::{sample_device, sample_snapshot, SAMPLE_TRIPLET};
pub use mocks::{MockToolchain, RecordingSink, ScriptedDeviceSelector};
