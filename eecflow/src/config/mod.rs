//! Configuration read by the pipeline builder.
//!
//! The settings store is owned by the host. eecflow only sees an immutable
//! [`ConfigSnapshot`] taken at the start of each build call:
//! - Device selection, with a distinguished "no device" state
//! - Build presets and custom compiler options
//! - The input source file

mod device;
mod options;
mod snapshot;

pub use device::{DeviceSelection, DeviceTarget, UNSELECTED_DESCRIPTION};
pub use options::{BuildOptions, CustomOptions, Preset};
pub use snapshot::ConfigSnapshot;
