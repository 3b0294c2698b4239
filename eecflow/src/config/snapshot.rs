//! Immutable configuration snapshots.

use super::{BuildOptions, CustomOptions, DeviceSelection, DeviceTarget, Preset};
use crate::errors::EecflowError;
use serde::{Deserialize, Serialize};

/// Everything the pipeline builder reads from configuration, captured once
/// per build call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "PersistedConfig", into = "PersistedConfig")]
pub struct ConfigSnapshot {
    /// The active device.
    pub device: DeviceSelection,
    /// Flag derivation options.
    pub options: BuildOptions,
    /// Source file, relative to the workspace.
    pub input_file: String,
}

impl ConfigSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub fn new(
        device: impl Into<DeviceSelection>,
        options: BuildOptions,
        input_file: impl Into<String>,
    ) -> Self {
        Self {
            device: device.into(),
            options,
            input_file: input_file.into(),
        }
    }

    /// Parses a snapshot from the persisted settings layout.
    pub fn from_json(json: &str) -> Result<Self, EecflowError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns a copy with a different device selection.
    #[must_use]
    pub fn with_device(mut self, device: impl Into<DeviceSelection>) -> Self {
        self.device = device.into();
        self
    }

    /// The active device, if any.
    #[must_use]
    pub fn device(&self) -> Option<&DeviceTarget> {
        self.device.device()
    }
}

/// Flat key layout used by the settings store.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedConfig {
    #[serde(rename = "targetDevice", default)]
    target_device: DeviceSelection,
    #[serde(rename = "build.presets", default)]
    presets: Preset,
    #[serde(rename = "build.optimization", default = "default_optimization")]
    optimization: String,
    #[serde(rename = "build.generateDbgInfo", default = "default_true")]
    generate_dbg_info: bool,
    #[serde(rename = "build.runtimeChecks", default = "default_true")]
    runtime_checks: bool,
    #[serde(rename = "build.inputFile", default)]
    input_file: String,
}

fn default_optimization() -> String {
    CustomOptions::default().optimization
}

const fn default_true() -> bool {
    true
}

impl From<PersistedConfig> for ConfigSnapshot {
    fn from(raw: PersistedConfig) -> Self {
        Self {
            device: raw.target_device,
            options: BuildOptions {
                preset: raw.presets,
                custom: CustomOptions {
                    optimization: raw.optimization,
                    debug_info: raw.generate_dbg_info,
                    runtime_checks: raw.runtime_checks,
                },
            },
            input_file: raw.input_file,
        }
    }
}

impl From<ConfigSnapshot> for PersistedConfig {
    fn from(snapshot: ConfigSnapshot) -> Self {
        let ConfigSnapshot {
            device,
            options,
            input_file,
        } = snapshot;
        Self {
            target_device: device,
            presets: options.preset,
            optimization: options.custom.optimization,
            generate_dbg_info: options.custom.debug_info,
            runtime_checks: options.custom.runtime_checks,
            input_file,
        }
    }
}
