//! Build presets and custom compiler options.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named bundle of compiler flags.
///
/// Names outside the known set are kept as [`Preset::Unrecognized`] so they
/// survive a round trip and resolve to no flags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Preset {
    /// Debug info, no optimization.
    #[default]
    Debug,
    /// Debug info, full optimization.
    OptimizedDebug,
    /// Full optimization, runtime checks disabled.
    Release,
    /// Full optimization, runtime checks kept.
    SafeRelease,
    /// Flags taken from [`CustomOptions`].
    Custom,
    /// A preset name this version does not know.
    Unrecognized(String),
}

impl Preset {
    /// The persisted name of the preset.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Debug => "Debug",
            Self::OptimizedDebug => "OpDebug",
            Self::Release => "Release",
            Self::SafeRelease => "Safe Release",
            Self::Custom => "Custom",
            Self::Unrecognized(name) => name,
        }
    }
}

impl From<String> for Preset {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Debug" => Self::Debug,
            "OpDebug" => Self::OptimizedDebug,
            "Release" => Self::Release,
            "Safe Release" => Self::SafeRelease,
            "Custom" => Self::Custom,
            _ => Self::Unrecognized(name),
        }
    }
}

impl From<&str> for Preset {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<Preset> for String {
    fn from(preset: Preset) -> Self {
        preset.as_str().to_string()
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Individually chosen options used by [`Preset::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomOptions {
    /// Optimization level token, e.g. `-O1`.
    pub optimization: String,
    /// Emit debug info.
    pub debug_info: bool,
    /// Keep runtime checks.
    pub runtime_checks: bool,
}

impl Default for CustomOptions {
    fn default() -> Self {
        Self {
            optimization: "-O0".to_string(),
            debug_info: true,
            runtime_checks: true,
        }
    }
}

/// The options flags are derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BuildOptions {
    /// The selected preset.
    pub preset: Preset,
    /// Options consulted only for [`Preset::Custom`].
    #[serde(default)]
    pub custom: CustomOptions,
}

impl BuildOptions {
    /// Creates options for a named preset.
    #[must_use]
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            custom: CustomOptions::default(),
        }
    }

    /// Creates custom options.
    #[must_use]
    pub fn custom(optimization: impl Into<String>, debug_info: bool, runtime_checks: bool) -> Self {
        Self {
            preset: Preset::Custom,
            custom: CustomOptions {
                optimization: optimization.into(),
                debug_info,
                runtime_checks,
            },
        }
    }
}
