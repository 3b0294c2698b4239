//! Preset resolution: build options to compiler flags.

use crate::config::{BuildOptions, Preset};

/// Emit debug info.
pub const DEBUG_INFO: &str = "-g";
/// No optimization.
pub const NO_OPTIMIZATION: &str = "-O0";
/// Highest optimization.
pub const MAX_OPTIMIZATION: &str = "-O3";
/// Disable runtime checks.
pub const DISABLE_RUNTIME_CHECKS: &str = "-drtc";

/// Resolves build options to an ordered list of compiler flags.
///
/// Every named preset maps to a fixed list. An unrecognized preset resolves
/// to no flags, leaving the compiler on its defaults.
pub fn resolve_flags(options: &BuildOptions) -> Vec<String> {
    let flags: Vec<&str> = match &options.preset {
        Preset::Debug => vec![DEBUG_INFO, NO_OPTIMIZATION],
        Preset::OptimizedDebug => vec![DEBUG_INFO, MAX_OPTIMIZATION],
        Preset::Release => vec![MAX_OPTIMIZATION, DISABLE_RUNTIME_CHECKS],
        Preset::SafeRelease => vec![MAX_OPTIMIZATION],
        Preset::Custom => {
            let custom = &options.custom;
            let mut flags = Vec::with_capacity(3);
            let level = custom.optimization.trim();
            if !level.is_empty() {
                flags.push(level);
            }
            if custom.debug_info {
                flags.push(DEBUG_INFO);
            }
            if !custom.runtime_checks {
                flags.push(DISABLE_RUNTIME_CHECKS);
            }
            flags
        }
        Preset::Unrecognized(name) => {
            tracing::warn!(preset = %name, "Unrecognized build preset, using compiler defaults");
            Vec::new()
        }
    };

    flags.into_iter().map(str::to_string).collect()
}
