//! Path resolution from device metadata and the toolchain root.
//!
//! Artifact names and the `out/<device>/` layout are shared with other tools
//! that read the build tree, so they are reproduced exactly.

use crate::config::DeviceTarget;
use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Trailing segment of a device descriptor path.
pub const DESCRIPTOR_FILE: &str = "targetInfo.json";
/// Linker script expected next to the device descriptor.
pub const LINKER_SCRIPT_FILE: &str = "target_out.ld";
/// Trailing segment of the toolchain root.
pub const TOOLCHAIN_BIN_DIR: &str = "bin";
/// Root of all build output, relative to the workspace.
pub const OUTPUT_ROOT: &str = "out";

/// Stem the compiler appends `.o` to.
pub const OBJECT_STEM: &str = "output";
/// Compiled object file.
pub const OBJECT_FILE: &str = "output.o";
/// Linker map file.
pub const MAP_FILE: &str = "output.map";
/// Linked image.
pub const ELF_FILE: &str = "output.elf";
/// Packaged configuration blob.
pub const CONFIG_BLOB: &str = "output_CFG.bin";
/// Packaged resource blob.
pub const RESOURCE_BLOB: &str = "output_RES.bin";
/// Flashable program image.
pub const PROGRAM_FILE: &str = "prog.alf";

/// Paths derived for one device and toolchain installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPaths {
    /// Linker script next to the device descriptor.
    pub linker_script: String,
    /// Standard-library root passed as the linker sysroot.
    pub stdlib_root: String,
    /// Per-device output directory, relative to the workspace.
    pub output_dir: String,
    /// `-l<runtime>` when the device names a runtime library.
    pub runtime_lib: Option<String>,
}

impl ResolvedPaths {
    /// Derives all paths for `device`.
    ///
    /// Fails if the descriptor path does not end in [`DESCRIPTOR_FILE`], the
    /// toolchain root does not end in [`TOOLCHAIN_BIN_DIR`], or the device id
    /// cannot name a directory.
    pub fn resolve(
        toolchain_root: &Path,
        device: &DeviceTarget,
    ) -> Result<Self, ConfigurationError> {
        let linker_script =
            replace_trailing_segment(&device.descriptor_path, DESCRIPTOR_FILE, LINKER_SCRIPT_FILE)?;

        let stdlib = format!("lib/{}/std/picolib", device.stdlib);
        let stdlib_root = replace_trailing_segment(
            &toolchain_root.to_string_lossy(),
            TOOLCHAIN_BIN_DIR,
            &stdlib,
        )?;

        Ok(Self {
            linker_script,
            stdlib_root,
            output_dir: device_output_dir(&device.id)?,
            runtime_lib: runtime_link_token(device),
        })
    }

    /// Library search directory under the stdlib root.
    #[must_use]
    pub fn stdlib_lib_dir(&self) -> String {
        format!("{}/lib", self.stdlib_root)
    }

    /// Path of an artifact inside the output directory.
    #[must_use]
    pub fn artifact(&self, file: &str) -> String {
        format!("{}/{file}", self.output_dir)
    }
}

/// The output directory for a device: `out/<id>`.
pub fn device_output_dir(id: &str) -> Result<String, ConfigurationError> {
    let reason = if id.is_empty() {
        Some("is empty")
    } else if id.contains(['/', '\\']) {
        Some("contains a path separator")
    } else if id == "." || id == ".." {
        Some("is a relative path component")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigurationError::InvalidDeviceId {
            id: id.to_string(),
            reason,
        }),
        None => Ok(format!("{OUTPUT_ROOT}/{id}")),
    }
}

/// `-l<runtime>` for devices that name a runtime library.
#[must_use]
pub fn runtime_link_token(device: &DeviceTarget) -> Option<String> {
    device
        .runtime
        .as_deref()
        .filter(|runtime| !runtime.is_empty())
        .map(|runtime| format!("-l{runtime}"))
}

/// Replaces the trailing `marker` segment of `path` with `replacement`.
///
/// Separators already present in `path` are kept; the joined segment uses
/// `/`.
fn replace_trailing_segment(
    path: &str,
    marker: &'static str,
    replacement: &str,
) -> Result<String, ConfigurationError> {
    let is_separator = |c: char| c == '/' || c == '\\';
    let missing = || ConfigurationError::MissingSegment {
        path: path.to_string(),
        marker,
    };

    let trimmed = path.trim_end_matches(is_separator);
    let prefix = trimmed.strip_suffix(marker).ok_or_else(missing)?;

    if prefix.is_empty() {
        return Ok(replacement.to_string());
    }
    if !prefix.ends_with(is_separator) {
        return Err(missing());
    }

    let base = prefix.trim_end_matches(is_separator);
    Ok(format!("{base}/{replacement}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn device() -> DeviceTarget {
        DeviceTarget::new(
            "Nordic nRF52",
            "nrf52",
            "thumbv7em-none-none-eabi",
            "/sdk/devices/nrf52/targetInfo.json",
            "v7em",
        )
    }

    #[test]
    fn test_resolve_device_paths() {
        let paths = ResolvedPaths::resolve(&PathBuf::from("/home/u/.eec/bin"), &device()).unwrap();

        assert_eq!(paths.linker_script, "/sdk/devices/nrf52/target_out.ld");
        assert_eq!(paths.stdlib_root, "/home/u/.eec/lib/v7em/std/picolib");
        assert_eq!(paths.stdlib_lib_dir(), "/home/u/.eec/lib/v7em/std/picolib/lib");
        assert_eq!(paths.output_dir, "out/nrf52");
        assert_eq!(paths.runtime_lib, None);
    }

    #[test]
    fn test_artifacts_nest_under_output_dir() {
        let paths = ResolvedPaths::resolve(&PathBuf::from("/eec/bin"), &device()).unwrap();
        for file in [OBJECT_FILE, MAP_FILE, ELF_FILE, CONFIG_BLOB, RESOURCE_BLOB, PROGRAM_FILE] {
            assert!(paths.artifact(file).starts_with("out/nrf52/"));
        }
        assert_eq!(paths.artifact(OBJECT_FILE), "out/nrf52/output.o");
    }

    #[test]
    fn test_runtime_token_present_only_when_configured() {
        let with_runtime = device().with_runtime("rt7M_tl");
        assert_eq!(runtime_link_token(&with_runtime).as_deref(), Some("-lrt7M_tl"));
        assert_eq!(runtime_link_token(&device()), None);
    }

    #[test]
    fn test_windows_separators_are_accepted() {
        let mut dev = device();
        dev.descriptor_path = r"C:\sdk\devices\nrf52\targetInfo.json".to_string();
        let paths = ResolvedPaths::resolve(&PathBuf::from(r"C:\eec\bin\"), &dev).unwrap();

        assert_eq!(paths.linker_script, r"C:\sdk\devices\nrf52/target_out.ld");
        assert_eq!(paths.stdlib_root, r"C:\eec/lib/v7em/std/picolib");
    }

    #[test]
    fn test_missing_descriptor_marker_fails() {
        let mut dev = device();
        dev.descriptor_path = "/sdk/devices/nrf52/device.json".to_string();
        let err = ResolvedPaths::resolve(&PathBuf::from("/eec/bin"), &dev).unwrap_err();

        assert_eq!(
            err,
            ConfigurationError::MissingSegment {
                path: "/sdk/devices/nrf52/device.json".to_string(),
                marker: DESCRIPTOR_FILE,
            }
        );
    }

    #[test]
    fn test_missing_bin_marker_fails() {
        let err = ResolvedPaths::resolve(&PathBuf::from("/opt/eec"), &device()).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingSegment { marker: "bin", .. }));
    }

    #[test]
    fn test_marker_must_be_whole_segment() {
        let err = ResolvedPaths::resolve(&PathBuf::from("/opt/eecbin"), &device()).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingSegment { .. }));
    }

    #[test]
    fn test_invalid_device_ids() {
        assert!(device_output_dir("").is_err());
        assert!(device_output_dir("a/b").is_err());
        assert!(device_output_dir("..").is_err());
        assert_eq!(device_output_dir("devA").unwrap(), "out/devA");
    }
}
