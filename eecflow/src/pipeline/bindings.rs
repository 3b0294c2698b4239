//! Placeholder bindings for the device pipeline and the fallback listing.

use crate::config::{ConfigSnapshot, DeviceTarget};
use crate::errors::ConfigurationError;
use crate::paths::{
    ResolvedPaths, CONFIG_BLOB, ELF_FILE, MAP_FILE, OBJECT_FILE, OBJECT_STEM, OUTPUT_ROOT,
    PROGRAM_FILE, RESOURCE_BLOB,
};
use crate::presets::{resolve_flags, DEBUG_INFO, MAX_OPTIMIZATION};
use crate::stages::{Binding, Bindings, Placeholder as P};
use std::path::Path;

/// Source file listed before any project configuration exists.
pub const FALLBACK_SOURCE: &str = "PackageInfo.es";
/// Triplet listed before any device is chosen.
pub const FALLBACK_TRIPLET: &str = "thumbv7m-none-none-eabi";
/// Linker script listed before any device is chosen.
pub const FALLBACK_LINKER_SCRIPT: &str = "out/target.ld";

/// Binds every placeholder for a selected device.
pub(crate) fn device_bindings(
    snapshot: &ConfigSnapshot,
    device: &DeviceTarget,
    toolchain_root: &Path,
) -> Result<Bindings, ConfigurationError> {
    if snapshot.input_file.trim().is_empty() {
        return Err(ConfigurationError::MissingInputFile);
    }

    let paths = ResolvedPaths::resolve(toolchain_root, device)?;

    Ok(artifact_bindings(|file| paths.artifact(file))
        .value(P::SourceFile, snapshot.input_file.as_str())
        .value(P::DeviceDescriptor, device.descriptor_path.as_str())
        .value(P::Triplet, device.triplet.as_str())
        .list(P::BuildFlags, resolve_flags(&snapshot.options))
        .value(P::LinkerScript, paths.linker_script.as_str())
        .value(P::StdlibRoot, paths.stdlib_root.as_str())
        .bind(P::RuntimeLib, Binding::optional(paths.runtime_lib)))
}

/// Fixed bindings for the listing shown before a device is chosen.
pub(crate) fn fallback_bindings() -> Bindings {
    artifact_bindings(|file| format!("{OUTPUT_ROOT}/{file}"))
        .value(P::SourceFile, FALLBACK_SOURCE)
        .absent(P::DeviceDescriptor)
        .value(P::Triplet, FALLBACK_TRIPLET)
        .list(
            P::BuildFlags,
            vec![DEBUG_INFO.to_string(), MAX_OPTIMIZATION.to_string()],
        )
        .value(P::LinkerScript, FALLBACK_LINKER_SCRIPT)
        .absent(P::StdlibRoot)
        .absent(P::RuntimeLib)
}

fn artifact_bindings(artifact: impl Fn(&str) -> String) -> Bindings {
    Bindings::new()
        .value(P::ObjectStem, artifact(OBJECT_STEM))
        .value(P::ObjectFile, artifact(OBJECT_FILE))
        .value(P::MapFile, artifact(MAP_FILE))
        .value(P::ElfFile, artifact(ELF_FILE))
        .value(P::ConfigBlob, artifact(CONFIG_BLOB))
        .value(P::ResourceBlob, artifact(RESOURCE_BLOB))
        .value(P::ProgramFile, artifact(PROGRAM_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildOptions, Preset};
    use crate::stages::STAGE_TABLE;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn device() -> DeviceTarget {
        DeviceTarget::new(
            "Dev A",
            "devA",
            "thumbv7m-none-none-eabi",
            "/sdk/devA/targetInfo.json",
            "v7m",
        )
    }

    #[test]
    fn test_device_bindings_cover_every_table_placeholder() {
        let snapshot =
            ConfigSnapshot::new(device(), BuildOptions::preset(Preset::Debug), "main.es");
        let bindings = device_bindings(&snapshot, &device(), &PathBuf::from("/eec/bin")).unwrap();

        for template in &STAGE_TABLE {
            for placeholder in template.placeholders() {
                assert!(bindings.get(placeholder).is_some(), "{placeholder:?} unbound");
            }
        }
    }

    #[test]
    fn test_fallback_bindings_cover_every_table_placeholder() {
        let bindings = fallback_bindings();
        for template in &STAGE_TABLE {
            for placeholder in template.placeholders() {
                assert!(bindings.get(placeholder).is_some(), "{placeholder:?} unbound");
            }
        }
    }

    #[test]
    fn test_missing_input_file_is_rejected() {
        let snapshot = ConfigSnapshot::new(device(), BuildOptions::default(), " ");
        let err = device_bindings(&snapshot, &device(), &PathBuf::from("/eec/bin")).unwrap_err();
        assert_eq!(err, ConfigurationError::MissingInputFile);
    }

    #[test]
    fn test_flags_are_bound_as_list() {
        let snapshot =
            ConfigSnapshot::new(device(), BuildOptions::preset(Preset::Release), "main.es");
        let bindings = device_bindings(&snapshot, &device(), &PathBuf::from("/eec/bin")).unwrap();
        assert_eq!(
            bindings.get(P::BuildFlags),
            Some(&Binding::List(vec!["-O3".to_string(), "-drtc".to_string()]))
        );
    }
}
