//! Sample configuration.

use crate::config::{BuildOptions, ConfigSnapshot, DeviceTarget};

/// Triplet used by [`sample_device`].
pub const SAMPLE_TRIPLET: &str = "thumbv7m-none-none-eabi";

/// A Cortex-M3 style device with descriptor `/sdk/devices/<id>/targetInfo.json`.
#[must_use]
pub fn sample_device(id: &str) -> DeviceTarget {
    DeviceTarget::new(
        format!("Device {id}"),
        id,
        SAMPLE_TRIPLET,
        format!("/sdk/devices/{id}/targetInfo.json"),
        "v7m",
    )
}

/// `devA` selected, Debug preset, `main.es` as input.
#[must_use]
pub fn sample_snapshot() -> ConfigSnapshot {
    ConfigSnapshot::new(sample_device("devA"), BuildOptions::default(), "main.es")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::ResolvedPaths;
    use std::path::Path;

    #[test]
    fn test_sample_device_resolves() {
        let paths = ResolvedPaths::resolve(Path::new("/eec/bin"), &sample_device("devA"));
        assert!(paths.is_ok());
    }

    #[test]
    fn test_sample_snapshot_is_selected() {
        assert_eq!(sample_snapshot().device().map(|d| d.id.as_str()), Some("devA"));
    }
}
