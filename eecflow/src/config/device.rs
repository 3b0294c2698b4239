//! Target device metadata and selection state.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Description persisted while no device has been chosen.
pub const UNSELECTED_DESCRIPTION: &str = "[Device]";

/// The embedded hardware profile the pipeline compiles for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTarget {
    /// Display name.
    #[serde(rename = "description")]
    pub name: String,
    /// Unique identifier, also the output directory name.
    #[serde(rename = "devName")]
    pub id: String,
    /// Instruction-set/ABI triplet passed to the compiler.
    pub triplet: String,
    /// Path to the device descriptor (`.../targetInfo.json`).
    #[serde(rename = "pathToFile")]
    pub descriptor_path: String,
    /// Standard-library variant name.
    pub stdlib: String,
    /// Runtime library linked as `-l<runtime>`, if any.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        serialize_with = "none_as_empty"
    )]
    pub runtime: Option<String>,
}

impl DeviceTarget {
    /// Creates a device with no runtime library.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        triplet: impl Into<String>,
        descriptor_path: impl Into<String>,
        stdlib: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            triplet: triplet.into(),
            descriptor_path: descriptor_path.into(),
            stdlib: stdlib.into(),
            runtime: None,
        }
    }

    /// Sets the runtime library name.
    #[must_use]
    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        let runtime = runtime.into();
        self.runtime = (!runtime.is_empty()).then_some(runtime);
        self
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

#[allow(clippy::ref_option)]
fn none_as_empty<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or_default())
}

/// Which device, if any, is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "Option<PersistedDevice>", into = "Option<DeviceTarget>")]
pub enum DeviceSelection {
    /// No device chosen yet; pipeline construction is blocked.
    #[default]
    Unselected,
    /// A device is active.
    Selected(DeviceTarget),
}

impl DeviceSelection {
    /// Returns the active device, if any.
    #[must_use]
    pub fn device(&self) -> Option<&DeviceTarget> {
        match self {
            Self::Unselected => None,
            Self::Selected(device) => Some(device),
        }
    }

    /// Returns true if a device is active.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected(_))
    }
}

impl From<DeviceTarget> for DeviceSelection {
    fn from(device: DeviceTarget) -> Self {
        Self::Selected(device)
    }
}

impl From<Option<DeviceTarget>> for DeviceSelection {
    fn from(device: Option<DeviceTarget>) -> Self {
        match device {
            Some(device) if device.name != UNSELECTED_DESCRIPTION => Self::Selected(device),
            _ => Self::Unselected,
        }
    }
}

/// `targetDevice` as persisted. The unselected placeholder may carry only a
/// description, so every field is optional until the sentinel is ruled out.
#[derive(Debug, Default, Deserialize)]
struct PersistedDevice {
    #[serde(default)]
    description: String,
    #[serde(rename = "devName")]
    dev_name: Option<String>,
    triplet: Option<String>,
    #[serde(rename = "pathToFile")]
    path_to_file: Option<String>,
    stdlib: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    runtime: Option<String>,
}

impl TryFrom<Option<PersistedDevice>> for DeviceSelection {
    type Error = String;

    fn try_from(raw: Option<PersistedDevice>) -> Result<Self, Self::Error> {
        let Some(raw) = raw else {
            return Ok(Self::Unselected);
        };
        if raw.description == UNSELECTED_DESCRIPTION {
            return Ok(Self::Unselected);
        }

        let required = |value: Option<String>, key: &str| {
            value.ok_or_else(|| format!("targetDevice is missing `{key}`"))
        };
        Ok(Self::Selected(DeviceTarget {
            id: required(raw.dev_name, "devName")?,
            triplet: required(raw.triplet, "triplet")?,
            descriptor_path: required(raw.path_to_file, "pathToFile")?,
            stdlib: required(raw.stdlib, "stdlib")?,
            runtime: raw.runtime,
            name: raw.description,
        }))
    }
}

impl From<DeviceSelection> for Option<DeviceTarget> {
    fn from(selection: DeviceSelection) -> Self {
        match selection {
            DeviceSelection::Unselected => None,
            DeviceSelection::Selected(device) => Some(device),
        }
    }
}
