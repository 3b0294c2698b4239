//! Error types for eecflow.
//!
//! The taxonomy follows the phases of a pipeline request: device selection,
//! toolchain discovery, path derivation, template substitution and output
//! directory acquisition. Every error can describe itself as an [`ErrorInfo`]
//! so the host can surface one actionable message instead of a raw system
//! error.

use crate::core::{ExecutableRole, StageKind};
use crate::stages::Placeholder;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for eecflow operations.
#[derive(Debug, Error)]
pub enum EecflowError {
    /// No device is selected.
    #[error("{0}")]
    Selection(#[from] SelectionError),

    /// The toolchain is missing or unusable.
    #[error("{0}")]
    Toolchain(#[from] ToolchainError),

    /// A configured path or identifier is malformed.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// A stage template could not be instantiated.
    #[error("{0}")]
    Template(#[from] TemplateError),

    /// An output directory could not be acquired.
    #[error("{0}")]
    Resource(#[from] ResourceError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl EecflowError {
    /// Returns the structured description of this error.
    #[must_use]
    pub fn error_info(&self) -> ErrorInfo {
        match self {
            Self::Selection(err) => err.error_info(),
            Self::Toolchain(err) => err.error_info(),
            Self::Configuration(err) => err.error_info(),
            Self::Template(err) => err.error_info(),
            Self::Resource(err) => err.error_info(),
            Self::Serialization(msg) => ErrorInfo::new("EEC-CONFIG-PARSE", msg.clone())
                .with_fix_hint("Check the configuration file for malformed JSON."),
        }
    }

    /// Returns a single-line message suitable for showing to a user.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.error_info().user_message()
    }
}

impl From<serde_json::Error> for EecflowError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<BuildError> for EecflowError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::Selection(e) => Self::Selection(e),
            BuildError::Toolchain(e) => Self::Toolchain(e),
            BuildError::Configuration(e) => Self::Configuration(e),
            BuildError::Template(e) => Self::Template(e),
        }
    }
}

impl From<MaterializeError> for EecflowError {
    fn from(err: MaterializeError) -> Self {
        match err {
            MaterializeError::Toolchain(e) => Self::Toolchain(e),
            MaterializeError::Resource(e) => Self::Resource(e),
        }
    }
}

/// Structured error description for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ErrorInfo {
    /// Error code (e.g., "EEC-SELECT-NONE").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Returns the hint when present, otherwise the summary.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.fix_hint.clone().unwrap_or_else(|| self.summary.clone())
    }
}

/// Raised when no target device is active and the selection prompt did not
/// resolve one.
#[derive(Debug, Clone, PartialEq, Eq, Error, Default)]
#[error("No target device selected")]
pub struct SelectionError;

impl SelectionError {
    /// Returns the structured description of this error.
    #[must_use]
    pub fn error_info(&self) -> ErrorInfo {
        ErrorInfo::new("EEC-SELECT-NONE", self.to_string())
            .with_fix_hint("Select a target device before building.")
    }
}

/// Errors reported while locating the toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolchainError {
    /// Discovery reports that no toolchain is installed.
    #[error("The eec toolchain is not installed")]
    NotInstalled,

    /// The installation root could not be determined.
    #[error("Toolchain root unavailable: {reason}")]
    RootUnavailable {
        /// Why the root is unavailable.
        reason: String,
    },

    /// An executable for a role could not be located.
    #[error("Executable for {role} unavailable: {reason}")]
    ExecutableUnavailable {
        /// The role that could not be resolved.
        role: ExecutableRole,
        /// Why the lookup failed.
        reason: String,
    },
}

impl ToolchainError {
    /// Returns the structured description of this error.
    #[must_use]
    pub fn error_info(&self) -> ErrorInfo {
        let code = match self {
            Self::NotInstalled => "EEC-TOOLCHAIN-MISSING",
            Self::RootUnavailable { .. } => "EEC-TOOLCHAIN-ROOT",
            Self::ExecutableUnavailable { .. } => "EEC-TOOLCHAIN-EXE",
        };
        ErrorInfo::new(code, self.to_string()).with_fix_hint(
            "Install the eec toolchain or point EEC_HOME at an existing installation.",
        )
    }
}

/// Errors raised while deriving paths from device metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A path does not end in the segment derivation relies on.
    #[error("Path '{path}' does not end with '{marker}'")]
    MissingSegment {
        /// The offending path.
        path: String,
        /// The trailing segment that was expected.
        marker: &'static str,
    },

    /// The device id cannot name an output directory.
    #[error("Invalid device id '{id}': {reason}")]
    InvalidDeviceId {
        /// The offending id.
        id: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// No input source file is configured.
    #[error("No input source file configured")]
    MissingInputFile,

    /// The toolchain is installed but its root cannot be resolved.
    #[error("Toolchain root cannot be resolved: {reason}")]
    ToolchainRoot {
        /// Why resolution failed.
        reason: String,
    },
}

impl ConfigurationError {
    /// Returns the structured description of this error.
    #[must_use]
    pub fn error_info(&self) -> ErrorInfo {
        match self {
            Self::MissingSegment { marker, .. } => {
                ErrorInfo::new("EEC-CONFIG-PATH", self.to_string()).with_fix_hint(format!(
                    "Check the device and toolchain installation: \
                     expected a path ending in '{marker}'."
                ))
            }
            Self::InvalidDeviceId { .. } => ErrorInfo::new("EEC-CONFIG-DEVICE", self.to_string())
                .with_fix_hint("Re-select the target device; its id must be a plain name."),
            Self::MissingInputFile => ErrorInfo::new("EEC-CONFIG-INPUT", self.to_string())
                .with_fix_hint("Set build.inputFile to the source file to compile."),
            Self::ToolchainRoot { .. } => {
                ErrorInfo::new("EEC-CONFIG-TOOLCHAIN", self.to_string())
                    .with_fix_hint("Point EEC_HOME at the toolchain installation directory.")
            }
        }
    }
}

/// Errors raised while instantiating stage templates.
///
/// These indicate a defect in the stage table or its bindings rather than in
/// user configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A placeholder has no binding.
    #[error("Stage '{stage}' references unbound placeholder {placeholder:?}")]
    Unbound {
        /// The stage being instantiated.
        stage: StageKind,
        /// The missing placeholder.
        placeholder: Placeholder,
    },

    /// A list binding was used where a single value is required.
    #[error("Stage '{stage}' needs a single value for {placeholder:?}")]
    NotScalar {
        /// The stage being instantiated.
        stage: StageKind,
        /// The offending placeholder.
        placeholder: Placeholder,
    },

    /// A stage does not read the artifact its predecessor declared.
    #[error("Stage '{stage}' reads '{found}' but the previous stage produces '{expected}'")]
    BrokenChain {
        /// The stage whose input disagrees.
        stage: StageKind,
        /// The previous stage's declared output.
        expected: String,
        /// This stage's declared input.
        found: String,
    },
}

impl TemplateError {
    /// Returns the structured description of this error.
    #[must_use]
    pub fn error_info(&self) -> ErrorInfo {
        let code = match self {
            Self::Unbound { .. } => "EEC-TEMPLATE-UNBOUND",
            Self::NotScalar { .. } => "EEC-TEMPLATE-SCALAR",
            Self::BrokenChain { .. } => "EEC-TEMPLATE-CHAIN",
        };
        ErrorInfo::new(code, self.to_string())
    }
}

/// Raised when an output directory cannot be acquired.
#[derive(Debug, Error)]
#[error("Cannot prepare output directory '{}': {source}", path.display())]
pub struct ResourceError {
    /// The directory that could not be acquired.
    pub path: PathBuf,
    /// The underlying failure.
    #[source]
    pub source: std::io::Error,
}

impl ResourceError {
    /// Creates a new resource error.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }

    /// Returns the structured description of this error.
    #[must_use]
    pub fn error_info(&self) -> ErrorInfo {
        ErrorInfo::new("EEC-RESOURCE-DIR", self.to_string())
            .with_fix_hint("Check that the workspace output folder is writable.")
    }
}

/// Errors that abort pipeline construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// No device is selected.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// The toolchain is unusable.
    #[error(transparent)]
    Toolchain(#[from] ToolchainError),

    /// Path derivation failed.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Template instantiation failed.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl BuildError {
    /// Returns the structured description of this error.
    #[must_use]
    pub fn error_info(&self) -> ErrorInfo {
        match self {
            Self::Selection(e) => e.error_info(),
            Self::Toolchain(e) => e.error_info(),
            Self::Configuration(e) => e.error_info(),
            Self::Template(e) => e.error_info(),
        }
    }
}

/// Errors that abort materialization of an invocation.
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// The executable could not be located.
    #[error(transparent)]
    Toolchain(#[from] ToolchainError),

    /// The output directory could not be acquired.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_selection_error_is_actionable() {
        let err = EecflowError::from(SelectionError);
        assert_eq!(err.user_message(), "Select a target device before building.");
        assert_eq!(err.error_info().code, "EEC-SELECT-NONE");
    }

    #[test]
    fn test_build_error_converts_per_variant() {
        let err: EecflowError = BuildError::from(ToolchainError::NotInstalled).into();
        assert!(matches!(err, EecflowError::Toolchain(ToolchainError::NotInstalled)));

        let err: EecflowError = BuildError::from(ConfigurationError::MissingInputFile).into();
        assert_eq!(err.error_info().code, "EEC-CONFIG-INPUT");
    }

    #[test]
    fn test_toolchain_root_is_configuration_error() {
        let err = ConfigurationError::ToolchainRoot {
            reason: "no home directory".to_string(),
        };
        assert_eq!(err.error_info().code, "EEC-CONFIG-TOOLCHAIN");
        assert!(err.to_string().ends_with("no home directory"));
    }

    #[test]
    fn test_missing_segment_message() {
        let err = ConfigurationError::MissingSegment {
            path: "/opt/eec".to_string(),
            marker: "bin",
        };
        assert_eq!(err.to_string(), "Path '/opt/eec' does not end with 'bin'");
        assert!(err.error_info().user_message().contains("'bin'"));
    }

    #[test]
    fn test_resource_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ResourceError::new("/ws/out/dev", io);
        assert_eq!(err.source.kind(), std::io::ErrorKind::PermissionDenied);
        assert!(err.to_string().contains("/ws/out/dev"));
        assert_eq!(err.error_info().code, "EEC-RESOURCE-DIR");
    }

    #[test]
    fn test_error_info_without_hint_falls_back_to_summary() {
        let info = ErrorInfo::new("X", "summary");
        assert_eq!(info.user_message(), "summary");
    }
}
