//! Stage kind, executable role and task group enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of the build pipeline, ordered by pipeline position.
///
/// `Simulate` is an alternate entry stage: it reads the source file like
/// `Compile` but nothing chains after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Compile the source file to an object file.
    Compile,
    /// Compile and run the source file in the JIT simulator.
    Simulate,
    /// Link the object file into an ELF image.
    Link,
    /// Package the ELF image into a flashable program.
    Package,
    /// Flash the program onto the device.
    Flash,
}

impl StageKind {
    /// All kinds in pipeline order.
    pub const ALL: [Self; 5] = [
        Self::Compile,
        Self::Simulate,
        Self::Link,
        Self::Package,
        Self::Flash,
    ];

    /// Task command name as stored in task definitions.
    ///
    /// `flaher` is the persisted spelling and must not be corrected.
    #[must_use]
    pub const fn command(self) -> &'static str {
        match self {
            Self::Compile => "build",
            Self::Simulate => "simulate",
            Self::Link => "link",
            Self::Package => "ebuild",
            Self::Flash => "flaher",
        }
    }

    /// Human-readable task name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Compile => "Build for Device",
            Self::Simulate => "Run Simulator",
            Self::Link => "linker",
            Self::Package => "buildAELF",
            Self::Flash => "EEmbFlasher",
        }
    }

    /// Looks a kind up by its task command name.
    #[must_use]
    pub fn from_command(command: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.command() == command)
    }

    /// The executable role this stage runs.
    #[must_use]
    pub const fn role(self) -> ExecutableRole {
        match self {
            Self::Compile | Self::Simulate => ExecutableRole::Compiler,
            Self::Link => ExecutableRole::Linker,
            Self::Package => ExecutableRole::Packager,
            Self::Flash => ExecutableRole::Flasher,
        }
    }

    /// Returns true if the stage reads the user's source file directly.
    #[must_use]
    pub const fn is_entry(self) -> bool {
        matches!(self, Self::Compile | Self::Simulate)
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compile => write!(f, "compile"),
            Self::Simulate => write!(f, "simulate"),
            Self::Link => write!(f, "link"),
            Self::Package => write!(f, "package"),
            Self::Flash => write!(f, "flash"),
        }
    }
}

/// A logical executable, resolved to a binary by toolchain discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutableRole {
    /// The `eec` compiler.
    Compiler,
    /// The `ld.lld` linker.
    Linker,
    /// The `ebuild` packager.
    Packager,
    /// The `eflash` flasher.
    Flasher,
}

impl ExecutableRole {
    /// Executable base name without platform suffix.
    #[must_use]
    pub const fn base_name(self) -> &'static str {
        match self {
            Self::Compiler => "eec",
            Self::Linker => "ld.lld",
            Self::Packager => "ebuild",
            Self::Flasher => "eflash",
        }
    }

    /// Executable file name on the current platform.
    #[must_use]
    pub fn file_name(self) -> String {
        if cfg!(windows) {
            format!("{}.exe", self.base_name())
        } else {
            self.base_name().to_string()
        }
    }
}

impl fmt::Display for ExecutableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compiler => write!(f, "compiler"),
            Self::Linker => write!(f, "linker"),
            Self::Packager => write!(f, "packager"),
            Self::Flasher => write!(f, "flasher"),
        }
    }
}

/// Scheduling hint for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskGroup {
    /// The task is the workspace's build task.
    Build,
    /// No grouping.
    #[default]
    None,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_kind_display() {
        assert_eq!(StageKind::Compile.to_string(), "compile");
        assert_eq!(StageKind::Package.to_string(), "package");
        assert_eq!(StageKind::Flash.to_string(), "flash");
    }

    #[test]
    fn test_command_names_round_trip() {
        for kind in StageKind::ALL {
            assert_eq!(StageKind::from_command(kind.command()), Some(kind));
        }
        assert_eq!(StageKind::from_command("flaher"), Some(StageKind::Flash));
        assert_eq!(StageKind::from_command("flash"), None);
    }

    #[test]
    fn test_role_mapping() {
        assert_eq!(StageKind::Compile.role(), ExecutableRole::Compiler);
        assert_eq!(StageKind::Simulate.role(), ExecutableRole::Compiler);
        assert_eq!(StageKind::Link.role(), ExecutableRole::Linker);
        assert_eq!(StageKind::Package.role(), ExecutableRole::Packager);
        assert_eq!(StageKind::Flash.role(), ExecutableRole::Flasher);
    }

    #[test]
    fn test_stage_kinds_are_ordered() {
        let mut sorted = StageKind::ALL;
        sorted.sort();
        assert_eq!(sorted, StageKind::ALL);
        assert!(StageKind::Link < StageKind::Package);
    }

    #[test]
    fn test_executable_file_name() {
        let name = ExecutableRole::Linker.file_name();
        if cfg!(windows) {
            assert_eq!(name, "ld.lld.exe");
        } else {
            assert_eq!(name, "ld.lld");
        }
    }

    #[test]
    fn test_stage_kind_serialize() {
        let json = serde_json::to_string(&StageKind::Simulate).unwrap();
        assert_eq!(json, r#""simulate""#);
    }
}
