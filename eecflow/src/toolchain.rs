//! Toolchain discovery seam.
//!
//! Locating the toolchain on disk belongs to the host. The core only asks
//! whether it is installed, where its executables live, and, once per
//! materialization, which binary plays a role.

use crate::core::ExecutableRole;
use crate::errors::{BuildError, ConfigurationError, ToolchainError};
use async_trait::async_trait;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// Environment variable naming the toolchain installation.
pub const EEC_HOME_ENV: &str = "EEC_HOME";
/// Default installation directory under the user's home.
pub const DEFAULT_INSTALL_DIR: &str = ".eec";

/// Trait for toolchain discovery.
#[async_trait]
pub trait Toolchain: Send + Sync + Debug {
    /// Returns true if the toolchain is installed.
    async fn is_installed(&self) -> bool;

    /// The directory holding the toolchain executables.
    async fn root_path(&self) -> Result<PathBuf, ToolchainError>;

    /// The executable for a role.
    ///
    /// Defaults to the role's file name inside [`Toolchain::root_path`].
    async fn executable_path(&self, role: ExecutableRole) -> Result<PathBuf, ToolchainError> {
        Ok(self.root_path().await?.join(role.file_name()))
    }
}

/// Resolves the root a pipeline is built against.
///
/// A missing installation fails as [`ToolchainError::NotInstalled`] before
/// anything else is looked at. An installed toolchain whose root cannot be
/// resolved is a configuration problem.
pub async fn resolve_root(toolchain: &dyn Toolchain) -> Result<PathBuf, BuildError> {
    if !toolchain.is_installed().await {
        return Err(ToolchainError::NotInstalled.into());
    }
    match toolchain.root_path().await {
        Ok(root) => Ok(root),
        Err(ToolchainError::RootUnavailable { reason }) => {
            Err(ConfigurationError::ToolchainRoot { reason }.into())
        }
        Err(err) => Err(err.into()),
    }
}

/// A toolchain installed in a fixed `bin` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallDirToolchain {
    bin_dir: PathBuf,
}

impl InstallDirToolchain {
    /// Creates a toolchain rooted at `bin_dir`.
    #[must_use]
    pub fn new(bin_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin_dir: bin_dir.into(),
        }
    }

    /// Locates the installation from `EEC_HOME`, falling back to `~/.eec`.
    pub fn from_env() -> Result<Self, ToolchainError> {
        if let Some(home) = std::env::var_os(EEC_HOME_ENV) {
            return Ok(Self::new(PathBuf::from(home).join("bin")));
        }

        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .ok_or_else(|| ToolchainError::RootUnavailable {
                reason: "no home directory".to_string(),
            })?;

        Ok(Self::new(PathBuf::from(home).join(DEFAULT_INSTALL_DIR).join("bin")))
    }

    /// The configured `bin` directory.
    #[must_use]
    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }
}

#[async_trait]
impl Toolchain for InstallDirToolchain {
    async fn is_installed(&self) -> bool {
        let compiler = self.bin_dir.join(ExecutableRole::Compiler.file_name());
        tokio::fs::metadata(&compiler)
            .await
            .is_ok_and(|meta| meta.is_file())
    }

    async fn root_path(&self) -> Result<PathBuf, ToolchainError> {
        match tokio::fs::metadata(&self.bin_dir).await {
            Ok(meta) if meta.is_dir() => Ok(self.bin_dir.clone()),
            Ok(_) => Err(ToolchainError::RootUnavailable {
                reason: format!("'{}' is not a directory", self.bin_dir.display()),
            }),
            Err(err) => Err(ToolchainError::RootUnavailable {
                reason: format!("'{}': {err}", self.bin_dir.display()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_installed_when_compiler_present() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("bin");
        tokio::fs::create_dir(&bin).await.unwrap();

        let toolchain = InstallDirToolchain::new(&bin);
        assert!(!toolchain.is_installed().await);

        tokio::fs::write(bin.join(ExecutableRole::Compiler.file_name()), b"")
            .await
            .unwrap();
        assert!(toolchain.is_installed().await);
    }

    #[tokio::test]
    async fn test_executable_path_joins_role() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = InstallDirToolchain::new(dir.path());

        let linker = toolchain.executable_path(ExecutableRole::Linker).await.unwrap();
        assert_eq!(linker, dir.path().join(ExecutableRole::Linker.file_name()));
    }

    #[derive(Debug)]
    struct RootlessToolchain;

    #[async_trait]
    impl Toolchain for RootlessToolchain {
        async fn is_installed(&self) -> bool {
            true
        }

        async fn root_path(&self) -> Result<PathBuf, ToolchainError> {
            Err(ToolchainError::RootUnavailable {
                reason: "install dir moved".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_resolve_root_checks_installation_first() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = InstallDirToolchain::new(dir.path().join("bin"));

        let err = resolve_root(&toolchain).await.unwrap_err();
        assert_eq!(err, BuildError::Toolchain(ToolchainError::NotInstalled));
    }

    #[tokio::test]
    async fn test_unresolvable_root_is_configuration_error() {
        let err = resolve_root(&RootlessToolchain).await.unwrap_err();
        assert_eq!(
            err,
            BuildError::Configuration(ConfigurationError::ToolchainRoot {
                reason: "install dir moved".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_resolve_root_of_installed_toolchain() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("bin");
        tokio::fs::create_dir(&bin).await.unwrap();
        tokio::fs::write(bin.join(ExecutableRole::Compiler.file_name()), b"")
            .await
            .unwrap();

        assert_eq!(resolve_root(&InstallDirToolchain::new(&bin)).await.unwrap(), bin);
    }

    #[tokio::test]
    async fn test_missing_root_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = InstallDirToolchain::new(dir.path().join("missing"));

        let err = toolchain.root_path().await.unwrap_err();
        assert!(matches!(err, ToolchainError::RootUnavailable { .. }));
        assert!(toolchain.executable_path(ExecutableRole::Flasher).await.is_err());
    }
}
