//! Scoped acquisition of output directories.

use crate::core::{DirStatus, OutputDirectory};
use crate::errors::ResourceError;
use std::io;
use std::path::{Path, PathBuf};

/// Outcome of making sure an output directory exists.
#[derive(Debug)]
pub enum DirectoryAcquisition {
    /// The directory was already present.
    Exists(PathBuf),
    /// The directory was created.
    Created(PathBuf),
    /// The directory could not be acquired.
    Failed {
        /// The directory that was requested.
        path: PathBuf,
        /// Why acquisition failed.
        source: io::Error,
    },
}

impl DirectoryAcquisition {
    /// Returns true unless acquisition failed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Converts to a result, turning failures into [`ResourceError`].
    pub fn into_result(self) -> Result<OutputDirectory, ResourceError> {
        match self {
            Self::Exists(path) => Ok(OutputDirectory {
                path,
                status: DirStatus::Exists,
            }),
            Self::Created(path) => Ok(OutputDirectory {
                path,
                status: DirStatus::Created,
            }),
            Self::Failed { path, source } => Err(ResourceError::new(path, source)),
        }
    }
}

/// Checks for `path` and creates it (with parents) when missing.
///
/// A directory that appears between the check and the create counts as
/// [`DirectoryAcquisition::Exists`]. Any other failure is reported, never
/// retried.
pub async fn acquire_output_dir(path: &Path) -> DirectoryAcquisition {
    let path = path.to_path_buf();

    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_dir() => DirectoryAcquisition::Exists(path),
        Ok(_) => DirectoryAcquisition::Failed {
            path,
            source: io::Error::other("path exists and is not a directory"),
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            match tokio::fs::create_dir_all(&path).await {
                Ok(()) => DirectoryAcquisition::Created(path),
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    DirectoryAcquisition::Exists(path)
                }
                Err(source) => DirectoryAcquisition::Failed { path, source },
            }
        }
        Err(source) => DirectoryAcquisition::Failed { path, source },
    }
}
