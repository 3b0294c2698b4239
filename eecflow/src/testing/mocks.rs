//! Mock collaborators for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::DeviceTarget;
use crate::core::{ExecutableRole, ReadyInvocation};
use crate::errors::{EecflowError, ToolchainError};
use crate::tasks::{ConfigStore, DeviceSelector, InvocationSink, StaticConfigStore};
use crate::toolchain::Toolchain;

/// A toolchain that records executable lookups.
#[derive(Debug, Default)]
pub struct MockToolchain {
    root: Option<PathBuf>,
    missing: Vec<ExecutableRole>,
    lookups: Mutex<Vec<ExecutableRole>>,
}

impl MockToolchain {
    /// An installed toolchain rooted at `root`.
    #[must_use]
    pub fn installed(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Default::default()
        }
    }

    /// A toolchain that reports itself as not installed.
    #[must_use]
    pub fn not_installed() -> Self {
        Self::default()
    }

    /// Makes lookups for `role` fail.
    #[must_use]
    pub fn without_role(mut self, role: ExecutableRole) -> Self {
        self.missing.push(role);
        self
    }

    /// Roles looked up so far, in order.
    #[must_use]
    pub fn lookups(&self) -> Vec<ExecutableRole> {
        self.lookups.lock().clone()
    }
}

#[async_trait]
impl Toolchain for MockToolchain {
    async fn is_installed(&self) -> bool {
        self.root.is_some()
    }

    async fn root_path(&self) -> Result<PathBuf, ToolchainError> {
        self.root.clone().ok_or(ToolchainError::NotInstalled)
    }

    async fn executable_path(&self, role: ExecutableRole) -> Result<PathBuf, ToolchainError> {
        self.lookups.lock().push(role);
        if self.missing.contains(&role) {
            return Err(ToolchainError::ExecutableUnavailable {
                role,
                reason: "not provided by mock toolchain".to_string(),
            });
        }
        Ok(self.root_path().await?.join(role.file_name()))
    }
}

/// A selector that stores a scripted device when prompted.
#[derive(Debug)]
pub struct ScriptedDeviceSelector {
    store: Arc<StaticConfigStore>,
    pending: Mutex<Option<DeviceTarget>>,
    prompts: Mutex<usize>,
}

impl ScriptedDeviceSelector {
    /// Creates a selector writing into `store`. Until [`Self::will_select`]
    /// is called, prompts are dismissed.
    #[must_use]
    pub fn new(store: Arc<StaticConfigStore>) -> Self {
        Self {
            store,
            pending: Mutex::new(None),
            prompts: Mutex::new(0),
        }
    }

    /// Picks `device` on the next prompt.
    pub fn will_select(&self, device: DeviceTarget) {
        *self.pending.lock() = Some(device);
    }

    /// Number of prompts shown.
    #[must_use]
    pub fn prompts(&self) -> usize {
        *self.prompts.lock()
    }
}

#[async_trait]
impl DeviceSelector for ScriptedDeviceSelector {
    async fn select_device(&self) {
        *self.prompts.lock() += 1;
        let picked = self.pending.lock().take();
        if let Some(device) = picked {
            let snapshot = self.store.snapshot().await.with_device(device);
            self.store.replace(snapshot);
        }
    }
}

/// A sink that keeps every submitted batch.
#[derive(Debug, Default)]
pub struct RecordingSink {
    batches: Mutex<Vec<Vec<ReadyInvocation>>>,
}

impl RecordingSink {
    /// Batches received so far.
    #[must_use]
    pub fn batches(&self) -> Vec<Vec<ReadyInvocation>> {
        self.batches.lock().clone()
    }
}

#[async_trait]
impl InvocationSink for RecordingSink {
    async fn submit(&self, invocations: Vec<ReadyInvocation>) -> Result<(), EecflowError> {
        self.batches.lock().push(invocations);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceSelection;
    use crate::testing::{sample_device, sample_snapshot};

    #[tokio::test]
    async fn test_mock_toolchain_records_lookups() {
        let toolchain = MockToolchain::installed("/eec/bin").without_role(ExecutableRole::Flasher);

        assert!(toolchain.executable_path(ExecutableRole::Linker).await.is_ok());
        assert!(toolchain.executable_path(ExecutableRole::Flasher).await.is_err());
        assert_eq!(
            toolchain.lookups(),
            vec![ExecutableRole::Linker, ExecutableRole::Flasher]
        );
    }

    #[tokio::test]
    async fn test_not_installed_has_no_root() {
        let toolchain = MockToolchain::not_installed();
        assert!(!toolchain.is_installed().await);
        assert_eq!(toolchain.root_path().await, Err(ToolchainError::NotInstalled));
    }

    #[tokio::test]
    async fn test_scripted_selector_updates_store() {
        let store = Arc::new(StaticConfigStore::new(
            sample_snapshot().with_device(DeviceSelection::Unselected),
        ));
        let selector = ScriptedDeviceSelector::new(Arc::clone(&store));

        selector.select_device().await;
        assert!(!store.snapshot().await.device.is_selected());

        selector.will_select(sample_device("devC"));
        selector.select_device().await;
        assert_eq!(store.snapshot().await.device().map(|d| d.id.clone()), Some("devC".to_string()));
        assert_eq!(selector.prompts(), 2);
    }
}
