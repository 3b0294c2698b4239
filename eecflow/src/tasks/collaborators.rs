//! Host-side collaborators the task provider depends on.

use super::definition::TASK_SOURCE;
use crate::config::ConfigSnapshot;
use crate::core::ReadyInvocation;
use crate::errors::EecflowError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::fmt::Debug;
use tracing::{debug, info, Level};

/// Read-only access to the host's settings.
#[async_trait]
pub trait ConfigStore: Send + Sync + Debug {
    /// Captures the current configuration.
    async fn snapshot(&self) -> ConfigSnapshot;
}

/// Prompts the user to choose a device.
///
/// The provider treats this as an opaque recovery step and re-reads the
/// configuration once afterwards.
#[async_trait]
pub trait DeviceSelector: Send + Sync + Debug {
    /// Asks the user to select a device.
    async fn select_device(&self);
}

/// Receives ready invocations; the host runs them.
#[async_trait]
pub trait InvocationSink: Send + Sync {
    /// Accepts an ordered sequence of invocations.
    async fn submit(&self, invocations: Vec<ReadyInvocation>) -> Result<(), EecflowError>;
}

/// A config store holding a replaceable snapshot.
#[derive(Debug, Default)]
pub struct StaticConfigStore {
    snapshot: RwLock<ConfigSnapshot>,
}

impl StaticConfigStore {
    /// Creates a store holding `snapshot`.
    #[must_use]
    pub fn new(snapshot: ConfigSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
        }
    }

    /// Replaces the stored snapshot.
    pub fn replace(&self, snapshot: ConfigSnapshot) {
        *self.snapshot.write() = snapshot;
    }
}

#[async_trait]
impl ConfigStore for StaticConfigStore {
    async fn snapshot(&self) -> ConfigSnapshot {
        self.snapshot.read().clone()
    }
}

/// A selector for hosts that cannot prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPromptSelector;

#[async_trait]
impl DeviceSelector for NoPromptSelector {
    async fn select_device(&self) {
        debug!("Device selection requested but no prompt is available");
    }
}

/// A sink that logs each invocation's command line.
#[derive(Debug, Clone)]
pub struct LoggingInvocationSink {
    level: Level,
}

impl Default for LoggingInvocationSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingInvocationSink {
    /// Creates a sink logging at `level`.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

#[async_trait]
impl InvocationSink for LoggingInvocationSink {
    async fn submit(&self, invocations: Vec<ReadyInvocation>) -> Result<(), EecflowError> {
        for invocation in &invocations {
            let name = invocation.descriptor.name();
            let command = invocation.command_line().join(" ");
            if self.level == Level::DEBUG {
                debug!(source = TASK_SOURCE, task = %name, %command, "Task ready");
            } else {
                info!(source = TASK_SOURCE, task = %name, %command, "Task ready");
            }
        }
        Ok(())
    }
}
