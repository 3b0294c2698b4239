//! Host-facing task provider.
//!
//! [`TaskProvider`] ties the pipeline builder and materializer to the host's
//! collaborators: a [`ConfigStore`] for settings, a [`DeviceSelector`] to
//! recover from a missing device, and an [`InvocationSink`] that runs what
//! the provider produces.

mod collaborators;
mod definition;
mod provider;

pub use collaborators::{
    ConfigStore, DeviceSelector, InvocationSink, LoggingInvocationSink, NoPromptSelector,
    StaticConfigStore,
};
pub use definition::{TaskDefinition, TASK_SOURCE, TASK_TYPE};
pub use provider::TaskProvider;
