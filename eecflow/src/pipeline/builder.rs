//! Pipeline builder: stage templates to invocation descriptors.

use super::bindings::{device_bindings, fallback_bindings};
use crate::config::ConfigSnapshot;
use crate::core::{InvocationDescriptor, Pipeline, PipelineMode, StageKind};
use crate::errors::{BuildError, SelectionError, TemplateError};
use crate::stages::{template, Binding, Bindings, Placeholder};
use std::path::Path;
use tracing::{debug, info};

/// Builds pipelines from a configuration snapshot.
///
/// The builder reads nothing but its inputs, so the same snapshot and roots
/// always produce the same argument lists.
#[derive(Debug, Clone, Copy)]
pub struct PipelineBuilder<'a> {
    snapshot: &'a ConfigSnapshot,
    toolchain_root: &'a Path,
    workspace: &'a Path,
}

impl<'a> PipelineBuilder<'a> {
    /// Creates a builder.
    ///
    /// `toolchain_root` is the directory holding the toolchain executables;
    /// `workspace` becomes every invocation's working directory.
    #[must_use]
    pub fn new(
        snapshot: &'a ConfigSnapshot,
        toolchain_root: &'a Path,
        workspace: &'a Path,
    ) -> Self {
        Self {
            snapshot,
            toolchain_root,
            workspace,
        }
    }

    /// Builds every stage of `mode` in order.
    ///
    /// # Errors
    ///
    /// Fails with [`SelectionError`] when no device is selected, and with a
    /// configuration or template error when paths cannot be derived. No
    /// partial pipeline is ever returned.
    pub fn build(&self, mode: PipelineMode) -> Result<Pipeline, BuildError> {
        if mode == PipelineMode::Fallback {
            return Self::fallback(self.workspace);
        }

        let device = self.snapshot.device().ok_or(SelectionError)?;
        let bindings = device_bindings(self.snapshot, device, self.toolchain_root)?;
        let invocations = instantiate_chain(mode.stages(), bindings, self.workspace)?;

        let pipeline = Pipeline::new(mode, Some(device.id.clone()), invocations);
        info!(
            build_id = %pipeline.build_id,
            mode = %mode,
            device = %device.id,
            stages = pipeline.len(),
            "Built pipeline"
        );
        Ok(pipeline)
    }

    /// Builds a single stage for the selected device.
    ///
    /// Chained stages read the same artifact paths the full pipeline would
    /// give them.
    pub fn stage(&self, kind: StageKind) -> Result<InvocationDescriptor, BuildError> {
        let device = self.snapshot.device().ok_or(SelectionError)?;
        let bindings = device_bindings(self.snapshot, device, self.toolchain_root)?;
        let mut invocations = instantiate_chain(&[kind], bindings, self.workspace)?;
        Ok(invocations.remove(0))
    }

    /// Builds the placeholder-free listing used before a device is chosen.
    pub fn fallback(workspace: &Path) -> Result<Pipeline, BuildError> {
        let invocations =
            instantiate_chain(PipelineMode::Fallback.stages(), fallback_bindings(), workspace)?;
        Ok(Pipeline::new(PipelineMode::Fallback, None, invocations))
    }
}

/// Instantiates `kinds` in order, feeding each chained stage the output its
/// predecessor declared.
fn instantiate_chain(
    kinds: &[StageKind],
    mut bindings: Bindings,
    workspace: &Path,
) -> Result<Vec<InvocationDescriptor>, TemplateError> {
    let mut invocations = Vec::with_capacity(kinds.len());
    let mut previous_output: Option<String> = None;

    for &kind in kinds {
        let template = template(kind);

        if !kind.is_entry() {
            if let (Some(input), Some(expected)) = (template.input, previous_output.take()) {
                if let Some(found) = bindings.scalar(kind, input)? {
                    if found != expected {
                        return Err(TemplateError::BrokenChain {
                            stage: kind,
                            expected,
                            found: found.to_string(),
                        });
                    }
                }
                bindings.set(input, Binding::Value(expected));
            }
        }

        let args = template.instantiate(&bindings)?;
        let input = declared(&bindings, kind, template.input)?;
        let output = declared(&bindings, kind, template.output)?;

        let mut descriptor =
            InvocationDescriptor::new(kind, args, workspace).with_group(template.group);
        if let Some(input) = input {
            descriptor = descriptor.with_input(input);
        }
        if let Some(output) = output.clone() {
            descriptor = descriptor.with_output(output);
        }

        debug!(stage = %kind, args = ?descriptor.args(), "Instantiated stage");
        invocations.push(descriptor);
        previous_output = output;
    }

    Ok(invocations)
}

fn declared(
    bindings: &Bindings,
    kind: StageKind,
    placeholder: Option<Placeholder>,
) -> Result<Option<String>, TemplateError> {
    match placeholder {
        Some(p) => Ok(bindings.scalar(kind, p)?.map(str::to_string)),
        None => Ok(None),
    }
}
