//! Typed argument templates and their bindings.

use crate::core::{ExecutableRole, StageKind, TaskGroup};
use crate::errors::TemplateError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A value resolved at build time and substituted into a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placeholder {
    /// The user's source file.
    SourceFile,
    /// The device descriptor (`targetInfo.json`).
    DeviceDescriptor,
    /// The device's instruction-set/ABI triplet.
    Triplet,
    /// Preset-derived compiler flags.
    BuildFlags,
    /// Compiler output stem (`out/<device>/output`).
    ObjectStem,
    /// Compiled object (`out/<device>/output.o`).
    ObjectFile,
    /// Linker map (`out/<device>/output.map`).
    MapFile,
    /// Linked image (`out/<device>/output.elf`).
    ElfFile,
    /// Device linker script.
    LinkerScript,
    /// Standard-library root.
    StdlibRoot,
    /// Runtime library link token.
    RuntimeLib,
    /// Packaged configuration blob.
    ConfigBlob,
    /// Packaged resource blob.
    ResourceBlob,
    /// Flashable program image.
    ProgramFile,
}

/// One token of an argument template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    /// Emitted verbatim.
    Lit(&'static str),
    /// Replaced by the binding; a list binding splices in every item.
    Slot(Placeholder),
    /// A flag followed by its single value, e.g. `-o <path>`.
    Pair(&'static str, Placeholder),
    /// A single value glued between a prefix and suffix, e.g. `-L<root>/lib`.
    Joined {
        /// Text before the value.
        prefix: &'static str,
        /// The value.
        slot: Placeholder,
        /// Text after the value.
        suffix: &'static str,
    },
}

/// The value bound to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binding {
    /// A single argument.
    Value(String),
    /// Zero or more arguments, only valid in a [`Arg::Slot`].
    List(Vec<String>),
    /// Not applicable here: the whole argument is dropped.
    Absent,
}

impl Binding {
    /// Binds an optional value, absent when `None`.
    #[must_use]
    pub fn optional(value: Option<String>) -> Self {
        value.map_or(Self::Absent, Self::Value)
    }
}

/// Placeholder values for one pipeline build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: HashMap<Placeholder, Binding>,
}

impl Bindings {
    /// Creates an empty set of bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a single value.
    #[must_use]
    pub fn value(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.values.insert(placeholder, Binding::Value(value.into()));
        self
    }

    /// Binds a list of values.
    #[must_use]
    pub fn list(mut self, placeholder: Placeholder, values: Vec<String>) -> Self {
        self.values.insert(placeholder, Binding::List(values));
        self
    }

    /// Marks a placeholder as not applicable.
    #[must_use]
    pub fn absent(mut self, placeholder: Placeholder) -> Self {
        self.values.insert(placeholder, Binding::Absent);
        self
    }

    /// Binds an arbitrary binding.
    #[must_use]
    pub fn bind(mut self, placeholder: Placeholder, binding: Binding) -> Self {
        self.values.insert(placeholder, binding);
        self
    }

    /// Overrides a binding in place.
    pub fn set(&mut self, placeholder: Placeholder, binding: Binding) {
        self.values.insert(placeholder, binding);
    }

    /// Looks up a binding.
    #[must_use]
    pub fn get(&self, placeholder: Placeholder) -> Option<&Binding> {
        self.values.get(&placeholder)
    }

    fn lookup(
        &self,
        stage: StageKind,
        placeholder: Placeholder,
    ) -> Result<&Binding, TemplateError> {
        self.values
            .get(&placeholder)
            .ok_or(TemplateError::Unbound { stage, placeholder })
    }

    /// Resolves a placeholder that must be a single value or absent.
    pub fn scalar(
        &self,
        stage: StageKind,
        placeholder: Placeholder,
    ) -> Result<Option<&str>, TemplateError> {
        match self.lookup(stage, placeholder)? {
            Binding::Value(value) => Ok(Some(value)),
            Binding::Absent => Ok(None),
            Binding::List(_) => Err(TemplateError::NotScalar { stage, placeholder }),
        }
    }
}

/// The declared shape of one pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTemplate {
    /// The stage.
    pub kind: StageKind,
    /// The executable the stage runs.
    pub role: ExecutableRole,
    /// Scheduling hint.
    pub group: TaskGroup,
    /// Argument template.
    pub args: &'static [Arg],
    /// The artifact the stage reads.
    pub input: Option<Placeholder>,
    /// The artifact the stage produces for the next stage.
    pub output: Option<Placeholder>,
}

impl StageTemplate {
    /// Substitutes every placeholder, failing on the first unbound one.
    pub fn instantiate(&self, bindings: &Bindings) -> Result<Vec<String>, TemplateError> {
        let stage = self.kind;
        let mut out = Vec::with_capacity(self.args.len());

        for arg in self.args {
            match *arg {
                Arg::Lit(text) => out.push(text.to_string()),
                Arg::Slot(placeholder) => match bindings.lookup(stage, placeholder)? {
                    Binding::Value(value) => out.push(value.clone()),
                    Binding::List(values) => out.extend(values.iter().cloned()),
                    Binding::Absent => {}
                },
                Arg::Pair(flag, placeholder) => {
                    if let Some(value) = bindings.scalar(stage, placeholder)? {
                        out.push(flag.to_string());
                        out.push(value.to_string());
                    }
                }
                Arg::Joined {
                    prefix,
                    slot,
                    suffix,
                } => {
                    if let Some(value) = bindings.scalar(stage, slot)? {
                        out.push(format!("{prefix}{value}{suffix}"));
                    }
                }
            }
        }

        Ok(out)
    }

    /// Every placeholder the template references, in argument order.
    #[must_use]
    pub fn placeholders(&self) -> Vec<Placeholder> {
        self.args
            .iter()
            .filter_map(|arg| match *arg {
                Arg::Lit(_) => None,
                Arg::Slot(p) | Arg::Pair(_, p) => Some(p),
                Arg::Joined { slot, .. } => Some(slot),
            })
            .chain(self.input)
            .chain(self.output)
            .collect()
    }
}
