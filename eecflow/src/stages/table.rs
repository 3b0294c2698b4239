//! The stage definition table.
//!
//! This is the only place the shape of the pipeline is written down. Both the
//! per-device pipeline and the fallback listing instantiate these templates.

use super::template::{Arg, Placeholder, StageTemplate};
use crate::core::{ExecutableRole, StageKind, TaskGroup};

use Placeholder as P;

const COMPILE_ARGS: &[Arg] = &[
    Arg::Slot(P::SourceFile),
    Arg::Pair("-target", P::DeviceDescriptor),
    Arg::Pair("-triplet", P::Triplet),
    Arg::Lit("-S"),
    Arg::Lit("-emit-llvm"),
    Arg::Slot(P::BuildFlags),
    Arg::Pair("-o", P::ObjectStem),
];

const SIMULATE_ARGS: &[Arg] = &[
    Arg::Slot(P::SourceFile),
    Arg::Pair("-target", P::DeviceDescriptor),
    Arg::Lit("-jit"),
    Arg::Lit("-S"),
    Arg::Lit("-emit-llvm"),
    Arg::Slot(P::BuildFlags),
    Arg::Pair("-o", P::ObjectStem),
];

const LINK_ARGS: &[Arg] = &[
    Arg::Slot(P::ObjectFile),
    Arg::Joined {
        prefix: "--sysroot=",
        slot: P::StdlibRoot,
        suffix: "",
    },
    Arg::Joined {
        prefix: "-L",
        slot: P::StdlibRoot,
        suffix: "/lib",
    },
    Arg::Lit("-lc"),
    Arg::Lit("-lm"),
    Arg::Slot(P::RuntimeLib),
    Arg::Lit("--format=elf"),
    Arg::Joined {
        prefix: "--Map=",
        slot: P::MapFile,
        suffix: "",
    },
    Arg::Slot(P::LinkerScript),
    Arg::Pair("-o", P::ElfFile),
    Arg::Lit("-nostdlib"),
];

const PACKAGE_ARGS: &[Arg] = &[
    Arg::Pair("-f", P::ElfFile),
    Arg::Pair("-o", P::ProgramFile),
    Arg::Pair("-m", P::MapFile),
    Arg::Pair("-c", P::ConfigBlob),
    Arg::Pair("-r", P::ResourceBlob),
];

const FLASH_ARGS: &[Arg] = &[Arg::Slot(P::ProgramFile)];

/// One template per [`StageKind`], in [`StageKind::ALL`] order.
pub static STAGE_TABLE: [StageTemplate; 5] = [
    StageTemplate {
        kind: StageKind::Compile,
        role: ExecutableRole::Compiler,
        group: TaskGroup::Build,
        args: COMPILE_ARGS,
        input: Some(P::SourceFile),
        output: Some(P::ObjectFile),
    },
    StageTemplate {
        kind: StageKind::Simulate,
        role: ExecutableRole::Compiler,
        group: TaskGroup::None,
        args: SIMULATE_ARGS,
        input: Some(P::SourceFile),
        output: None,
    },
    StageTemplate {
        kind: StageKind::Link,
        role: ExecutableRole::Linker,
        group: TaskGroup::None,
        args: LINK_ARGS,
        input: Some(P::ObjectFile),
        output: Some(P::ElfFile),
    },
    StageTemplate {
        kind: StageKind::Package,
        role: ExecutableRole::Packager,
        group: TaskGroup::None,
        args: PACKAGE_ARGS,
        input: Some(P::ElfFile),
        output: Some(P::ProgramFile),
    },
    StageTemplate {
        kind: StageKind::Flash,
        role: ExecutableRole::Flasher,
        group: TaskGroup::None,
        args: FLASH_ARGS,
        input: Some(P::ProgramFile),
        output: None,
    },
];

/// Looks up the template for a stage.
#[must_use]
pub fn template(kind: StageKind) -> &'static StageTemplate {
    // Table order matches `StageKind` declaration order.
    &STAGE_TABLE[kind as usize]
}
