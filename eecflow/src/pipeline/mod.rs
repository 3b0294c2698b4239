//! Pipeline construction.
//!
//! This module provides:
//! - Placeholder bindings for a selected device and for the fallback listing
//! - The pipeline builder that instantiates the stage table in order

mod bindings;
mod builder;

pub use bindings::{FALLBACK_LINKER_SCRIPT, FALLBACK_SOURCE, FALLBACK_TRIPLET};
pub use builder::PipelineBuilder;
