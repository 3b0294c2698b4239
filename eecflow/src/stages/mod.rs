//! Stage templates and the stage definition table.
//!
//! A stage template is a typed argument list: literals, placeholders and the
//! artifacts the stage reads and writes. Templates are pure data; the
//! pipeline builder binds placeholders and instantiates them.

mod table;
mod template;

pub use table::{template, STAGE_TABLE};
pub use template::{Arg, Binding, Bindings, Placeholder, StageTemplate};
