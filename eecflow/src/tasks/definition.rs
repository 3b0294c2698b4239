//! User-authored task definitions.

use serde::{Deserialize, Serialize};

/// Task type handled by the provider.
pub const TASK_TYPE: &str = "eec";
/// Source label attached to provided tasks.
pub const TASK_SOURCE: &str = "eepl";

/// A task as written in the host's task file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    /// Task type; only [`TASK_TYPE`] is resolved.
    #[serde(rename = "type")]
    pub task_type: String,
    /// Stage command name, e.g. `build` or `link`.
    pub command: String,
    /// Arguments passed unchanged to the executable.
    #[serde(default)]
    pub args: Vec<String>,
    /// Working directory relative to the workspace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
}

impl TaskDefinition {
    /// Creates an `eec` task definition.
    #[must_use]
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            task_type: TASK_TYPE.to_string(),
            command: command.into(),
            args,
            cwd: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_from_task_file() {
        let def: TaskDefinition = serde_json::from_str(
            r#"{ "type": "eec", "command": "link", "args": ["a.o", "-o", "out/a.elf"] }"#,
        )
        .unwrap();

        assert_eq!(
            def,
            TaskDefinition::new("link", vec!["a.o".into(), "-o".into(), "out/a.elf".into()])
        );
    }

    #[test]
    fn test_args_default_to_empty() {
        let def: TaskDefinition =
            serde_json::from_str(r#"{ "type": "eec", "command": "flaher" }"#).unwrap();
        assert!(def.args.is_empty());
        assert_eq!(def.cwd, None);
    }
}
