//! Qualified feature type names.

use serde::{Deserialize, Serialize};

use crate::{WfsError, WfsResult};

/// A feature type addressed as `workspace:name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeName {
    pub workspace: String,
    pub name: String,
}

impl TypeName {
    pub fn new(workspace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            name: name.into(),
        }
    }

    /// Parse a compound type name like "topp:states".
    pub fn parse(s: &str) -> WfsResult<Self> {
        match s.split_once(':') {
            Some((workspace, name)) if !workspace.is_empty() && !name.is_empty() => {
                Ok(Self::new(workspace, name))
            }
            _ => Err(WfsError::Config(format!(
                "type name '{}' must have the form workspace:name",
                s
            ))),
        }
    }
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.workspace, self.name)
    }
}
