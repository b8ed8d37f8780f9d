use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PipelineError, PipelineResult};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Marketing,
    Sales,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Marketing => "marketing",
            Role::Sales => "sales",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "marketing" => Some(Role::Marketing),
            "sales" => Some(Role::Sales),
            _ => None,
        }
    }
}

/// Authenticated caller, supplied by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn marketing(id: Uuid) -> Self {
        Self::new(id, Role::Marketing)
    }

    pub fn sales(id: Uuid) -> Self {
        Self::new(id, Role::Sales)
    }

    pub fn require(&self, role: Role, action: &'static str) -> PipelineResult<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(PipelineError::Forbidden {
                role: self.role.as_str(),
                action,
            })
        }
    }

    /// Value written to `created_by` / `changed_by` audit columns.
    pub(crate) fn stamp(&self) -> Option<String> {
        Some(self.id.to_string())
    }
}
