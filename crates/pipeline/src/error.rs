use sea_orm::DbErr;
use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Per-request failures. None of these are fatal; every mutation that fails
/// leaves the store untouched.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{field} {message}")]
    Validation { field: &'static str, message: String },
    #[error("lead {lead_id} is in {actual}, expected {expected}")]
    Guard {
        lead_id: i32,
        expected: String,
        actual: String,
    },
    #[error("follow-up limit of {limit} reached for lead {lead_id}")]
    Capacity { lead_id: i32, limit: usize },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },
    #[error("{role} users may not {action}")]
    Forbidden {
        role: &'static str,
        action: &'static str,
    },
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

impl PipelineError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        PipelineError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn missing(field: &'static str) -> Self {
        Self::validation(field, "is required")
    }

    pub fn guard(lead_id: i32, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        PipelineError::Guard {
            lead_id,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: i32) -> Self {
        PipelineError::NotFound { entity, id }
    }

    /// Stable machine-readable code, shared with the API layer.
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::Validation { .. } => "VALIDATION",
            PipelineError::Guard { .. } => "GUARD",
            PipelineError::Capacity { .. } => "CAPACITY",
            PipelineError::NotFound { .. } => "NOT_FOUND",
            PipelineError::Forbidden { .. } => "FORBIDDEN",
            PipelineError::Db(_) => "INTERNAL",
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            PipelineError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_the_field() {
        let err = PipelineError::missing("tank_application");
        assert_eq!(err.to_string(), "tank_application is required");
        assert_eq!(err.code(), "VALIDATION");
        assert_eq!(err.field(), Some("tank_application"));
    }

    #[test]
    fn db_errors_map_to_internal() {
        let err = PipelineError::from(DbErr::Custom("boom".into()));
        assert_eq!(err.code(), "INTERNAL");
        assert_eq!(err.field(), None);
    }
}
