//! Domain errors shared by every bounded context.

use std::fmt;

/// Domain-level errors that can occur in business logic.
///
/// These errors are independent of infrastructure concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid value for a field.
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Entity not found.
    NotFound {
        /// Entity type.
        entity_type: String,
        /// Entity identifier.
        id: String,
    },

    /// Caller is not allowed to perform the action.
    Forbidden {
        /// Action attempted.
        action: String,
        /// Error message shown to the caller.
        message: String,
    },

    /// Operation conflicts with the current state of the entity.
    Conflict {
        /// Entity type.
        entity_type: String,
        /// Description of the conflict.
        message: String,
    },

    /// Persistence adapter failed.
    Storage {
        /// Error message.
        message: String,
    },
}

impl DomainError {
    /// Shorthand for a not-found error.
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Shorthand for an invalid field value.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { field, message } => {
                write!(f, "Invalid value for {field}: {message}")
            }
            Self::NotFound { entity_type, id } => {
                write!(f, "{entity_type} not found: {id}")
            }
            Self::Forbidden { message, .. } => write!(f, "{message}"),
            Self::Conflict {
                entity_type,
                message,
            } => write!(f, "{entity_type} conflict: {message}"),
            Self::Storage { message } => write!(f, "Storage error: {message}"),
        }
    }
}

impl std::error::Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_not_found() {
        let err = DomainError::not_found("Mission", "m-1");
        assert_eq!(err.to_string(), "Mission not found: m-1");
    }

    #[test]
    fn display_forbidden_is_caller_message() {
        let err = DomainError::Forbidden {
            action: "delete_comment".to_string(),
            message: "권한이 없습니다.".to_string(),
        };
        assert_eq!(err.to_string(), "권한이 없습니다.");
    }

    #[test]
    fn display_invalid_value() {
        let err = DomainError::invalid("title", "must not be blank");
        assert_eq!(err.to_string(), "Invalid value for title: must not be blank");
    }
}
