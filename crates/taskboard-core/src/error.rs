use thiserror::Error;

use crate::validation::FieldErrors;

#[derive(Error, Debug)]
pub enum TaskboardError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(FieldErrors),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TaskboardError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied(message.into())
    }

    /// Status code of a failed HTTP exchange, if this error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::InvalidInput(errors) => Some(errors),
            _ => None,
        }
    }

    /// Message suitable for a status line or an alert.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error. Please try again.".to_string(),
            Self::Http { message, .. } if !message.is_empty() => message.clone(),
            Self::Http { status, .. } => format!("Request failed ({status})"),
            Self::Validation(message) => message.clone(),
            Self::InvalidInput(errors) => errors.to_string(),
            Self::PermissionDenied(message) => message.clone(),
            Self::NotAuthenticated => "Please log in first".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for TaskboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<FieldErrors> for TaskboardError {
    fn from(errors: FieldErrors) -> Self {
        Self::InvalidInput(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FormField;

    #[test]
    fn test_http_status_is_exposed() {
        let err = TaskboardError::http(404, "Board not found");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.user_message(), "Board not found");
    }

    #[test]
    fn test_http_without_message_falls_back_to_status() {
        let err = TaskboardError::http(500, "");
        assert_eq!(err.user_message(), "Request failed (500)");
    }

    #[test]
    fn test_field_errors_convert_into_invalid_input() {
        let mut errors = FieldErrors::new();
        errors.add(FormField::Title, "Task title is required");
        let err: TaskboardError = errors.into();
        assert!(err.field_errors().is_some());
        assert!(err.user_message().contains("Task title is required"));
    }
}
