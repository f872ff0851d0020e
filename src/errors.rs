//! Unified application error type.
//! All modules (storage, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Validation (client input)
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid recurrence pattern: {0}")]
    InvalidRecurrence(String),

    #[error("Family not found: {0}")]
    FamilyNotFound(String),

    #[error("Family member not found: {0}")]
    MemberNotFound(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    // ---------------------------
    // Lookups
    // ---------------------------
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    // ---------------------------
    // Persistence
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl AppError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        AppError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Validation and not-found errors are caused by the caller's input and
    /// must not be retried; everything else is a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidDate(_)
                | AppError::InvalidRecurrence(_)
                | AppError::FamilyNotFound(_)
                | AppError::MemberNotFound(_)
                | AppError::MissingField(_)
                | AppError::InvalidPayload(_)
                | AppError::NotFound { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_and_lookup_errors_are_client_errors() {
        assert!(AppError::InvalidDate("x".into()).is_client_error());
        assert!(AppError::not_found("reminder", "rem9").is_client_error());
        assert!(AppError::MemberNotFound("Zed".into()).is_client_error());
    }

    #[test]
    fn persistence_errors_are_server_errors() {
        let io = AppError::from(io::Error::other("disk full"));
        assert!(!io.is_client_error());
        assert!(!AppError::Storage("locked".into()).is_client_error());
    }

    #[test]
    fn not_found_message_names_kind_and_id() {
        let e = AppError::not_found("family", "fam3");
        assert_eq!(e.to_string(), "family not found: fam3");
        assert!(e.is_not_found());
    }
}
