//! Error types and handling for `checklist_rust`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Supports `anyhow` integration for wrapped one-off errors
//! - Provides recovery hints for user-facing errors
//! - Provides structured JSON output for non-interactive callers

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `checklist_rust` operations.
#[derive(Error, Debug)]
pub enum ChecklistError {
    // === Storage Errors ===
    /// `SQLite` database error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // === Lookup Errors ===
    /// Issue with the specified ID was not found.
    #[error("Issue not found: {id}")]
    IssueNotFound { id: String },

    /// Checklist item with the specified ID was not found.
    #[error("Checklist item not found: {id}")]
    ChecklistNotFound { id: i64 },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Multiple validation errors occurred.
    #[error("Validation errors: {errors:?}")]
    ValidationErrors { errors: Vec<ValidationError> },

    // === Permission Errors ===
    /// Permission name not recognized.
    #[error("Unknown permission: {name}")]
    UnknownPermission { name: String },

    /// Actor lacks the permission required for the operation.
    #[error("Permission denied: {user} lacks {permission}")]
    PermissionDenied { user: String, permission: String },

    // === Configuration Errors ===
    /// Configuration file or value error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Checklist workspace not initialized.
    #[error("Workspace not initialized: run 'ckl init' first")]
    NotInitialized,

    /// Already initialized.
    #[error("Already initialized at '{path}'")]
    AlreadyInitialized { path: PathBuf },

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // === Wrapped errors ===
    /// Wrapped anyhow error for one-off failures.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A single field validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// The reason for the validation failure.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl ChecklistError {
    /// Can the user fix this without code changes?
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotInitialized
                | Self::IssueNotFound { .. }
                | Self::ChecklistNotFound { .. }
                | Self::Validation { .. }
                | Self::ValidationErrors { .. }
                | Self::UnknownPermission { .. }
                | Self::PermissionDenied { .. }
        )
    }

    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run: ckl init"),
            Self::AlreadyInitialized { .. } => Some("Use --force to reinitialize"),
            Self::IssueNotFound { .. } => Some("List known issues with: ckl issue list"),
            Self::ChecklistNotFound { .. } => Some("List items with: ckl list <issue>"),
            Self::UnknownPermission { .. } => {
                Some("Valid permissions: view_checklists, edit_checklists, edit_own_checklists")
            }
            Self::PermissionDenied { .. } => {
                Some("Grant access via config: ckl config set perm.<project>.<user> <permissions>")
            }
            _ => None,
        }
    }

    /// Stable machine-readable code for structured output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Database(_) => "database",
            Self::IssueNotFound { .. } => "issue_not_found",
            Self::ChecklistNotFound { .. } => "checklist_not_found",
            Self::Validation { .. } | Self::ValidationErrors { .. } => "validation",
            Self::UnknownPermission { .. } => "unknown_permission",
            Self::PermissionDenied { .. } => "permission_denied",
            Self::Config(_) => "config",
            Self::NotInitialized => "not_initialized",
            Self::AlreadyInitialized { .. } => "already_initialized",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Yaml(_) => "yaml",
            Self::Other(_) => "other",
        }
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        1
    }

    /// Structured JSON payload for non-interactive callers.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let mut error = serde_json::json!({
            "code": self.code(),
            "message": self.to_string(),
        });
        if let Some(suggestion) = self.suggestion() {
            error["suggestion"] = serde_json::Value::String(suggestion.to_string());
        }
        if let Self::ValidationErrors { errors } = self {
            error["fields"] = serde_json::Value::Array(
                errors
                    .iter()
                    .map(|e| {
                        serde_json::json!({ "field": e.field, "message": e.message })
                    })
                    .collect(),
            );
        }
        serde_json::json!({ "error": error })
    }

    /// Create a validation error for a specific field.
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create from multiple validation errors.
    #[must_use]
    pub fn from_validation_errors(errors: Vec<ValidationError>) -> Self {
        if errors.len() == 1 {
            let err = &errors[0];
            Self::Validation {
                field: err.field.clone(),
                reason: err.message.clone(),
            }
        } else {
            Self::ValidationErrors { errors }
        }
    }
}

/// Result type using `ChecklistError`.
pub type Result<T> = std::result::Result<T, ChecklistError>;
