//! Typed error handling for the estately platform
//!
//! Every failure that can cross the HTTP boundary is modelled here so that
//! clients can handle errors by kind rather than by parsing messages.
//!
//! # Error Categories
//!
//! - [`PropertyError`]: property CRUD failures
//! - [`ScheduleError`]: viewing-schedule failures
//! - [`ValidationError`]: malformed or missing fields in a payload
//! - [`AuthError`]: guard failures (authentication and authorization)
//! - [`UploadError`]: image upload rejections and storage faults
//! - [`ConfigError`]: configuration parsing and IO
//!
//! # Example
//!
//! ```rust,ignore
//! match store.get(&id).await {
//!     Ok(property) => println!("{}", property.title),
//!     Err(EstateError::Property(PropertyError::NotFound { id })) => {
//!         println!("property {} not found", id);
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::model::schedule::ScheduleStatus;

/// The main error type for the estately platform
///
/// Each variant wraps a more specific error type for that category.
#[derive(Debug)]
pub enum EstateError {
    /// Property CRUD errors
    Property(PropertyError),

    /// Viewing-schedule errors
    Schedule(ScheduleError),

    /// Payload validation errors
    Validation(ValidationError),

    /// Guard errors (authentication/authorization)
    Auth(AuthError),

    /// Image upload errors
    Upload(UploadError),

    /// Configuration errors
    Config(ConfigError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for EstateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstateError::Property(e) => write!(f, "{}", e),
            EstateError::Schedule(e) => write!(f, "{}", e),
            EstateError::Validation(e) => write!(f, "{}", e),
            EstateError::Auth(e) => write!(f, "{}", e),
            EstateError::Upload(e) => write!(f, "{}", e),
            EstateError::Config(e) => write!(f, "{}", e),
            EstateError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for EstateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EstateError::Property(e) => Some(e),
            EstateError::Schedule(e) => Some(e),
            EstateError::Validation(e) => Some(e),
            EstateError::Auth(e) => Some(e),
            EstateError::Upload(e) => Some(e),
            EstateError::Config(e) => Some(e),
            EstateError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl EstateError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            EstateError::Property(e) => e.status_code(),
            EstateError::Schedule(e) => e.status_code(),
            EstateError::Validation(_) => StatusCode::BAD_REQUEST,
            EstateError::Auth(e) => e.status_code(),
            EstateError::Upload(e) => e.status_code(),
            EstateError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            EstateError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            EstateError::Property(e) => e.error_code(),
            EstateError::Schedule(e) => e.error_code(),
            EstateError::Validation(_) => "VALIDATION_ERROR",
            EstateError::Auth(e) => e.error_code(),
            EstateError::Upload(e) => e.error_code(),
            EstateError::Config(_) => "CONFIG_ERROR",
            EstateError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            EstateError::Property(PropertyError::NotFound { id }) => {
                Some(serde_json::json!({ "id": id.to_string() }))
            }
            EstateError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            EstateError::Upload(UploadError::TooManyImages { count, max }) => {
                Some(serde_json::json!({ "count": count, "max": max }))
            }
            EstateError::Schedule(ScheduleError::InvalidTransition { from, to }) => {
                Some(serde_json::json!({
                    "from": from.as_str(),
                    "to": to.as_str()
                }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for EstateError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Property Errors
// =============================================================================

/// Errors related to property CRUD operations
#[derive(Debug)]
pub enum PropertyError {
    /// No property exists with this id
    NotFound { id: Uuid },

    /// Property operation failed
    OperationFailed { operation: String, message: String },
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyError::NotFound { id } => {
                write!(f, "property with id '{}' not found", id)
            }
            PropertyError::OperationFailed { operation, message } => {
                write!(f, "failed to {} property: {}", operation, message)
            }
        }
    }
}

impl std::error::Error for PropertyError {}

impl PropertyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PropertyError::NotFound { .. } => StatusCode::NOT_FOUND,
            PropertyError::OperationFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            PropertyError::NotFound { .. } => "PROPERTY_NOT_FOUND",
            PropertyError::OperationFailed { .. } => "PROPERTY_OPERATION_FAILED",
        }
    }
}

impl From<PropertyError> for EstateError {
    fn from(err: PropertyError) -> Self {
        EstateError::Property(err)
    }
}

// =============================================================================
// Schedule Errors
// =============================================================================

/// Errors related to viewing schedules
#[derive(Debug)]
pub enum ScheduleError {
    /// No schedule exists with this id
    NotFound { id: Uuid },

    /// Status transition not permitted
    InvalidTransition {
        from: ScheduleStatus,
        to: ScheduleStatus,
    },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::NotFound { id } => {
                write!(f, "schedule with id '{}' not found", id)
            }
            ScheduleError::InvalidTransition { from, to } => {
                write!(
                    f,
                    "schedule cannot move from '{}' to '{}'",
                    from.as_str(),
                    to.as_str()
                )
            }
        }
    }
}

impl std::error::Error for ScheduleError {}

impl ScheduleError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ScheduleError::NotFound { .. } => StatusCode::NOT_FOUND,
            ScheduleError::InvalidTransition { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ScheduleError::NotFound { .. } => "SCHEDULE_NOT_FOUND",
            ScheduleError::InvalidTransition { .. } => "SCHEDULE_INVALID_TRANSITION",
        }
    }
}

impl From<ScheduleError> for EstateError {
    fn from(err: ScheduleError) -> Self {
        EstateError::Schedule(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to payload validation
#[derive(Debug)]
pub enum ValidationError {
    /// One or more fields violated their constraints
    FieldErrors(Vec<FieldViolation>),

    /// Invalid JSON format
    InvalidJson { message: String },
}

/// A single field constraint violation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "validation errors: {}", msgs.join(", "))
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "invalid JSON: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for EstateError {
    fn from(err: ValidationError) -> Self {
        EstateError::Validation(err)
    }
}

// =============================================================================
// Auth Errors
// =============================================================================

/// Errors raised by the access guard
#[derive(Debug)]
pub enum AuthError {
    /// Missing, unknown, or expired credential
    Unauthorized { message: String },

    /// Authenticated but role not in the route's allow-list
    Forbidden { message: String },
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Unauthorized { message } => write!(f, "unauthorized: {}", message),
            AuthError::Forbidden { message } => write!(f, "forbidden: {}", message),
        }
    }
}

impl std::error::Error for AuthError {}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden { .. } => StatusCode::FORBIDDEN,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Unauthorized { .. } => "UNAUTHORIZED",
            AuthError::Forbidden { .. } => "FORBIDDEN",
        }
    }
}

impl From<AuthError> for EstateError {
    fn from(err: AuthError) -> Self {
        EstateError::Auth(err)
    }
}

// =============================================================================
// Upload Errors
// =============================================================================

/// Errors related to image uploads
#[derive(Debug)]
pub enum UploadError {
    /// More images attached than the per-property limit
    TooManyImages { count: usize, max: usize },

    /// An attached file is not an image
    NotAnImage {
        file_name: String,
        content_type: String,
    },

    /// The multipart body could not be read
    MalformedBody { message: String },

    /// Persisting a file to storage failed
    Storage { message: String },
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::TooManyImages { count, max } => {
                write!(f, "{} images attached, at most {} allowed", count, max)
            }
            UploadError::NotAnImage {
                file_name,
                content_type,
            } => {
                write!(f, "file '{}' is not an image ({})", file_name, content_type)
            }
            UploadError::MalformedBody { message } => {
                write!(f, "malformed upload body: {}", message)
            }
            UploadError::Storage { message } => {
                write!(f, "file storage error: {}", message)
            }
        }
    }
}

impl std::error::Error for UploadError {}

impl UploadError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UploadError::TooManyImages { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::NotAnImage { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::MalformedBody { .. } => StatusCode::BAD_REQUEST,
            UploadError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            UploadError::TooManyImages { .. } => "TOO_MANY_IMAGES",
            UploadError::NotAnImage { .. } => "NOT_AN_IMAGE",
            UploadError::MalformedBody { .. } => "MALFORMED_UPLOAD",
            UploadError::Storage { .. } => "UPLOAD_STORAGE_ERROR",
        }
    }
}

impl From<UploadError> for EstateError {
    fn from(err: UploadError) -> Self {
        EstateError::Upload(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "failed to parse config: {}", message)
                }
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for EstateError {
    fn from(err: ConfigError) -> Self {
        EstateError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for EstateError {
    fn from(err: serde_json::Error) -> Self {
        EstateError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for EstateError {
    fn from(err: std::io::Error) -> Self {
        EstateError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for EstateError {
    fn from(err: serde_yaml::Error) -> Self {
        EstateError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for estately operations
pub type EstateResult<T> = Result<T, EstateError>;

// =============================================================================
// Tests
// =============================================================================
