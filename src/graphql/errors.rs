use async_graphql::*;

/// Error codes for structured error handling. Every failure a resolver can
/// surface maps to one of these; nothing else reaches clients.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ErrorCode {
    /// Request carries no authenticated user (401-equivalent)
    Unauthenticated,
    /// Resource not found (404-equivalent)
    NotFound,
    /// Malformed argument, e.g. an unparseable identifier (400-equivalent)
    InvalidArgument,
    /// Any database or runtime failure (500-equivalent)
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unauthenticated => "UNAUTHENTICATED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Structured error builder for consistent error handling
pub struct StructuredError;

impl StructuredError {
    /// Create an "unauthenticated" error
    pub fn unauthenticated() -> Error {
        Error::new("Authentication required").extend_with(|_, e| {
            e.set("code", ErrorCode::Unauthenticated.as_str());
        })
    }

    /// Create a "not found" error
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Error {
        Error::new(format!("{} with id '{}' not found", resource, id)).extend_with(|_, e| {
            e.set("code", ErrorCode::NotFound.as_str());
            e.set("resource", resource);
        })
    }

    /// Create an "invalid argument" error naming the offending value
    pub fn invalid_argument(field: &str, value: impl std::fmt::Display) -> Error {
        Error::new(format!("Invalid {}: {}", field, value)).extend_with(|_, e| {
            e.set("code", ErrorCode::InvalidArgument.as_str());
            e.set("field", field);
        })
    }

    /// Create an "internal" error. The cause is logged here and never
    /// included in the client-facing message.
    pub fn internal(operation: &'static str, cause: impl std::fmt::Display) -> Error {
        tracing::error!(operation, error = %cause, "operation failed");
        Error::new(format!("{} failed", operation)).extend_with(|_, e| {
            e.set("code", ErrorCode::Internal.as_str());
        })
    }
}
