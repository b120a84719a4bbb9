//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses with a status code table and their own envelope.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No product matches the supplied identifier, or it is inactive where an
    /// active product is required.
    ProductNotFound,
    /// A stock reduction asked for more units than are available.
    InsufficientStock,
    /// The request failed input validation.
    ValidationError,
    /// A backing service (database, cache) is unreachable.
    ServiceUnavailable,
    /// An unexpected failure occurred inside the service.
    InternalServerError,
}

impl ErrorCode {
    /// Wire representation, e.g. `PRODUCT_NOT_FOUND`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::InsufficientStock => "INSUFFICIENT_STOCK",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain error payload.
///
/// `details` carries one human-readable line per violated constraint and is
/// only populated for [`ErrorCode::ValidationError`].
///
/// # Examples
/// ```
/// use product_service::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("Product not found with UUID: abc");
/// assert_eq!(err.code(), ErrorCode::ProductNotFound);
/// assert!(err.details().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    details: Vec<String>,
}

/// Message attached to every validation failure; specifics go in `details`.
pub const VALIDATION_MESSAGE: &str = "Invalid input data";

impl Error {
    /// Create a new error without details.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Field-level messages for validation failures.
    pub fn details(&self) -> &[String] {
        &self.details
    }

    /// Attach field-level messages to the error.
    pub fn with_details<I, S>(mut self, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details = details.into_iter().map(Into::into).collect();
        self
    }

    /// Convenience constructor for [`ErrorCode::ProductNotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProductNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::InsufficientStock`].
    pub fn insufficient_stock(available: i32, requested: i32) -> Self {
        Self::new(
            ErrorCode::InsufficientStock,
            format!("Insufficient stock. Available: {available}, Requested: {requested}"),
        )
    }

    /// Convenience constructor for [`ErrorCode::ValidationError`].
    ///
    /// # Examples
    /// ```
    /// use product_service::domain::Error;
    ///
    /// let err = Error::validation(["Price is required", "Category is required"]);
    /// assert_eq!(err.message(), "Invalid input data");
    /// assert_eq!(err.details().len(), 2);
    /// ```
    pub fn validation<I, S>(details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ErrorCode::ValidationError, VALIDATION_MESSAGE).with_details(details)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalServerError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalServerError, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}
