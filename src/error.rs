//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. It centralizes error management, providing a consistent way to
//! represent the recoverable conditions the API surfaces: authentication
//! failures, duplicate registration, missing or foreign-owned tasks, and
//! malformed filter or status input.
//!
//! `AppError` implements `actix_web::error::ResponseError` to seamlessly convert
//! application errors into appropriate HTTP responses with JSON bodies.
//! It also provides `From` trait implementations for `store::StoreError`,
//! `validator::ValidationErrors`, `jsonwebtoken::errors::Error`,
//! `bcrypt::BcryptError` and `serde_json::Error`, allowing for easy conversion
//! using the `?` operator.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::store::StoreError;

/// Represents all possible errors that can occur within the application.
///
/// Each variant corresponds to a specific type of error, carrying a message
/// detailing the issue. These errors are then converted into appropriate HTTP
/// responses; none of them is fatal to the process.
#[derive(Debug)]
pub enum AppError {
    /// The caller is not authenticated (HTTP 401).
    /// Covers missing, malformed, badly signed and expired tokens, tokens
    /// whose subject no longer resolves to a user, and login attempts with
    /// credentials that do not match.
    Unauthorized(String),
    /// A client-side error due to a malformed or invalid request (HTTP 400),
    /// e.g. registering an already-taken email address.
    BadRequest(String),
    /// A requested task does not exist for the calling owner (HTTP 404).
    /// Deliberately used for both "no such id" and "owned by someone else"
    /// so the two cases cannot be told apart.
    NotFound(String),
    /// A list query used an unrecognized filter option, such as an unknown
    /// sort field (HTTP 400).
    InvalidFilter(String),
    /// A mutation supplied a status outside the closed status set (HTTP 400).
    InvalidStatus(String),
    /// Input validation on a request payload failed (HTTP 422).
    /// Wraps errors from the `validator` crate.
    ValidationError(String),
    /// An error originating from the document store (HTTP 500).
    StoreError(String),
    /// An unexpected server-side error (HTTP 500).
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InvalidFilter(msg) => write!(f, "Invalid Filter: {}", msg),
            AppError::InvalidStatus(msg) => write!(f, "Invalid Status: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::StoreError(msg) => write!(f, "Store Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// This implementation allows Actix Web to automatically translate `AppError`
/// results from handlers into the correct HTTP status codes and JSON error
/// responses.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::InvalidFilter(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::InvalidStatus(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::ValidationError(msg) => HttpResponse::UnprocessableEntity().json(json!({
                "error": msg
            })),
            // Store errors are presented as internal server errors to the client.
            AppError::StoreError(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
            AppError::InternalServerError(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
        }
    }
}

/// Converts `store::StoreError` into `AppError::StoreError`.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        AppError::StoreError(error.to_string())
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthorized`.
///
/// This is typically used when JWT processing (e.g., verification) fails.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
///
/// This handles errors during password hashing.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

/// Converts `serde_json::Error` into `AppError::InternalServerError`.
///
/// Raised when an entity cannot be mapped to or from its stored document,
/// which indicates corrupt data rather than caller error.
impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
