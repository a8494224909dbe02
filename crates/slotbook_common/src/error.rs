// --- File: crates/slotbook_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all slotbook request failures.
///
/// Each variant maps onto one HTTP status. Feature crates convert their own
/// errors into this type at the handler boundary.
#[derive(Error, Debug)]
pub enum SlotbookError {
    /// Bad or missing client input
    #[error("{0}")]
    Validation(String),

    /// The route exists but not for this verb
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The external record store failed or rejected the call
    #[error("{0}")]
    Remote(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised by a [`crate::services::BookingStore`] implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store answered 404 for a single-record lookup
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The store answered with a non-success status
    #[error("Store returned {status}: {body}")]
    Remote { status: u16, body: String },

    /// The request never produced a response
    #[error("Store request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body did not have the expected shape
    #[error("Failed to parse store response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The store client is not usable with the given configuration
    #[error("Store configuration error: {0}")]
    Config(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for SlotbookError {
    fn status_code(&self) -> u16 {
        match self {
            SlotbookError::Validation(_) => 400,
            SlotbookError::MethodNotAllowed => 405,
            SlotbookError::Remote(_) => 500,
            SlotbookError::Config(_) => 500,
            SlotbookError::Internal(_) => 500,
        }
    }
}

impl From<StoreError> for SlotbookError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Config(message) => SlotbookError::Config(message),
            other => SlotbookError::Remote(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for SlotbookError {
    fn from(err: serde_json::Error) -> Self {
        SlotbookError::Internal(err.to_string())
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, SlotbookError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, SlotbookError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, SlotbookError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| SlotbookError::Internal(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, SlotbookError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| SlotbookError::Internal(format!("{}: {}", f(), error)))
    }
}

pub fn validation_error<T: fmt::Display>(message: T) -> SlotbookError {
    SlotbookError::Validation(message.to_string())
}

pub fn config_error<T: fmt::Display>(message: T) -> SlotbookError {
    SlotbookError::Config(message.to_string())
}

pub fn internal_error<T: fmt::Display>(message: T) -> SlotbookError {
    SlotbookError::Internal(message.to_string())
}
