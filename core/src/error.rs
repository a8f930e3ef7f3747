//! Error type for the todo API client.
//!
//! # Design
//! Deliberately coarse. The controller reacts to every failed call the same
//! way (generic banner message plus rollback where an optimistic mutation
//! was applied), so there is no per-status variant — a non-2xx response is
//! carried whole for logs and debugging, nothing more.

use std::fmt;

/// Errors produced while building requests or interpreting responses.
#[derive(Debug)]
pub enum ApiError {
    /// The server answered outside the 2xx range. Raw status and body are
    /// kept for diagnostics; the controller does not branch on them.
    Http { status: u16, body: String },

    /// The request payload could not be serialized to JSON.
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    Deserialization(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http { status, body } => write!(f, "HTTP {status}: {body}"),
            ApiError::Serialization(msg) => write!(f, "serialization failed: {msg}"),
            ApiError::Deserialization(msg) => write!(f, "deserialization failed: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}
