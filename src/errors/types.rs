//! Error type definitions for the channel logo updater

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error type
///
/// Only conditions that abort a document pass (or the whole run, for
/// configuration) are represented here.
#[derive(Error, Debug)]
pub enum AppError {
    /// A guide or playlist could not be parsed
    #[error("Parse error: {document} - {message}")]
    Parse { document: String, message: String },

    /// A rewritten document could not be serialized
    #[error("Serialization error: {document} - {message}")]
    Serialization { document: String, message: String },

    /// Filesystem errors with the path that caused them
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// External service errors (content host, upload target)
    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },

    /// JSON decoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a parse error for the named document
    pub fn parse<D: Into<String>, M: Into<String>>(document: D, message: M) -> Self {
        Self::Parse {
            document: document.into(),
            message: message.into(),
        }
    }

    /// Create a serialization error for the named document
    pub fn serialization<D: Into<String>, M: Into<String>>(document: D, message: M) -> Self {
        Self::Serialization {
            document: document.into(),
            message: message.into(),
        }
    }

    /// Wrap an I/O error with the path it occurred on
    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an external service error
    pub fn external_service<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }
}
