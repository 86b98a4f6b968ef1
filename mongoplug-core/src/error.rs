//! Error types and result types for the MongoDB integration.
//!
//! This module provides the error taxonomy for configuration resolution,
//! registry access and collection operations. Use [`MongoPlugResult<T>`] as
//! the return type for fallible operations.

use bson::error::Error as BsonError;
use thiserror::Error;

/// Represents all possible errors surfaced by the integration.
///
/// Configuration problems fail fast at the point of detection. Errors from
/// the underlying driver pass through untranslated; there is no retry or
/// circuit-breaking layer.
#[derive(Error, Debug)]
pub enum MongoPlugError {
    /// Malformed configuration: a bad server-list entry, unusable
    /// credentials, or an otherwise unresolvable setting.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// An accessor was invoked while the integration is disabled.
    #[error("MongoDB integration is disabled: {0}")]
    Disabled(String),
    /// An accessor was invoked after the registry was disposed. Disposal is
    /// permanent; a disposed registry never re-bootstraps.
    #[error("MongoDB registry has been disposed; collection access is no longer available")]
    Disposed,
    /// Serialization/deserialization error when converting key values or
    /// entities to BSON.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// An error reported by the underlying MongoDB driver, passed through
    /// unchanged.
    #[error("Driver error: {0}")]
    Driver(String),
}

/// A specialized `Result` type for integration operations.
pub type MongoPlugResult<T> = Result<T, MongoPlugError>;

impl From<BsonError> for MongoPlugError {
    fn from(err: BsonError) -> Self {
        MongoPlugError::Serialization(err.to_string())
    }
}
