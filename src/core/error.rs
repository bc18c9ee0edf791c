// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for assetport.
//!
//! Provides error types for package conversion:
//! - Missing structural elements (mesh export, body setup, default instance)
//! - Ancestry resolution before type-name population
//! - Schema file parsing
//! - Header and payload offset arithmetic

use thiserror::Error;

/// Errors that can occur while converting a package.
///
/// Every error is a deterministic function of the input bytes and schema;
/// none of them is transient, so nothing in the crate retries.
#[derive(Debug, Error)]
pub enum PortError {
    /// A required structural element is absent
    #[error("{element} not found in {context}")]
    NotFound {
        /// What was looked for (e.g., "StaticMesh export")
        element: String,
        /// Where it was looked for
        context: String,
    },

    /// Ancestry chains could not be computed for the export set
    #[error("Ancestry resolution failed: {reason}")]
    AncestryResolution {
        /// Why resolution stopped
        reason: String,
    },

    /// Parse error in a schema file or interchange document
    #[error("Parse error in {context}: {message}")]
    Parse {
        /// What was being parsed
        context: String,
        /// Error message
        message: String,
    },

    /// Schema file is structurally invalid
    #[error("Invalid schema '{schema_name}': {reason}")]
    InvalidSchema {
        /// Schema name or file label
        schema_name: String,
        /// Validation error message
        reason: String,
    },

    /// Buffer too short for requested read
    #[error("Buffer too short: requested {requested} bytes at position {cursor_pos}, but only {available} bytes available")]
    BufferTooShort {
        /// Requested bytes
        requested: usize,
        /// Available bytes
        available: usize,
        /// Cursor position when error occurred
        cursor_pos: u64,
    },

    /// A layout offset points outside the blob it describes
    #[error("Offset {offset} for {field} is outside the buffer (length: {buffer_len})")]
    OffsetOutOfRange {
        /// Which field or record the offset belongs to
        field: String,
        /// Offending offset
        offset: u64,
        /// Length of the buffer
        buffer_len: usize,
    },

    /// Unsupported schema version, compression method or feature
    #[error("Unsupported feature: '{feature}'")]
    Unsupported {
        /// What is not supported
        feature: String,
    },

    /// Bytes do not satisfy an invariant the operation relies on
    #[error("Invariant violation: {invariant}")]
    InvariantViolation {
        /// Description of the invariant that was violated
        invariant: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON interchange error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("Other error: {0}")]
    Other(String),
}

impl PortError {
    /// Create a "not found" error.
    pub fn not_found(element: impl Into<String>, context: impl Into<String>) -> Self {
        PortError::NotFound {
            element: element.into(),
            context: context.into(),
        }
    }

    /// Create an ancestry resolution error.
    pub fn ancestry(reason: impl Into<String>) -> Self {
        PortError::AncestryResolution {
            reason: reason.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        PortError::Parse {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create an invalid schema error.
    pub fn invalid_schema(schema_name: impl Into<String>, reason: impl Into<String>) -> Self {
        PortError::InvalidSchema {
            schema_name: schema_name.into(),
            reason: reason.into(),
        }
    }

    /// Create a buffer too short error.
    pub fn buffer_too_short(requested: usize, available: usize, cursor_pos: u64) -> Self {
        PortError::BufferTooShort {
            requested,
            available,
            cursor_pos,
        }
    }

    /// Create an offset out of range error.
    pub fn offset_out_of_range(field: impl Into<String>, offset: u64, buffer_len: usize) -> Self {
        PortError::OffsetOutOfRange {
            field: field.into(),
            offset,
            buffer_len,
        }
    }

    /// Create an unsupported feature error.
    pub fn unsupported(feature: impl Into<String>) -> Self {
        PortError::Unsupported {
            feature: feature.into(),
        }
    }

    /// Create an invariant violation error.
    pub fn invariant_violation(invariant: impl Into<String>) -> Self {
        PortError::InvariantViolation {
            invariant: invariant.into(),
        }
    }

    /// Check if this error reports a missing structural element.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            PortError::NotFound { element, context } => {
                vec![("element", element.clone()), ("context", context.clone())]
            }
            PortError::AncestryResolution { reason } => vec![("reason", reason.clone())],
            PortError::Parse { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            PortError::InvalidSchema {
                schema_name,
                reason,
            } => vec![("schema", schema_name.clone()), ("reason", reason.clone())],
            PortError::BufferTooShort {
                requested,
                available,
                cursor_pos,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("cursor", cursor_pos.to_string()),
            ],
            PortError::OffsetOutOfRange {
                field,
                offset,
                buffer_len,
            } => vec![
                ("field", field.clone()),
                ("offset", offset.to_string()),
                ("buffer_len", buffer_len.to_string()),
            ],
            PortError::Unsupported { feature } => vec![("feature", feature.clone())],
            PortError::InvariantViolation { invariant } => {
                vec![("invariant", invariant.clone())]
            }
            PortError::Io(err) => vec![("io", err.to_string())],
            PortError::Json(err) => vec![("json", err.to_string())],
            PortError::Other(msg) => vec![("message", msg.clone())],
        }
    }
}

/// Result type for assetport operations.
pub type Result<T> = std::result::Result<T, PortError>;
