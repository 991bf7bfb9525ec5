//! Error vocabulary for the registration bridge.
//!
//! Host-side operations convert every internal fault into one of these
//! variants before returning across the module boundary; a native fault must
//! never cross it. Each variant maps to one failure class of the bridge:
//! resolution failure, decode failure, lookup miss, duplicate registration,
//! and signature mismatch.

use thiserror::Error;

/// Errors that can cross the registration bridge.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The module or operation could not be resolved at bridge setup.
    ///
    /// Logged once at resolve time; every invocation through an unresolved
    /// reference returns this as a harmless no-op outcome.
    #[error("unresolved operation: {module}.{operation}")]
    Unresolved { module: String, operation: String },

    /// A payload did not match the expected record shape.
    ///
    /// Reported per call; the caller keeps its in-memory object for retry.
    #[error("decode failure: {0}")]
    Decode(#[from] serde_json::Error),

    /// A key unknown to the runtime registry.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// The same identifier was registered twice in a domain table.
    ///
    /// The second registration is rejected; the first wins.
    #[error("duplicate {table} entry: {id}")]
    Duplicate { table: String, id: String },

    /// An argument list did not match the resolved operation's signature.
    ///
    /// A programming defect, not an absence condition: surfaced loudly,
    /// never suppressed, since no retry is meaningful.
    #[error("signature mismatch in {operation}: {detail}")]
    SignatureMismatch { operation: String, detail: String },
}

impl BridgeError {
    /// Whether this failure is a recoverable absence condition rather than a
    /// defect. Soft failures are logged and absorbed by callers; hard
    /// failures propagate.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            BridgeError::Unresolved { .. } | BridgeError::KeyNotFound(_)
        )
    }
}

/// Result type for bridge operations.
pub type BridgeResult<T> = std::result::Result<T, BridgeError>;
