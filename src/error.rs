//! Error types for filingdoc library.

use thiserror::Error;

/// Result type alias for filingdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building a document model.
///
/// Malformed markup is never an error: missing bodies, empty tables and
/// unparsable CSS values degrade to defaults. These variants signal contract
/// violations and resource limits.
#[derive(Error, Debug)]
pub enum Error {
    /// Node content does not match the node kind.
    #[error("{kind} node must have {expected} content")]
    InvalidContent {
        /// Kind the node was declared with
        kind: String,
        /// Content shape the kind requires
        expected: &'static str,
    },

    /// The requested node kind does not exist.
    #[error("Unknown node type: {0}")]
    UnknownNodeKind(String),

    /// Content was accessed with the wrong shape.
    #[error("Cannot get {requested} from {kind} node")]
    ContentAccess {
        /// Kind of the node being accessed
        kind: String,
        /// What the caller asked for
        requested: &'static str,
    },

    /// Element nesting exceeded the configured depth.
    #[error("Element nesting exceeds maximum depth of {0}")]
    DepthLimit(usize),

    /// Parsing was cancelled through the cancel flag.
    #[error("Parsing was cancelled")]
    Cancelled,

    /// JSON serialization failed.
    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}
