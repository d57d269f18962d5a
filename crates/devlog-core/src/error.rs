// Error types for ledger operations

use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// The six record kinds tracked by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    User,
    Project,
    Session,
    Snippet,
    Run,
    Event,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::User => "user",
            RecordKind::Project => "project",
            RecordKind::Session => "session",
            RecordKind::Snippet => "snippet",
            RecordKind::Run => "run",
            RecordKind::Event => "event",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur during ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Input was malformed or missing a required field
    #[error("validation failed: {0}")]
    Validation(String),

    /// The requested or referenced record does not exist
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: i64 },

    /// A uniqueness rule was violated
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backing store could not serve the request
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] anyhow::Error),
}

impl LedgerError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        LedgerError::Validation(msg.into())
    }

    /// Create a not-found error for a record kind and id
    pub fn not_found(kind: RecordKind, id: i64) -> Self {
        LedgerError::NotFound { kind, id }
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        LedgerError::Conflict(msg.into())
    }

    /// Create a store unavailability error
    pub fn store(err: impl Into<anyhow::Error>) -> Self {
        LedgerError::StoreUnavailable(err.into())
    }
}
