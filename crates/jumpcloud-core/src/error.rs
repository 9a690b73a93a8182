//! Domain errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Unexpected response status {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid POSIX group '{0}', expected '<gid>:<name>'")]
    InvalidPosixGroup(String),

    #[error("Resource has no identifier")]
    MissingId,

    #[error("No application found with the provided filters")]
    ApplicationNotFound,

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<DomainError>,
    },
}

impl DomainError {
    /// Wrap the error with the operation and identifiers it happened on.
    pub fn context(self, context: impl Into<String>) -> Self {
        DomainError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with every context layer removed.
    pub fn root(&self) -> &DomainError {
        match self {
            DomainError::Context { source, .. } => source.root(),
            other => other,
        }
    }
}
