use thiserror::Error;

/// Result type for docstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Generic data-access error surfaced by all storage operations.
///
/// Driver-specific failures never reach callers directly; they are mapped
/// into this taxonomy by an exception-translation policy at the operation
/// boundary. The one driver-shaped escape is [`Error::Other`], which carries
/// failures the active policy did not recognize.
#[derive(Error, Debug)]
pub enum Error {
    /// Recoverable remote failure; retrying the same operation may succeed
    #[error("Transient resource failure: {0}")]
    TransientResource(String),

    /// Broken connectivity or an unreachable server
    #[error("Resource failure: {0}")]
    ResourceFailure(String),

    /// Uniqueness violation reported by the server
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Other server-reported constraint violations
    #[error("Data integrity violation: {0}")]
    DataIntegrity(String),

    /// Authentication or authorization failure
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The server rejected the request as malformed or unsupported
    #[error("Invalid API usage: {0}")]
    InvalidApiUsage(String),

    /// Server command failure with no finer category
    #[error("Operation failed{}: {message}", .code.map(|c| format!(" (code {c})")).unwrap_or_default())]
    OperationFailed {
        code: Option<i32>,
        message: String,
    },

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input supplied by the caller; raised before any remote call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Any other error, including untranslated driver failures
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Creates a transient resource error
    pub fn transient_resource(msg: impl Into<String>) -> Self {
        Self::TransientResource(msg.into())
    }

    /// Creates a resource failure error
    pub fn resource_failure(msg: impl Into<String>) -> Self {
        Self::ResourceFailure(msg.into())
    }

    /// Creates a duplicate key error
    pub fn duplicate_key(msg: impl Into<String>) -> Self {
        Self::DuplicateKey(msg.into())
    }

    /// Creates a data integrity error
    pub fn data_integrity(msg: impl Into<String>) -> Self {
        Self::DataIntegrity(msg.into())
    }

    /// Creates a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// Creates an invalid API usage error
    pub fn invalid_api_usage(msg: impl Into<String>) -> Self {
        Self::InvalidApiUsage(msg.into())
    }

    /// Creates an operation failed error
    pub fn operation_failed(code: Option<i32>, msg: impl Into<String>) -> Self {
        Self::OperationFailed {
            code,
            message: msg.into(),
        }
    }

    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Adds context to any error
    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Whether retrying the failed operation may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientResource(_))
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::with_context(context, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(Error::transient_resource("primary stepped down").is_transient());
        assert!(!Error::resource_failure("connection refused").is_transient());
        assert!(!Error::duplicate_key("dup").is_transient());
        assert!(!Error::operation_failed(Some(8000), "boom").is_transient());
    }

    #[test]
    fn operation_failed_display_includes_code() {
        let err = Error::operation_failed(Some(85), "index exists with different options");
        assert_eq!(
            err.to_string(),
            "Operation failed (code 85): index exists with different options"
        );

        let err = Error::operation_failed(None, "unknown failure");
        assert_eq!(err.to_string(), "Operation failed: unknown failure");
    }

    #[test]
    fn context_wraps_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let result: std::result::Result<(), _> = Err(io_err);
        let err = result.context("flushing catalog").unwrap_err();
        assert!(err.to_string().starts_with("flushing catalog"));
    }
}
