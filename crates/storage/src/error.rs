//! Driver-level failures and the exception-translation policy
//!
//! [`DriverError`] is what a backend raises; [`ExceptionTranslator`] decides
//! how (and whether) it maps into the generic taxonomy in
//! [`docstore_core::error::Error`]. Translation happens once, at the
//! operation boundary in [`crate::IndexOperations::execute`].

use docstore_core::error::Error;
use thiserror::Error as ThisError;

/// Raw provider-level failure, as raised by a backend before translation
#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum DriverError {
    /// Network-level failure reaching the server
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// The server did not answer within the driver's own deadline
    #[error("Timed out: {message}")]
    Timeout { message: String },

    /// The server executed the command and reported a failure
    #[error("Command failed ({code_name}, code {code}): {message}")]
    Command {
        code: i32,
        code_name: String,
        message: String,
    },

    /// A server response could not be decoded
    #[error("Decode error: {message}")]
    Decode { message: String },
}

impl DriverError {
    /// Creates a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection {
            message: msg.into(),
        }
    }

    /// Creates a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout {
            message: msg.into(),
        }
    }

    /// Creates a server command error
    pub fn command(code: i32, code_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Command {
            code,
            code_name: code_name.into(),
            message: msg.into(),
        }
    }

    /// Creates a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    /// Server error code, for command failures
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Command { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Policy mapping raw driver failures into the generic taxonomy.
///
/// `None` means "not recognized"; the caller re-raises the original failure
/// unchanged through the pass-through channel.
pub trait ExceptionTranslator: Send + Sync {
    /// Translate `error`, or return `None` to decline
    fn translate(&self, error: &DriverError) -> Option<Error>;
}

// Server error codes with a dedicated mapping
const DUPLICATE_KEY_CODES: [i32; 3] = [11000, 11001, 12582];
const UNAUTHORIZED_CODES: [i32; 2] = [13, 18];
const INVALID_OPTIONS_CODE: i32 = 72;

/// Stock translation policy used by the bundled providers
#[derive(Debug, Clone, Default)]
pub struct DefaultExceptionTranslator;

impl ExceptionTranslator for DefaultExceptionTranslator {
    fn translate(&self, error: &DriverError) -> Option<Error> {
        match error {
            DriverError::Connection { message } => Some(Error::resource_failure(message.clone())),
            DriverError::Timeout { message } => Some(Error::transient_resource(message.clone())),
            DriverError::Command { code, message, .. }
                if DUPLICATE_KEY_CODES.contains(code) =>
            {
                Some(Error::duplicate_key(message.clone()))
            }
            DriverError::Command { code, message, .. } if UNAUTHORIZED_CODES.contains(code) => {
                Some(Error::permission_denied(message.clone()))
            }
            DriverError::Command { code, message, .. } if *code == INVALID_OPTIONS_CODE => {
                Some(Error::invalid_api_usage(message.clone()))
            }
            DriverError::Command { code, message, .. } => {
                Some(Error::operation_failed(Some(*code), message.clone()))
            }
            DriverError::Decode { .. } => None,
        }
    }
}
