use thiserror::Error;

/// Result type for YNCA operations
pub type Result<T> = std::result::Result<T, YncaError>;

/// Errors that can occur when interacting with a YNCA receiver
#[derive(Error, Debug)]
pub enum YncaError {
    /// A value could not be converted to or from its protocol representation
    #[error("conversion failed for {function}: {message}")]
    Conversion {
        /// Function name the value belongs to
        function: String,
        /// What went wrong
        message: String,
    },

    /// A PUT was attempted on a function that only supports GET
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The subunit availability scan did not complete in time
    #[error("initialization failed: {0}")]
    InitializationFailed(String),

    /// The connection to the receiver was closed
    #[error("connection closed")]
    ConnectionClosed,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
