use thiserror::Error;

#[derive(Debug, Error)]
pub enum SquirrelError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Character set error: {0}")]
    CharacterSetError(String),

    #[error("Multiple statements error: {0}")]
    MultipleStatementsError(String),

    #[error("Paranoid mode error: {0}")]
    ParanoidModeError(String),

    #[error("Statement has {expected} placeholders, but {given} parameters given")]
    ParameterMismatchError { expected: usize, given: usize },

    #[error("Transaction error: {0}")]
    TransactionError(String),

    /// Error reported by the server, with its own error code.
    #[error("Error {code}: {message}")]
    DriverError { code: u16, message: String },

    /// Client-side failure (I/O, protocol, URL parsing) raised by the driver.
    #[error(transparent)]
    ClientError(mysql::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Row decode error: {0}")]
    DecodeError(#[from] serde_json::Error),
}

impl SquirrelError {
    /// Server error code, when the failure came from the database itself.
    #[must_use]
    pub fn code(&self) -> Option<u16> {
        match self {
            SquirrelError::DriverError { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<mysql::Error> for SquirrelError {
    fn from(err: mysql::Error) -> Self {
        match err {
            mysql::Error::MySqlError(server) => SquirrelError::DriverError {
                code: server.code,
                message: server.message,
            },
            other => SquirrelError::ClientError(other),
        }
    }
}
