use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Failed to open serial port: {0}")]
    OpenFailed(String),

    #[error("Failed to write command: {0}")]
    WriteFailed(String),

    #[error("Communication error: {0}")]
    CommunicationError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Lock acquisition failed")]
    LockError,
}

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::CommunicationError(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::InvalidRequest(format!("JSON error: {}", err))
    }
}
