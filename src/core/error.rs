use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Malformed output: {0}")]
    MalformedOutput(String),

    #[error("Verification failure: {0}")]
    Verification(String),

    #[error("Dispatch failure: {0}")]
    Dispatch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Stable tag for each failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    TransportFailure,
    MalformedOutput,
    VerificationFailure,
    DispatchFailure,
    Config,
    Io,
    Serialization,
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::InvalidInput(_) => ErrorKind::InvalidInput,
            GatewayError::Transport(_) => ErrorKind::TransportFailure,
            GatewayError::MalformedOutput(_) => ErrorKind::MalformedOutput,
            GatewayError::Verification(_) => ErrorKind::VerificationFailure,
            GatewayError::Dispatch(_) => ErrorKind::DispatchFailure,
            GatewayError::Config(_) => ErrorKind::Config,
            GatewayError::IoError(_) => ErrorKind::Io,
            GatewayError::SerdeError(_) => ErrorKind::Serialization,
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
