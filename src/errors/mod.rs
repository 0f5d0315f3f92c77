//! Error handling module for the campaigner sync engine.
//!
//! Provides a centralized error type with stable error codes. None of these
//! errors is fatal: callers log them and fall back to locally cached state.

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const STORE_ERROR: &str = "STORE_ERROR";
    pub const GATEWAY_ERROR: &str = "GATEWAY_ERROR";
    pub const UNEXPECTED_STATUS: &str = "UNEXPECTED_STATUS";
    pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const MISSING_CONTEXT: &str = "MISSING_CONTEXT";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Local durable store failure
    Store(String),
    /// Network or transport failure talking to the remote service
    Gateway(String),
    /// Remote service answered with a status the caller does not accept
    UnexpectedStatus { status: u16, context: String },
    /// Wire or persisted data could not be encoded/decoded
    Serialization(String),
    /// Rejected input (e.g. an empty intelligence report)
    Validation(String),
    /// A flow was entered without the identity it needs
    MissingContext(String),
    /// Invalid configuration value
    Config(String),
}

impl AppError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Store(_) => codes::STORE_ERROR,
            AppError::Gateway(_) => codes::GATEWAY_ERROR,
            AppError::UnexpectedStatus { .. } => codes::UNEXPECTED_STATUS,
            AppError::Serialization(_) => codes::SERIALIZATION_ERROR,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::MissingContext(_) => codes::MISSING_CONTEXT,
            AppError::Config(_) => codes::CONFIG_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Store(msg) => msg.clone(),
            AppError::Gateway(msg) => msg.clone(),
            AppError::UnexpectedStatus { status, context } => {
                format!("{} returned status {}", context, status)
            }
            AppError::Serialization(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::MissingContext(msg) => msg.clone(),
            AppError::Config(msg) => msg.clone(),
        }
    }

    /// Whether retrying on the next sync cycle may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AppError::Gateway(_) | AppError::UnexpectedStatus { .. }
        )
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Store error: {:?}", err);
        AppError::Store(format!("Store error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Gateway error: {:?}", err);
        if err.is_decode() {
            AppError::Serialization(format!("Response body error: {}", err))
        } else {
            AppError::Gateway(format!("Gateway error: {}", err))
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::Serialization(format!("JSON error: {}", err))
    }
}
