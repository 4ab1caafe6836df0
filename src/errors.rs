//! Typed error hierarchy for the tracker client.
//!
//! Two top-level enums cover the two layers:
//! - `ApiError` — failures talking to the tracker REST API
//! - `WorkflowError` — failures of a single user action (scan, submit, link)

use thiserror::Error;

/// Errors from the REST API client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Server returned HTTP {status} for {path}")]
    Status { path: String, status: u16 },

    #[error("Malformed response from {path}: {message}")]
    Decode { path: String, message: String },

    /// The server answered `success: false`; `message` is surfaced verbatim when present.
    #[error("{}", message.as_deref().unwrap_or("Request was rejected by the server"))]
    Rejected { message: Option<String> },

    #[error("Invalid server URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

impl ApiError {
    /// Message reported by the server, if this error carries one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message } => message.as_deref(),
            _ => None,
        }
    }
}

/// Errors from one user action. None of these are fatal to the session.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{0}")]
    Validation(String),

    #[error("Scan the trolley barcode first")]
    NotScanned,

    #[error("Please scan both trolley and process barcodes first")]
    GatesNotSatisfied,

    #[error("Submit is only available on the last step")]
    NotOnFinalStep,

    #[error("Process barcode {barcode} not found in database")]
    ProcessNotFound { barcode: String },

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl WorkflowError {
    /// Text to show the operator: the server's message when there is one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            WorkflowError::Api(api) => api
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
            other => other.to_string(),
        }
    }
}
