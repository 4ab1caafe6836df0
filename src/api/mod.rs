//! Client for the tracker REST API.
//!
//! Controllers talk to the backend only through [`TrackerApi`]; the real
//! implementation is [`HttpTrackerApi`], tests use an in-memory double.

pub mod http;
#[cfg(test)]
pub mod mock;
pub mod types;

use async_trait::async_trait;

use crate::errors::ApiError;
pub use http::HttpTrackerApi;
pub use types::*;

/// Every endpoint the client consumes, one method each.
///
/// Implementations return the decoded response envelope as-is; interpreting
/// `success: false` is the caller's job, since each view reacts differently.
/// A non-2xx response whose body carries a `message` surfaces as
/// [`ApiError::Rejected`].
#[async_trait]
pub trait TrackerApi: Send + Sync {
    async fn attach_trolley(&self, request: &AttachTrolleyRequest) -> Result<Ack, ApiError>;

    async fn search_barcode(&self, barcode: &str) -> Result<BarcodeSearchResponse, ApiError>;

    async fn check_process(&self, barcode: &str) -> Result<ProcessCheckResponse, ApiError>;

    async fn link_process_input(&self, request: &ProcessInputRequest) -> Result<Ack, ApiError>;

    async fn link_process_output(&self, request: &ProcessOutputRequest) -> Result<Ack, ApiError>;

    async fn history(&self) -> Result<ListResponse<HistoryRecord>, ApiError>;

    async fn users(&self) -> Result<ListResponse<UserRecord>, ApiError>;

    async fn update_user_status(&self, user_id: i64, status: &str) -> Result<Ack, ApiError>;

    async fn delete_user(&self, user_id: i64) -> Result<Ack, ApiError>;

    async fn settings(&self) -> Result<SettingsResponse, ApiError>;

    async fn update_settings(&self, settings: &Settings) -> Result<Ack, ApiError>;

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<Ack, ApiError>;
}

impl Ack {
    /// Turn a `success: false` acknowledgement into [`ApiError::Rejected`].
    pub fn into_result(self) -> Result<Ack, ApiError> {
        if self.success {
            Ok(self)
        } else {
            Err(ApiError::Rejected {
                message: self.message,
            })
        }
    }
}
