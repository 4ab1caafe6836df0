use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::TrackerApi;
use super::types::*;
use crate::errors::ApiError;

/// reqwest-backed [`TrackerApi`].
///
/// Path parameters are pushed as URL segments, so barcodes containing `/`,
/// spaces or `#` are percent-encoded rather than changing the route.
#[derive(Debug, Clone)]
pub struct HttpTrackerApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTrackerApi {
    /// Build a client for `base_url` (e.g. `http://localhost:5000`).
    ///
    /// `timeout` is applied per request when set; the default is no timeout.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: base_url.to_string(),
                message: "URL cannot be used as a base".to_string(),
            });
        }

        let mut builder = reqwest::Client::builder().user_agent("trolley-track");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ApiError::Transport {
            path: base_url.to_string(),
            source: e,
        })?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join `segments` onto the base URL, encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<B, T>(&self, method: Method, segments: &[&str], body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments);
        let path = url.path().to_string();
        tracing::debug!(%method, %path, "tracker api request");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| ApiError::Transport {
            path: path.clone(),
            source: e,
        })?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| ApiError::Transport {
            path: path.clone(),
            source: e,
        })?;

        decode_body(&path, status, &bytes)
    }
}

/// Decode a response body, mapping non-2xx statuses to typed errors.
///
/// A failing status with a JSON body becomes [`ApiError::Rejected`] carrying
/// the body's `message` (the backend answers `{success: false, message}`
/// with 400/500); without a usable body it becomes [`ApiError::Status`].
pub fn decode_body<T: DeserializeOwned>(path: &str, status: StatusCode, bytes: &[u8]) -> Result<T, ApiError> {
    let value: Option<serde_json::Value> = serde_json::from_slice(bytes).ok();

    if !status.is_success() {
        tracing::warn!(%path, status = status.as_u16(), "tracker api returned error status");
        return match value {
            Some(serde_json::Value::Object(map)) => Err(ApiError::Rejected {
                message: map
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string),
            }),
            _ => Err(ApiError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            }),
        };
    }

    let value = value.ok_or_else(|| ApiError::Decode {
        path: path.to_string(),
        message: "response body is not JSON".to_string(),
    })?;
    serde_json::from_value(value).map_err(|e| ApiError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl TrackerApi for HttpTrackerApi {
    async fn attach_trolley(&self, request: &AttachTrolleyRequest) -> Result<Ack, ApiError> {
        self.send(Method::POST, &["api", "trolley", "attach"], Some(request))
            .await
    }

    async fn search_barcode(&self, barcode: &str) -> Result<BarcodeSearchResponse, ApiError> {
        self.send::<(), _>(Method::GET, &["api", "barcode", "search", barcode], None)
            .await
    }

    async fn check_process(&self, barcode: &str) -> Result<ProcessCheckResponse, ApiError> {
        self.send::<(), _>(Method::GET, &["api", "process", "check", barcode], None)
            .await
    }

    async fn link_process_input(&self, request: &ProcessInputRequest) -> Result<Ack, ApiError> {
        self.send(Method::POST, &["api", "process", "input"], Some(request))
            .await
    }

    async fn link_process_output(&self, request: &ProcessOutputRequest) -> Result<Ack, ApiError> {
        self.send(Method::POST, &["api", "process", "output"], Some(request))
            .await
    }

    async fn history(&self) -> Result<ListResponse<HistoryRecord>, ApiError> {
        self.send::<(), _>(Method::GET, &["api", "history", "all"], None)
            .await
    }

    async fn users(&self) -> Result<ListResponse<UserRecord>, ApiError> {
        self.send::<(), _>(Method::GET, &["api", "users"], None).await
    }

    async fn update_user_status(&self, user_id: i64, status: &str) -> Result<Ack, ApiError> {
        let id = user_id.to_string();
        let body = UpdateUserRequest {
            status: status.to_string(),
        };
        self.send(Method::PUT, &["api", "users", "update", &id], Some(&body))
            .await
    }

    async fn delete_user(&self, user_id: i64) -> Result<Ack, ApiError> {
        let id = user_id.to_string();
        self.send::<(), _>(Method::DELETE, &["api", "users", "delete", &id], None)
            .await
    }

    async fn settings(&self) -> Result<SettingsResponse, ApiError> {
        self.send::<(), _>(Method::GET, &["api", "settings", "all"], None)
            .await
    }

    async fn update_settings(&self, settings: &Settings) -> Result<Ack, ApiError> {
        self.send(Method::POST, &["api", "settings", "update"], Some(settings))
            .await
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.send(Method::POST, &["api", "auth", "login"], Some(request))
            .await
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<Ack, ApiError> {
        self.send(Method::POST, &["api", "auth", "reset-password"], Some(request))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpTrackerApi {
        HttpTrackerApi::new(base, None).unwrap()
    }

    #[test]
    fn endpoint_joins_segments() {
        let api = api("http://localhost:5000");
        assert_eq!(
            api.endpoint(&["api", "history", "all"]).as_str(),
            "http://localhost:5000/api/history/all"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let api = api("http://mill.local/tracker/");
        assert_eq!(
            api.endpoint(&["api", "users"]).as_str(),
            "http://mill.local/tracker/api/users"
        );
    }

    #[test]
    fn endpoint_encodes_barcode_segment() {
        let api = api("http://localhost:5000");
        let url = api.endpoint(&["api", "barcode", "search", "TR 01/#2"]);
        assert_eq!(url.path(), "/api/barcode/search/TR%2001%2F%232");
    }

    #[test]
    fn rejects_invalid_base_url() {
        let err = HttpTrackerApi::new("not a url", None).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
    }

    #[test]
    fn decode_error_status_with_message_is_rejected() {
        let body = br#"{"success": false, "message": "Barcode is required"}"#;
        let err = decode_body::<Ack>("/api/trolley/attach", StatusCode::BAD_REQUEST, body).unwrap_err();
        assert_eq!(err.server_message(), Some("Barcode is required"));
    }

    #[test]
    fn decode_error_status_without_json_is_status_error() {
        let err = decode_body::<Ack>("/api/users", StatusCode::NOT_FOUND, b"<html>").unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 404, .. }));
    }

    #[test]
    fn decode_success_with_garbage_is_decode_error() {
        let err = decode_body::<Ack>("/api/users", StatusCode::OK, b"not json").unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[test]
    fn decode_success_body() {
        let ack: Ack = decode_body("/api/users/delete/1", StatusCode::OK, br#"{"success": true, "message": "User deleted"}"#).unwrap();
        assert!(ack.success);
        assert_eq!(ack.message.as_deref(), Some("User deleted"));
    }
}
