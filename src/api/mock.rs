//! In-memory [`TrackerApi`] double that records every call.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::TrackerApi;
use super::types::*;
use crate::errors::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Attach,
    Search,
    Check,
    Input,
    Output,
    History,
    Users,
    UpdateUser,
    DeleteUser,
    Settings,
    UpdateSettings,
    Login,
    ResetPassword,
}

impl Endpoint {
    fn default_reply(self) -> Value {
        match self {
            Endpoint::Search => json!({"success": true, "found": false}),
            Endpoint::Check => json!({"success": true, "exists": false}),
            Endpoint::History | Endpoint::Users => json!({"success": true, "data": []}),
            Endpoint::Settings => json!({"success": true, "data": {}}),
            _ => json!({"success": true}),
        }
    }
}

/// One recorded request: endpoint, path argument and JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub endpoint: Endpoint,
    pub arg: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Fail(u16),
}

/// Scripted replies per endpoint. The last queued reply is sticky, so a
/// single `reply(...)` answers every subsequent call.
#[derive(Default)]
pub struct MockTrackerApi {
    replies: Mutex<HashMap<Endpoint, VecDeque<Reply>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockTrackerApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, endpoint: Endpoint, body: Value) -> &Self {
        self.push(endpoint, Reply::Json(body));
        self
    }

    /// Simulate an HTTP failure without a JSON body.
    pub fn fail(&self, endpoint: Endpoint, status: u16) -> &Self {
        self.push(endpoint, Reply::Fail(status));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: Endpoint) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.endpoint == endpoint)
            .collect()
    }

    pub fn count(&self, endpoint: Endpoint) -> usize {
        self.calls_to(endpoint).len()
    }

    fn push(&self, endpoint: Endpoint, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back(reply);
    }

    fn answer<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        arg: Option<String>,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        self.calls.lock().unwrap().push(Call {
            endpoint,
            arg,
            body,
        });

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            match replies.get_mut(&endpoint) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        }
        .unwrap_or_else(|| Reply::Json(endpoint.default_reply()));

        match reply {
            Reply::Json(value) => serde_json::from_value(value).map_err(|e| ApiError::Decode {
                path: format!("{:?}", endpoint),
                message: e.to_string(),
            }),
            Reply::Fail(status) => Err(ApiError::Status {
                path: format!("{:?}", endpoint),
                status,
            }),
        }
    }
}

fn body_of<T: serde::Serialize>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

#[async_trait]
impl TrackerApi for MockTrackerApi {
    async fn attach_trolley(&self, request: &AttachTrolleyRequest) -> Result<Ack, ApiError> {
        self.answer(Endpoint::Attach, None, body_of(request))
    }

    async fn search_barcode(&self, barcode: &str) -> Result<BarcodeSearchResponse, ApiError> {
        self.answer(Endpoint::Search, Some(barcode.to_string()), None)
    }

    async fn check_process(&self, barcode: &str) -> Result<ProcessCheckResponse, ApiError> {
        self.answer(Endpoint::Check, Some(barcode.to_string()), None)
    }

    async fn link_process_input(&self, request: &ProcessInputRequest) -> Result<Ack, ApiError> {
        self.answer(Endpoint::Input, None, body_of(request))
    }

    async fn link_process_output(&self, request: &ProcessOutputRequest) -> Result<Ack, ApiError> {
        self.answer(Endpoint::Output, None, body_of(request))
    }

    async fn history(&self) -> Result<ListResponse<HistoryRecord>, ApiError> {
        self.answer(Endpoint::History, None, None)
    }

    async fn users(&self) -> Result<ListResponse<UserRecord>, ApiError> {
        self.answer(Endpoint::Users, None, None)
    }

    async fn update_user_status(&self, user_id: i64, status: &str) -> Result<Ack, ApiError> {
        self.answer(
            Endpoint::UpdateUser,
            Some(user_id.to_string()),
            Some(json!({ "status": status })),
        )
    }

    async fn delete_user(&self, user_id: i64) -> Result<Ack, ApiError> {
        self.answer(Endpoint::DeleteUser, Some(user_id.to_string()), None)
    }

    async fn settings(&self) -> Result<SettingsResponse, ApiError> {
        self.answer(Endpoint::Settings, None, None)
    }

    async fn update_settings(&self, settings: &Settings) -> Result<Ack, ApiError> {
        self.answer(Endpoint::UpdateSettings, None, body_of(settings))
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.answer(Endpoint::Login, None, body_of(request))
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<Ack, ApiError> {
        self.answer(Endpoint::ResetPassword, None, body_of(request))
    }
}
