//! In-process stand-in for the tracker REST API.
//!
//! One catch-all handler answers every route from a fixed table and records
//! the raw (still percent-encoded) path and JSON body of each request.

#![allow(dead_code)]

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Debug, Clone, PartialEq)]
pub struct Seen {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Seen>>>);

impl Recorder {
    pub fn seen(&self) -> Vec<Seen> {
        self.0.lock().unwrap().clone()
    }

    pub fn last(&self) -> Seen {
        self.seen().pop().expect("no request recorded")
    }
}

fn ok(body: Value) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

fn history() -> Value {
    json!({"success": true, "data": [
        {"id": 1, "customer_name": "Acme Textiles", "lot_number": "L-100",
         "trolley_barcode": "TR-01", "event_type": "trolley_attached",
         "created_at": "2024-03-09 08:00:00"},
        {"id": 2, "customer_name": "Beta Mills", "lot_number": "L-200",
         "trolley_barcode": "TR-02", "process_barcode": "P-IN-1", "event_type": "process_input",
         "created_at": "2024-03-10 09:30:00",
         "process_start_time": "2024-03-10 09:30:00", "process_end_time": "2024-03-10 11:45:00"}
    ]})
}

async fn handle(State(recorder): State<Recorder>, method: Method, uri: Uri, body: Bytes) -> Response {
    let path = uri.path().to_string();
    let json_body: Option<Value> = serde_json::from_slice(&body).ok();
    recorder.0.lock().unwrap().push(Seen {
        method: method.to_string(),
        path: path.clone(),
        body: json_body.clone(),
    });

    match (method.as_str(), path.as_str()) {
        ("GET", "/api/barcode/search/TR-01") | ("GET", "/api/barcode/search/TR%2F01") => ok(json!({
            "success": true, "found": true,
            "trolley": {"customer_name": "Acme Textiles", "lot_number": "L-100", "grey_width": 58,
                        "attached_at": "2024-03-09 08:00:00"},
            "history": []
        })),
        ("GET", "/api/barcode/search/NEW-1") => ok(json!({"success": true, "found": false})),
        ("GET", "/api/barcode/search/BOOM") => {
            (StatusCode::INTERNAL_SERVER_ERROR, "oops").into_response()
        }
        ("GET", "/api/process/check/P-IN-1") => {
            ok(json!({"success": true, "exists": true, "processType": "input"}))
        }
        ("GET", "/api/process/check/MISSING") => (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "Process not found"})),
        )
            .into_response(),
        ("POST", "/api/trolley/attach") => ok(json!({"success": true})),
        ("POST", "/api/process/input") => (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": "Trolley must be FULL"})),
        )
            .into_response(),
        ("GET", "/api/history/all") => ok(history()),
        ("GET", "/api/users") => ok(json!({"success": true, "data": [
            {"id": 3, "name": "amna", "role": "admin", "status": "active", "last_login": null},
            {"id": 4, "name": "bilal", "role": "operator", "status": "inactive"}
        ]})),
        ("PUT", "/api/users/update/3") | ("DELETE", "/api/users/delete/3") => {
            ok(json!({"success": true}))
        }
        ("GET", "/api/settings/all") => ok(json!({"success": true, "data": {
            "company_name": "Mill Co", "timezone": "UTC +4:00 (Gulf Standard Time)",
            "maintenance_mode": "false"
        }})),
        ("POST", "/api/settings/update") => ok(json!({"success": true})),
        ("POST", "/api/auth/login") => {
            let password = json_body
                .as_ref()
                .and_then(|b| b.get("password"))
                .and_then(Value::as_str);
            if password == Some("secret") {
                ok(json!({"success": true, "token": "jwt-token"}))
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"success": false, "message": "Invalid credentials"})),
                )
                    .into_response()
            }
        }
        ("POST", "/api/auth/reset-password") => {
            ok(json!({"success": true, "message": "Password updated successfully"}))
        }
        _ => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

/// Start the stub on an ephemeral port inside the current runtime.
pub async fn serve() -> (String, Recorder) {
    let recorder = Recorder::default();
    let app = Router::new()
        .fallback(handle)
        .with_state(recorder.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{}", addr), recorder)
}

/// Start the stub on its own thread and runtime, for blocking CLI tests.
pub fn serve_in_background() -> (String, Recorder) {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let (url, recorder) = serve().await;
            tx.send((url, recorder)).unwrap();
            std::future::pending::<()>().await;
        });
    });
    rx.recv().unwrap()
}
