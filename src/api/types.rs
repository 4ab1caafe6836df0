//! Wire types for the tracker REST API.
//!
//! Response fields that the backend stores as free-form columns (widths,
//! counts, dates) arrive as strings, numbers or `null` depending on the row,
//! so they are decoded leniently into `Option<String>`.

use serde::{Deserialize, Deserializer, Serialize};

/// Decode a JSON scalar into an optional string.
///
/// Strings pass through, numbers and booleans are stringified, `null` and
/// composite values become `None`.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Generic `{success, message?}` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

// ── Trolley attach ────────────────────────────────────────────────────

/// Body of `POST /api/trolley/attach`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachTrolleyRequest {
    pub barcode: String,
    pub customer_name: String,
    pub lot_number: String,
    pub design_name: String,
    pub design_number: String,
    pub pack_instructions: String,
    pub grey_width: String,
    pub finish_width: String,
    pub fabric_quality: String,
    pub total_trolley: String,
    pub matching: String,
    pub remarks: String,
    pub order_receive_date: String,
    pub grey_receive_date: String,
}

// ── Barcode search ────────────────────────────────────────────────────

/// Fabric-order metadata carried by a trolley and copied onto a process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FabricDetails {
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lot_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub design_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub design_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub grey_width: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub finish_width: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub fabric_quality: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub total_trolley: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub meters: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub matching: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub order_receive_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub grey_receive_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub remarks: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub pack_instructions: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TrolleyRecord {
    #[serde(flatten)]
    pub details: FabricDetails,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub attached_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProcessRecord {
    #[serde(flatten)]
    pub details: FabricDetails,
    #[serde(default, deserialize_with = "lenient_string")]
    pub process_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub process_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub process_start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub attached_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub source_trolley_barcode: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub trolley_barcode: Option<String>,
}

/// The in-progress process a scanned trolley is currently feeding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CurrentProcessRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub barcode: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub process_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub attached_at: Option<String>,
}

/// One row of the tracking history log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HistoryRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub event_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub process_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub process_barcode: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub trolley_barcode: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lot_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub fabric_quality: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub process_start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub process_end_time: Option<String>,
}

/// Response of `GET /api/barcode/search/{code}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BarcodeSearchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub found: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub trolley: Option<TrolleyRecord>,
    #[serde(default)]
    pub process: Option<ProcessRecord>,
    #[serde(default, alias = "currentProcess")]
    pub current_process: Option<CurrentProcessRecord>,
    #[serde(default)]
    pub history: Option<Vec<HistoryRecord>>,
}

// ── Process linking ───────────────────────────────────────────────────

/// Which side of a process a barcode identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessKind {
    Input,
    Output,
}

impl std::fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessKind::Input => write!(f, "input"),
            ProcessKind::Output => write!(f, "output"),
        }
    }
}

impl std::str::FromStr for ProcessKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "input" => Ok(ProcessKind::Input),
            "output" => Ok(ProcessKind::Output),
            other => Err(format!(
                "Invalid process type '{}'. Must be input or output.",
                other
            )),
        }
    }
}

/// Response of `GET /api/process/check/{code}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProcessCheckResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub exists: bool,
    #[serde(default, rename = "processType")]
    pub process_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /api/process/input` (trolley → input side of a process).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInputRequest {
    pub trolley_barcode: String,
    pub process_barcode: String,
    pub process_name: String,
    pub timestamp: String,
}

/// Body of `POST /api/process/output` (output side of a process → trolley).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessOutputRequest {
    pub output_barcode: String,
    pub trolley_barcode: String,
    pub timestamp: String,
}

// ── Lists, users, settings, auth ──────────────────────────────────────

/// `{success, data: [...]}` list envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<Vec<T>>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_login: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateUserRequest {
    pub status: String,
}

/// The three application settings the client edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_company_name", deserialize_with = "string_or_default_company")]
    pub company_name: String,
    #[serde(default = "default_timezone", deserialize_with = "string_or_default_timezone")]
    pub timezone: String,
    #[serde(default = "default_maintenance_mode", deserialize_with = "string_or_default_maintenance")]
    pub maintenance_mode: String,
}

pub fn default_company_name() -> String {
    "TFT Industries".to_string()
}

pub fn default_timezone() -> String {
    "UTC +5:00 (Pakistan Standard Time)".to_string()
}

fn default_maintenance_mode() -> String {
    "false".to_string()
}

fn string_or_default_company<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient_string(d)?.unwrap_or_else(default_company_name))
}

fn string_or_default_timezone<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient_string(d)?.unwrap_or_else(default_timezone))
}

fn string_or_default_maintenance<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient_string(d)?.unwrap_or_else(default_maintenance_mode))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            company_name: default_company_name(),
            timezone: default_timezone(),
            maintenance_mode: default_maintenance_mode(),
        }
    }
}

impl Settings {
    pub fn maintenance_enabled(&self) -> bool {
        self.maintenance_mode == "true"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SettingsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Settings>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub role: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub new_password: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lenient_fields_accept_numbers_and_nulls() {
        let rec: TrolleyRecord = serde_json::from_value(json!({
            "customer_name": "Acme",
            "grey_width": 58,
            "total_trolley": 3,
            "remarks": null,
            "state": "FULL"
        }))
        .unwrap();
        assert_eq!(rec.details.customer_name.as_deref(), Some("Acme"));
        assert_eq!(rec.details.grey_width.as_deref(), Some("58"));
        assert_eq!(rec.details.total_trolley.as_deref(), Some("3"));
        assert!(rec.details.remarks.is_none());
        assert_eq!(rec.state.as_deref(), Some("FULL"));
    }

    #[test]
    fn search_response_accepts_both_current_process_spellings() {
        let snake: BarcodeSearchResponse = serde_json::from_value(json!({
            "success": true,
            "found": true,
            "current_process": {"barcode": "PR-01-in"}
        }))
        .unwrap();
        let camel: BarcodeSearchResponse = serde_json::from_value(json!({
            "success": true,
            "found": true,
            "currentProcess": {"barcode": "PR-01-in"}
        }))
        .unwrap();
        assert_eq!(snake.current_process, camel.current_process);
        assert!(snake.current_process.is_some());
    }

    #[test]
    fn attach_request_uses_camel_case_wire_names() {
        let req = AttachTrolleyRequest {
            barcode: "TR-01".into(),
            fabric_quality: "Lawn".into(),
            ..Default::default()
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["barcode"], "TR-01");
        assert_eq!(v["fabricQuality"], "Lawn");
        assert!(v.get("customerName").is_some());
        assert!(v.get("orderReceiveDate").is_some());
    }

    #[test]
    fn output_request_has_no_process_name() {
        let req = ProcessOutputRequest {
            output_barcode: "PR-03-out".into(),
            trolley_barcode: "TR-02".into(),
            timestamp: "2024-01-01T00:00:00.000Z".into(),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["outputBarcode"], "PR-03-out");
        assert!(v.get("processName").is_none());
    }

    #[test]
    fn process_kind_parses_case_insensitively() {
        assert_eq!("INPUT".parse::<ProcessKind>().unwrap(), ProcessKind::Input);
        assert_eq!("output".parse::<ProcessKind>().unwrap(), ProcessKind::Output);
        assert!("sideways".parse::<ProcessKind>().is_err());
    }

    #[test]
    fn settings_fill_missing_keys_with_defaults() {
        let s: Settings = serde_json::from_value(json!({"company_name": "Mill Co"})).unwrap();
        assert_eq!(s.company_name, "Mill Co");
        assert_eq!(s.timezone, default_timezone());
        assert!(!s.maintenance_enabled());
    }

    #[test]
    fn list_response_tolerates_missing_data() {
        let r: ListResponse<UserRecord> =
            serde_json::from_value(json!({"success": false, "message": "boom"})).unwrap();
        assert!(!r.success);
        assert!(r.data.is_none());
    }
}
