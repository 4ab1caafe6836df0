//! Barcode lookup: scan, fetch, transform into a display model.
//!
//! A scanned code may identify a trolley or one side of a process. The
//! search response is reshaped into a [`BarcodeView`] so the renderer never
//! touches raw wire records.

use std::sync::Arc;

use crate::api::{BarcodeSearchResponse, FabricDetails, HistoryRecord, ProcessRecord, TrackerApi};
use crate::errors::{ApiError, WorkflowError};
use crate::events::event_label;
use crate::notify::{Notice, Notifier};

pub const NOT_ATTACHED: &str = "Not attached";
pub const NOT_STARTED: &str = "Not started";
pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_PARAMETERS: &str = "No parameters found for this trolley.";
pub const CONNECTED_ELSEWHERE: &str =
    "Trolley is currently connected to a process. Scan the process barcode to see details.";

/// Value as JavaScript-style truthiness would see it: empty strings are absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Shown in detail grids: excludes absent values and `N/A` placeholders.
fn meaningful(value: &Option<String>) -> Option<&str> {
    present(value).filter(|v| *v != "N/A" && *v != "na")
}

/// Fabric fields in display order.
pub fn labelled_details(d: &FabricDetails) -> [(&'static str, &Option<String>); 14] {
    [
        ("Customer Name", &d.customer_name),
        ("Lot Number", &d.lot_number),
        ("Design Name", &d.design_name),
        ("Design Number", &d.design_number),
        ("Grey Width", &d.grey_width),
        ("Finish Width", &d.finish_width),
        ("Quality", &d.fabric_quality),
        ("Total Trolley", &d.total_trolley),
        ("Meters", &d.meters),
        ("Matching", &d.matching),
        ("Order Receive Date", &d.order_receive_date),
        ("Grey Receive Date", &d.grey_receive_date),
        ("Remarks", &d.remarks),
        ("Pack Instructions", &d.pack_instructions),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrolleyData {
    pub details: FabricDetails,
    pub attached_at: String,
}

impl TrolleyData {
    /// Fields worth showing; empty when the trolley carries no parameters.
    pub fn parameters(&self) -> Vec<DetailField> {
        labelled_details(&self.details)
            .into_iter()
            .filter_map(|(label, value)| {
                meaningful(value).map(|v| DetailField {
                    label,
                    value: v.to_string(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentProcessView {
    pub process_barcode: String,
    pub process_name: String,
    pub connected_at: Option<String>,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrolleyHistoryEntry {
    pub step: usize,
    pub process_name: String,
    pub process_barcode: String,
    pub input_time: Option<String>,
    pub output_time: Option<String>,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrolleyView {
    pub barcode: String,
    /// `None` when the trolley is only known through the process it feeds.
    pub trolley_data: Option<TrolleyData>,
    pub current_process: Option<CurrentProcessView>,
    pub history: Vec<TrolleyHistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedTrolley {
    pub trolley_barcode: String,
    /// Every fabric field, `N/A` where missing.
    pub fields: Vec<DetailField>,
    pub connected_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessHistoryEntry {
    pub step: usize,
    pub action: String,
    pub trolley_barcode: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessView {
    pub barcode: String,
    pub process_name: String,
    pub process_type: &'static str,
    pub current_status: &'static str,
    pub started_at: String,
    pub attached_trolley: Option<AttachedTrolley>,
    pub history: Vec<ProcessHistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarcodeView {
    Trolley(TrolleyView),
    Process(ProcessView),
}

impl BarcodeView {
    pub fn barcode(&self) -> &str {
        match self {
            BarcodeView::Trolley(t) => &t.barcode,
            BarcodeView::Process(p) => &p.barcode,
        }
    }

    pub fn type_label(&self) -> &'static str {
        match self {
            BarcodeView::Trolley(_) => "Trolley Barcode",
            BarcodeView::Process(_) => "Process Barcode",
        }
    }
}

fn trolley_history(history: &[HistoryRecord]) -> Vec<TrolleyHistoryEntry> {
    history
        .iter()
        .enumerate()
        .map(|(idx, h)| TrolleyHistoryEntry {
            step: idx + 1,
            process_name: present(&h.process_name)
                .map(str::to_string)
                .unwrap_or_else(|| event_label(h.event_type.as_deref())),
            process_barcode: present(&h.process_barcode)
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
            input_time: present(&h.process_start_time)
                .or_else(|| present(&h.created_at))
                .map(str::to_string),
            output_time: present(&h.process_end_time).map(str::to_string),
            status: "Completed",
        })
        .collect()
}

fn process_history(history: &[HistoryRecord]) -> Vec<ProcessHistoryEntry> {
    history
        .iter()
        .enumerate()
        .map(|(idx, h)| ProcessHistoryEntry {
            step: idx + 1,
            action: event_label(h.event_type.as_deref()),
            trolley_barcode: present(&h.trolley_barcode).map(str::to_string),
            timestamp: present(&h.created_at).map(str::to_string),
        })
        .collect()
}

fn process_view(barcode: &str, p: &ProcessRecord, history: &[HistoryRecord]) -> ProcessView {
    let started = present(&p.process_start_time).or_else(|| present(&p.attached_at));
    let source = present(&p.source_trolley_barcode).or_else(|| present(&p.trolley_barcode));
    let has_data = present(&p.details.customer_name).is_some()
        || present(&p.details.lot_number).is_some()
        || present(&p.details.design_name).is_some();

    let attached_trolley = match source {
        Some(trolley_barcode) if has_data => Some(AttachedTrolley {
            trolley_barcode: trolley_barcode.to_string(),
            fields: labelled_details(&p.details)
                .into_iter()
                .map(|(label, value)| DetailField {
                    label,
                    value: present(value).unwrap_or(NOT_AVAILABLE).to_string(),
                })
                .collect(),
            connected_at: started.unwrap_or(NOT_ATTACHED).to_string(),
        }),
        _ => None,
    };

    ProcessView {
        barcode: barcode.to_string(),
        process_name: present(&p.process_name)
            .unwrap_or("Unknown Process")
            .to_string(),
        process_type: if p.process_type.as_deref() == Some("input") {
            "Input"
        } else {
            "Output"
        },
        current_status: match p.state.as_deref() {
            Some("EMPTY") => "Empty",
            Some("IN_PROCESS") => "Active",
            _ => "Completed",
        },
        started_at: started.unwrap_or(NOT_STARTED).to_string(),
        attached_trolley,
        history: process_history(history),
    }
}

/// Reshape a search response. `None` means there is nothing to show.
pub fn transform(response: &BarcodeSearchResponse, barcode: &str) -> Option<BarcodeView> {
    if !response.found {
        return None;
    }
    let history = response.history.as_deref().unwrap_or_default();

    if let Some(trolley) = &response.trolley {
        return Some(BarcodeView::Trolley(TrolleyView {
            barcode: barcode.to_string(),
            trolley_data: Some(TrolleyData {
                details: trolley.details.clone(),
                attached_at: present(&trolley.attached_at)
                    .unwrap_or(NOT_ATTACHED)
                    .to_string(),
            }),
            current_process: None,
            history: trolley_history(history),
        }));
    }

    if let Some(current) = &response.current_process {
        return Some(BarcodeView::Trolley(TrolleyView {
            barcode: barcode.to_string(),
            trolley_data: None,
            current_process: Some(CurrentProcessView {
                process_barcode: present(&current.barcode)
                    .unwrap_or(NOT_AVAILABLE)
                    .to_string(),
                process_name: present(&current.process_name)
                    .unwrap_or("Unknown")
                    .to_string(),
                connected_at: present(&current.attached_at).map(str::to_string),
                status: "In Progress",
            }),
            history: trolley_history(history),
        }));
    }

    response
        .process
        .as_ref()
        .map(|p| BarcodeView::Process(process_view(barcode, p, history)))
}

/// What the lookup panel currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupState {
    Idle,
    Loading,
    NoData,
    Results(Box<BarcodeView>),
}

pub struct BarcodeLookup {
    state: LookupState,
    notifier: Arc<dyn Notifier>,
}

impl BarcodeLookup {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state: LookupState::Idle,
            notifier,
        }
    }

    pub fn state(&self) -> &LookupState {
        &self.state
    }

    pub fn view(&self) -> Option<&BarcodeView> {
        match &self.state {
            LookupState::Results(view) => Some(&**view),
            _ => None,
        }
    }

    /// Look up a scanned code. Every path out of `Loading` settles on
    /// `Results` or `NoData`.
    pub async fn search(&mut self, api: &dyn TrackerApi, raw: &str) -> Result<(), WorkflowError> {
        let barcode = raw.trim();
        if barcode.is_empty() {
            self.notifier.notify(Notice::error(
                "Error",
                "Please scan or enter a valid barcode.",
            ));
            return Err(WorkflowError::Validation(
                "Please scan or enter a valid barcode.".to_string(),
            ));
        }

        self.state = LookupState::Loading;
        tracing::debug!(barcode, "searching barcode");

        let response = api.search_barcode(barcode).await.and_then(|r| {
            if r.success {
                Ok(r)
            } else {
                Err(ApiError::Rejected { message: r.message })
            }
        });

        match response {
            Ok(response) => match transform(&response, barcode) {
                Some(view) => {
                    self.state = LookupState::Results(Box::new(view));
                    self.notifier.notify(Notice::success(
                        "Success",
                        format!("Barcode {} information loaded.", barcode),
                    ));
                }
                None => {
                    self.state = LookupState::NoData;
                    self.notifier.notify(Notice::info(
                        "Not Found",
                        "This barcode has no information yet.",
                    ));
                }
            },
            Err(e) => {
                tracing::warn!(barcode, error = %e, "barcode search failed");
                self.state = LookupState::NoData;
                self.notifier.notify(Notice::error(
                    "Error",
                    "Failed to fetch barcode information.",
                ));
                return Err(e.into());
            }
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.state = LookupState::Idle;
        self.notifier
            .notify(Notice::info("Cleared", "Results cleared. Ready for new scan."));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{Endpoint, MockTrackerApi};
    use crate::notify::{NoticeKind, RecordingNotifier};
    use serde_json::{Value, json};

    fn response(v: Value) -> BarcodeSearchResponse {
        serde_json::from_value(v).unwrap()
    }

    fn lookup() -> (BarcodeLookup, Arc<RecordingNotifier>) {
        let notes = Arc::new(RecordingNotifier::default());
        (BarcodeLookup::new(notes.clone()), notes)
    }

    #[test]
    fn trolley_response_hides_current_process() {
        let r = response(json!({
            "success": true, "found": true,
            "trolley": {"customer_name": "Acme", "lot_number": "L-1", "remarks": "N/A"},
            "current_process": {"barcode": "PR-01-in"}
        }));
        let BarcodeView::Trolley(view) = transform(&r, "TR-01").unwrap() else {
            panic!("expected trolley view");
        };
        assert!(view.current_process.is_none());
        let data = view.trolley_data.unwrap();
        assert_eq!(data.attached_at, NOT_ATTACHED);
        let labels: Vec<_> = data.parameters().into_iter().map(|f| f.label).collect();
        assert_eq!(labels, vec!["Customer Name", "Lot Number"]);
    }

    #[test]
    fn current_process_without_trolley_is_connected_trolley() {
        let r = response(json!({
            "success": true, "found": true,
            "currentProcess": {"barcode": "PR-01-in", "attached_at": "2024-01-02 08:00:00"}
        }));
        let BarcodeView::Trolley(view) = transform(&r, "TR-01").unwrap() else {
            panic!("expected trolley view");
        };
        assert!(view.trolley_data.is_none());
        let current = view.current_process.unwrap();
        assert_eq!(current.process_name, "Unknown");
        assert_eq!(current.status, "In Progress");
        assert_eq!(current.process_barcode, "PR-01-in");
    }

    #[test]
    fn process_only_response_is_process_view() {
        let r = response(json!({
            "success": true, "found": true,
            "process": {"process_type": "input", "state": "IN_PROCESS"}
        }));
        let BarcodeView::Process(view) = transform(&r, "PR-01-in").unwrap() else {
            panic!("expected process view");
        };
        assert_eq!(view.process_name, "Unknown Process");
        assert_eq!(view.process_type, "Input");
        assert_eq!(view.current_status, "Active");
        assert_eq!(view.started_at, NOT_STARTED);
        assert!(view.attached_trolley.is_none());
    }

    #[test]
    fn process_status_mapping() {
        for (state, expected) in [("EMPTY", "Empty"), ("IN_PROCESS", "Active"), ("DONE", "Completed")] {
            let r = response(json!({"success": true, "found": true, "process": {"state": state}}));
            let Some(BarcodeView::Process(view)) = transform(&r, "P") else {
                panic!("expected process view");
            };
            assert_eq!(view.current_status, expected);
            assert_eq!(view.process_type, "Output");
        }
    }

    #[test]
    fn attached_trolley_requires_barcode_and_data() {
        let without_data = response(json!({
            "success": true, "found": true,
            "process": {"source_trolley_barcode": "TR-01"}
        }));
        let Some(BarcodeView::Process(view)) = transform(&without_data, "P") else {
            panic!("expected process view");
        };
        assert!(view.attached_trolley.is_none());

        let with_data = response(json!({
            "success": true, "found": true,
            "process": {
                "trolley_barcode": "TR-02",
                "design_name": "Paisley",
                "attached_at": "2024-01-02 08:00:00"
            }
        }));
        let Some(BarcodeView::Process(view)) = transform(&with_data, "P") else {
            panic!("expected process view");
        };
        let attached = view.attached_trolley.unwrap();
        assert_eq!(attached.trolley_barcode, "TR-02");
        assert_eq!(attached.connected_at, "2024-01-02 08:00:00");
        assert_eq!(attached.fields[0].value, NOT_AVAILABLE);
        assert_eq!(attached.fields[2].value, "Paisley");
        assert_eq!(view.started_at, "2024-01-02 08:00:00");
    }

    #[test]
    fn trolley_history_entries_fall_back_to_event_label() {
        let r = response(json!({
            "success": true, "found": true,
            "trolley": {},
            "history": [
                {"event_type": "trolley_attached", "created_at": "2024-01-01 08:00:00"},
                {"event_type": "process_input", "process_name": "Dyeing",
                 "process_barcode": "PR-1-in", "process_start_time": "2024-01-01 09:00:00",
                 "process_end_time": "2024-01-01 11:00:00"}
            ]
        }));
        let Some(BarcodeView::Trolley(view)) = transform(&r, "TR-01") else {
            panic!("expected trolley view");
        };
        assert_eq!(view.history[0].step, 1);
        assert_eq!(view.history[0].process_name, "Trolley Attached");
        assert_eq!(view.history[0].process_barcode, NOT_AVAILABLE);
        assert_eq!(view.history[0].input_time.as_deref(), Some("2024-01-01 08:00:00"));
        assert!(view.history[0].output_time.is_none());
        assert_eq!(view.history[1].process_name, "Dyeing");
        assert_eq!(view.history[1].input_time.as_deref(), Some("2024-01-01 09:00:00"));
        assert_eq!(view.history[1].status, "Completed");
    }

    #[test]
    fn not_found_or_empty_is_none() {
        assert!(transform(&response(json!({"success": true, "found": false})), "X").is_none());
        assert!(transform(&response(json!({"success": true, "found": true})), "X").is_none());
    }

    #[test]
    fn empty_trolley_has_no_parameters() {
        let data = TrolleyData {
            details: FabricDetails {
                remarks: Some("na".into()),
                matching: Some(String::new()),
                ..Default::default()
            },
            attached_at: NOT_ATTACHED.into(),
        };
        assert!(data.parameters().is_empty());
    }

    #[tokio::test]
    async fn search_success_shows_results() {
        let (mut l, notes) = lookup();
        let api = MockTrackerApi::new();
        api.reply(
            Endpoint::Search,
            json!({"success": true, "found": true, "trolley": {"lot_number": "L-7"}}),
        );
        l.search(&api, " TR-07 ").await.unwrap();
        assert_eq!(l.view().unwrap().barcode(), "TR-07");
        assert_eq!(api.calls_to(Endpoint::Search)[0].arg.as_deref(), Some("TR-07"));
        assert_eq!(notes.last().unwrap().kind, NoticeKind::Success);
    }

    #[tokio::test]
    async fn search_not_found_is_info() {
        let (mut l, notes) = lookup();
        let api = MockTrackerApi::new();
        l.search(&api, "TR-404").await.unwrap();
        assert_eq!(l.state(), &LookupState::NoData);
        let last = notes.last().unwrap();
        assert_eq!(last.kind, NoticeKind::Info);
        assert_eq!(last.message, "This barcode has no information yet.");
    }

    #[tokio::test]
    async fn search_failures_land_in_no_data() {
        let (mut l, notes) = lookup();
        let api = MockTrackerApi::new();
        api.fail(Endpoint::Search, 500);
        assert!(l.search(&api, "TR-01").await.is_err());
        assert_eq!(l.state(), &LookupState::NoData);
        assert_eq!(notes.last().unwrap().kind, NoticeKind::Error);

        let api = MockTrackerApi::new();
        api.reply(Endpoint::Search, json!({"success": false, "message": "db down"}));
        assert!(l.search(&api, "TR-01").await.is_err());
        assert_eq!(l.state(), &LookupState::NoData);
    }

    #[tokio::test]
    async fn empty_scan_does_not_call_api() {
        let (mut l, _) = lookup();
        let api = MockTrackerApi::new();
        assert!(l.search(&api, "  ").await.is_err());
        assert_eq!(api.count(Endpoint::Search), 0);
        assert_eq!(l.state(), &LookupState::Idle);
    }

    #[test]
    fn clear_returns_to_idle() {
        let (mut l, notes) = lookup();
        l.state = LookupState::NoData;
        l.clear();
        assert_eq!(l.state(), &LookupState::Idle);
        assert_eq!(notes.last().unwrap().title, "Cleared");
    }
}
