//! Linking trolleys to processes.
//!
//! The operator scans a trolley and a process barcode. The server classifies
//! the process barcode as the input or output side of a process, which
//! decides the mutation: a trolley feeds a process input, and a process
//! output is transferred onto a trolley.

use std::sync::Arc;

use crate::api::{ProcessInputRequest, ProcessKind, ProcessOutputRequest, TrackerApi};
use crate::errors::{ApiError, WorkflowError};
use crate::notify::{Notice, Notifier};
use crate::timestamps::now_iso;

pub const DEFAULT_PROCESS_NAME: &str = "Unknown Process";
const CONNECT_FALLBACK: &str = "Failed to establish connection. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedProcess {
    pub barcode: String,
    pub kind: ProcessKind,
}

/// Outcome panel of the last connect attempt; kept until reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStatus {
    pub success: bool,
    pub title: String,
    pub message: String,
}

impl LinkStatus {
    fn success(message: String) -> Self {
        Self {
            success: true,
            title: "Connection Successful".to_string(),
            message,
        }
    }

    fn failure(message: String) -> Self {
        Self {
            success: false,
            title: "Connection Failed".to_string(),
            message,
        }
    }
}

pub struct ProcessLinker {
    trolley: Option<String>,
    process: Option<ScannedProcess>,
    process_name: String,
    status: Option<LinkStatus>,
    reclassify: bool,
    notifier: Arc<dyn Notifier>,
}

/// Ask the server which side of a process `barcode` is.
pub async fn classify(api: &dyn TrackerApi, barcode: &str) -> Result<ProcessKind, WorkflowError> {
    let check = api.check_process(barcode).await?;
    if !check.success || !check.exists {
        return Err(WorkflowError::ProcessNotFound {
            barcode: barcode.to_string(),
        });
    }
    check
        .process_type
        .as_deref()
        .unwrap_or_default()
        .parse::<ProcessKind>()
        .map_err(WorkflowError::Validation)
}

impl ProcessLinker {
    pub fn new(notifier: Arc<dyn Notifier>, reclassify: bool) -> Self {
        Self {
            trolley: None,
            process: None,
            process_name: String::new(),
            status: None,
            reclassify,
            notifier,
        }
    }

    pub fn trolley(&self) -> Option<&str> {
        self.trolley.as_deref()
    }

    pub fn process(&self) -> Option<&ScannedProcess> {
        self.process.as_ref()
    }

    pub fn status(&self) -> Option<&LinkStatus> {
        self.status.as_ref()
    }

    pub fn process_name(&self) -> &str {
        &self.process_name
    }

    pub fn set_process_name(&mut self, name: &str) {
        self.process_name = name.to_string();
    }

    /// The process-name field is hidden only for an output process.
    pub fn name_field_visible(&self) -> bool {
        !matches!(
            self.process,
            Some(ScannedProcess {
                kind: ProcessKind::Output,
                ..
            })
        )
    }

    pub fn ready(&self) -> bool {
        self.trolley.is_some() && self.process.is_some()
    }

    pub fn scan_trolley(&mut self, raw: &str) -> Result<(), WorkflowError> {
        let barcode = raw.trim();
        if barcode.is_empty() {
            self.notifier.notify(Notice::error(
                "Error",
                "Please scan or enter a valid trolley barcode.",
            ));
            return Err(WorkflowError::Validation(
                "Please scan or enter a valid trolley barcode.".to_string(),
            ));
        }
        self.trolley = Some(barcode.to_string());
        self.notifier.notify(Notice::success(
            "Success",
            format!("Trolley barcode {} scanned successfully.", barcode),
        ));
        Ok(())
    }

    /// Verify and classify a process barcode. A barcode the server does not
    /// know never sets the process gate.
    pub async fn scan_process(&mut self, api: &dyn TrackerApi, raw: &str) -> Result<ProcessKind, WorkflowError> {
        let barcode = raw.trim();
        if barcode.is_empty() {
            self.notifier.notify(Notice::error(
                "Error",
                "Please scan or enter a valid process barcode.",
            ));
            return Err(WorkflowError::Validation(
                "Please scan or enter a valid process barcode.".to_string(),
            ));
        }

        let kind = match classify(api, barcode).await {
            Ok(kind) => kind,
            Err(err) => {
                tracing::warn!(barcode, error = %err, "process barcode rejected");
                let message = match err {
                    WorkflowError::ProcessNotFound { .. } => "Process barcode not found in database.",
                    _ => "Failed to verify process barcode.",
                };
                self.notifier.notify(Notice::error("Error", message));
                return Err(err);
            }
        };

        self.process = Some(ScannedProcess {
            barcode: barcode.to_string(),
            kind,
        });
        let message = match kind {
            ProcessKind::Input => format!(
                "Input process barcode {} scanned. Please enter process name.",
                barcode
            ),
            ProcessKind::Output => format!(
                "Output process barcode {} scanned. Ready to transfer.",
                barcode
            ),
        };
        self.notifier.notify(Notice::success("Success", message));
        Ok(kind)
    }

    fn label_for(kind: ProcessKind) -> &'static str {
        match kind {
            ProcessKind::Input => "Connect Trolley to Process Input",
            ProcessKind::Output => "Transfer Process Output to Trolley",
        }
    }

    /// Label of the connect action. With reclassification enabled the
    /// process is re-checked first; a failed re-check keeps the scanned type.
    pub async fn connect_label(&self, api: &dyn TrackerApi) -> &'static str {
        let (Some(_), Some(process)) = (&self.trolley, &self.process) else {
            return "Connect Trolley with Process";
        };
        if self.reclassify
            && let Ok(kind) = classify(api, &process.barcode).await
        {
            return Self::label_for(kind);
        }
        Self::label_for(process.kind)
    }

    fn fail(&mut self, message: String) {
        self.status = Some(LinkStatus::failure(message.clone()));
        self.notifier.notify(Notice::error("Error", message));
    }

    /// Submit the link. Failure keeps both gates so the operator can retry.
    pub async fn connect(&mut self, api: &dyn TrackerApi) -> Result<(), WorkflowError> {
        let (Some(trolley), Some(process)) = (self.trolley.clone(), self.process.clone()) else {
            self.notifier.notify(Notice::error(
                "Error",
                "Please scan both trolley and process barcodes first.",
            ));
            return Err(WorkflowError::GatesNotSatisfied);
        };

        let kind = if self.reclassify {
            match classify(api, &process.barcode).await {
                Ok(kind) => kind,
                Err(err) => {
                    let message = match &err {
                        WorkflowError::ProcessNotFound { .. } => {
                            "Process barcode not found. Please scan a valid process barcode."
                                .to_string()
                        }
                        other => other.user_message(CONNECT_FALLBACK),
                    };
                    self.fail(message);
                    return Err(err);
                }
            }
        } else {
            process.kind
        };

        let timestamp = now_iso();
        let result = match kind {
            ProcessKind::Input => {
                let name = self.process_name.trim();
                let request = ProcessInputRequest {
                    trolley_barcode: trolley.clone(),
                    process_barcode: process.barcode.clone(),
                    process_name: if name.is_empty() {
                        DEFAULT_PROCESS_NAME.to_string()
                    } else {
                        name.to_string()
                    },
                    timestamp,
                };
                api.link_process_input(&request).await
            }
            ProcessKind::Output => {
                let request = ProcessOutputRequest {
                    output_barcode: process.barcode.clone(),
                    trolley_barcode: trolley.clone(),
                    timestamp,
                };
                api.link_process_output(&request).await
            }
        }
        .and_then(|ack| {
            ack.into_result().map_err(|e| match e {
                ApiError::Rejected { message: None } => ApiError::Rejected {
                    message: Some("Failed to complete operation".to_string()),
                },
                other => other,
            })
        });

        match result {
            Ok(_) => {
                let message = match kind {
                    ProcessKind::Input => format!(
                        "Trolley {} connected to Process {}",
                        trolley, process.barcode
                    ),
                    ProcessKind::Output => format!(
                        "Process {} output transferred to Trolley {}",
                        process.barcode, trolley
                    ),
                };
                tracing::info!(%trolley, process = %process.barcode, %kind, "link created");
                self.status = Some(LinkStatus::success(message));
                self.notifier
                    .notify(Notice::success("Success", "Operation completed successfully."));
                Ok(())
            }
            Err(e) => {
                let err = WorkflowError::from(e);
                tracing::warn!(%trolley, process = %process.barcode, error = %err, "link failed");
                self.fail(err.user_message(CONNECT_FALLBACK));
                Err(err)
            }
        }
    }

    /// Clear both gates, the process name and the status panel. Asks for
    /// confirmation only when something is scanned.
    pub fn reset(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if self.trolley.is_none() && self.process.is_none() {
            self.notifier.notify(Notice::info("Info", "Nothing to reset."));
            return false;
        }
        if !confirm() {
            return false;
        }
        self.trolley = None;
        self.process = None;
        self.process_name.clear();
        self.status = None;
        self.notifier.notify(Notice::info(
            "Reset",
            "All data has been cleared. Ready for new scan.",
        ));
        true
    }
}
