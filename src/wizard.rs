//! Two-step trolley attach form.
//!
//! The form is locked until a trolley barcode is scanned. Step 1 collects
//! the order and fabric details, step 2 the trolley and date details; the
//! whole draft is submitted from step 2 in one request.

use std::sync::Arc;
use std::time::Duration;

use crate::api::{AttachTrolleyRequest, TrackerApi};
use crate::errors::WorkflowError;
use crate::notify::{Notice, Notifier};

const SAVE_FALLBACK: &str = "Failed to save data. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    Locked,
    Step1,
    Step2,
}

impl WizardState {
    /// Step number shown in the progress indicator; the locked form sits on step 1.
    pub fn step(self) -> u8 {
        match self {
            WizardState::Locked | WizardState::Step1 => 1,
            WizardState::Step2 => 2,
        }
    }
}

/// Editable fields of the attach form. The barcode is not editable: it
/// comes from the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrolleyField {
    CustomerName,
    LotNumber,
    DesignName,
    DesignNumber,
    GreyWidth,
    FinishWidth,
    Quality,
    TotalTrolley,
    Matching,
    PackInstructions,
    Remarks,
    OrderReceiveDate,
    GreyReceiveDate,
}

impl TrolleyField {
    pub const ALL: [TrolleyField; 13] = [
        TrolleyField::CustomerName,
        TrolleyField::LotNumber,
        TrolleyField::DesignName,
        TrolleyField::DesignNumber,
        TrolleyField::GreyWidth,
        TrolleyField::FinishWidth,
        TrolleyField::Quality,
        TrolleyField::TotalTrolley,
        TrolleyField::Matching,
        TrolleyField::PackInstructions,
        TrolleyField::Remarks,
        TrolleyField::OrderReceiveDate,
        TrolleyField::GreyReceiveDate,
    ];

    /// Form field name.
    pub fn name(self) -> &'static str {
        match self {
            TrolleyField::CustomerName => "customerName",
            TrolleyField::LotNumber => "lotNumber",
            TrolleyField::DesignName => "designName",
            TrolleyField::DesignNumber => "designNumber",
            TrolleyField::GreyWidth => "greyWidth",
            TrolleyField::FinishWidth => "finishWidth",
            TrolleyField::Quality => "quality",
            TrolleyField::TotalTrolley => "totalTrolley",
            TrolleyField::Matching => "matching",
            TrolleyField::PackInstructions => "packInstructions",
            TrolleyField::Remarks => "remarks",
            TrolleyField::OrderReceiveDate => "orderReceiveDate",
            TrolleyField::GreyReceiveDate => "greyReceiveDate",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrolleyField::CustomerName => "Customer Name",
            TrolleyField::LotNumber => "Lot Number",
            TrolleyField::DesignName => "Design Name",
            TrolleyField::DesignNumber => "Design Number",
            TrolleyField::GreyWidth => "Grey Width",
            TrolleyField::FinishWidth => "Finish Width",
            TrolleyField::Quality => "Quality",
            TrolleyField::TotalTrolley => "Total Trolley",
            TrolleyField::Matching => "Matching",
            TrolleyField::PackInstructions => "Pack Instructions",
            TrolleyField::Remarks => "Remarks",
            TrolleyField::OrderReceiveDate => "Order Receive Date",
            TrolleyField::GreyReceiveDate => "Grey Receive Date",
        }
    }

    pub fn step(self) -> u8 {
        match self {
            TrolleyField::CustomerName
            | TrolleyField::LotNumber
            | TrolleyField::DesignName
            | TrolleyField::DesignNumber
            | TrolleyField::GreyWidth
            | TrolleyField::FinishWidth
            | TrolleyField::Quality => 1,
            _ => 2,
        }
    }

    /// Free-text fields rendered as multi-line areas.
    pub fn is_multiline(self) -> bool {
        matches!(self, TrolleyField::PackInstructions | TrolleyField::Remarks)
    }

    pub fn for_step(step: u8) -> impl Iterator<Item = TrolleyField> {
        Self::ALL.into_iter().filter(move |f| f.step() == step)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// Field values keyed by [`TrolleyField`], plus the scanned barcode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrolleyDraft {
    pub barcode: String,
    values: std::collections::HashMap<TrolleyField, String>,
}

impl TrolleyDraft {
    pub fn get(&self, field: TrolleyField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: TrolleyField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.barcode.is_empty() && self.values.values().all(String::is_empty)
    }

    pub fn to_request(&self) -> AttachTrolleyRequest {
        let v = |f| self.get(f).to_string();
        AttachTrolleyRequest {
            barcode: self.barcode.clone(),
            customer_name: v(TrolleyField::CustomerName),
            lot_number: v(TrolleyField::LotNumber),
            design_name: v(TrolleyField::DesignName),
            design_number: v(TrolleyField::DesignNumber),
            pack_instructions: v(TrolleyField::PackInstructions),
            grey_width: v(TrolleyField::GreyWidth),
            finish_width: v(TrolleyField::FinishWidth),
            fabric_quality: v(TrolleyField::Quality),
            total_trolley: v(TrolleyField::TotalTrolley),
            matching: v(TrolleyField::Matching),
            remarks: v(TrolleyField::Remarks),
            order_receive_date: v(TrolleyField::OrderReceiveDate),
            grey_receive_date: v(TrolleyField::GreyReceiveDate),
        }
    }
}

/// Which navigation controls are usable in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardButtons {
    pub back_enabled: bool,
    pub next_visible: bool,
    pub submit_visible: bool,
    /// Next, Submit and Reset stay disabled until a barcode is scanned.
    pub actions_enabled: bool,
}

pub struct FormWizard {
    state: WizardState,
    draft: TrolleyDraft,
    scanned: bool,
    reset_delay: Duration,
    notifier: Arc<dyn Notifier>,
}

impl FormWizard {
    pub fn new(notifier: Arc<dyn Notifier>, reset_delay: Duration) -> Self {
        Self {
            state: WizardState::Locked,
            draft: TrolleyDraft::default(),
            scanned: false,
            reset_delay,
            notifier,
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn draft(&self) -> &TrolleyDraft {
        &self.draft
    }

    pub fn is_scanned(&self) -> bool {
        self.scanned
    }

    pub fn barcode(&self) -> Option<&str> {
        self.scanned.then_some(self.draft.barcode.as_str())
    }

    /// Record a scanned trolley barcode and unlock the form.
    ///
    /// Rescanning replaces the barcode but keeps the current step and values.
    pub fn scan(&mut self, raw: &str) -> Result<(), WorkflowError> {
        let barcode = raw.trim();
        if barcode.is_empty() {
            self.notifier.notify(Notice::error(
                "No Barcode",
                "Please scan or enter a valid barcode.",
            ));
            return Err(WorkflowError::Validation(
                "Please scan or enter a valid barcode.".to_string(),
            ));
        }

        self.draft.barcode = barcode.to_string();
        self.scanned = true;
        if self.state == WizardState::Locked {
            self.state = WizardState::Step1;
        }
        tracing::debug!(barcode, "trolley barcode scanned");
        self.notifier.notify(Notice::success(
            "Barcode Scanned",
            format!(
                "Barcode {} has been scanned. You can now fill the form.",
                barcode
            ),
        ));
        Ok(())
    }

    pub fn next(&mut self) -> bool {
        if self.state == WizardState::Step1 {
            self.state = WizardState::Step2;
            true
        } else {
            false
        }
    }

    pub fn back(&mut self) -> bool {
        if self.state == WizardState::Step2 {
            self.state = WizardState::Step1;
            true
        } else {
            false
        }
    }

    pub fn set_field(&mut self, field: TrolleyField, value: &str) -> Result<(), WorkflowError> {
        if self.state == WizardState::Locked {
            return Err(WorkflowError::NotScanned);
        }
        self.draft.set(field, value);
        Ok(())
    }

    pub fn can_submit(&self) -> bool {
        self.state == WizardState::Step2 && self.scanned && !self.draft.barcode.is_empty()
    }

    pub fn buttons(&self) -> WizardButtons {
        WizardButtons {
            back_enabled: self.state == WizardState::Step2,
            next_visible: self.state != WizardState::Step2,
            submit_visible: self.state == WizardState::Step2,
            actions_enabled: self.scanned,
        }
    }

    /// Send the draft to the server.
    ///
    /// On success the form resets itself after the configured delay. On
    /// failure the draft is kept so the operator can retry.
    pub async fn submit(&mut self, api: &dyn TrackerApi) -> Result<(), WorkflowError> {
        if !self.scanned || self.draft.barcode.is_empty() {
            self.notifier
                .notify(Notice::error("Error", "Please scan trolley barcode first."));
            return Err(WorkflowError::NotScanned);
        }
        if self.state != WizardState::Step2 {
            return Err(WorkflowError::NotOnFinalStep);
        }

        let request = self.draft.to_request();
        let result = api
            .attach_trolley(&request)
            .await
            .and_then(|ack| ack.into_result());

        match result {
            Ok(_) => {
                tracing::info!(barcode = %request.barcode, "trolley data saved");
                self.notifier.notify(Notice::success(
                    "Success!",
                    format!("Form data saved for barcode {}.", request.barcode),
                ));
                if !self.reset_delay.is_zero() {
                    tokio::time::sleep(self.reset_delay).await;
                }
                self.reset(|| true);
                Ok(())
            }
            Err(e) => {
                let err = WorkflowError::from(e);
                tracing::warn!(error = %err, "trolley attach failed");
                self.notifier
                    .notify(Notice::error("Error", err.user_message(SAVE_FALLBACK)));
                Err(err)
            }
        }
    }

    /// Clear the draft and scan gate if `confirm` agrees. Saved data is untouched.
    pub fn reset(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if !confirm() {
            return false;
        }
        self.draft = TrolleyDraft::default();
        self.scanned = false;
        self.state = WizardState::Locked;
        self.notifier.notify(Notice::info(
            "Form Reset",
            "Form inputs cleared. Previously saved data remains in the database.",
        ));
        true
    }
}
