//! Application settings editor with discard-changes support.

use std::sync::Arc;

use crate::api::{Settings, TrackerApi};
use crate::errors::WorkflowError;
use crate::notify::{Notice, Notifier};

/// Timezones offered by the editor. Any string is accepted on the wire.
pub const TIMEZONES: &[&str] = &[
    "UTC +5:00 (Pakistan Standard Time)",
    "UTC +0:00 (Coordinated Universal Time)",
    "UTC +4:00 (Gulf Standard Time)",
    "UTC +5:30 (India Standard Time)",
    "UTC +8:00 (China Standard Time)",
];

pub struct SettingsView {
    original: Settings,
    current: Settings,
    notifier: Arc<dyn Notifier>,
}

impl SettingsView {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            original: Settings::default(),
            current: Settings::default(),
            notifier,
        }
    }

    pub fn current(&self) -> &Settings {
        &self.current
    }

    pub fn original(&self) -> &Settings {
        &self.original
    }

    /// Unsaved edits exist.
    pub fn is_modified(&self) -> bool {
        self.current != self.original
    }

    /// Load from the server; on failure the defaults stay in place.
    pub async fn load(&mut self, api: &dyn TrackerApi) {
        match api.settings().await {
            Ok(response) => {
                if let (true, Some(data)) = (response.success, response.data) {
                    self.original = data.clone();
                    self.current = data;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load settings");
                self.notifier.notify(Notice::error(
                    "Error",
                    "Failed to load settings. Using defaults.",
                ));
            }
        }
    }

    pub fn set_company_name(&mut self, name: &str) {
        self.current.company_name = name.to_string();
    }

    pub fn set_timezone(&mut self, timezone: &str) {
        self.current.timezone = timezone.to_string();
    }

    pub fn set_maintenance(&mut self, enabled: bool) {
        self.current.maintenance_mode = enabled.to_string();
        let notice = if enabled {
            Notice::info(
                "Maintenance Mode Enabled",
                "Maintenance mode enabled. Only admins will be able to access the application.",
            )
        } else {
            Notice::info(
                "Maintenance Mode Disabled",
                "Maintenance mode disabled. All users can access the application.",
            )
        };
        self.notifier.notify(notice);
    }

    pub fn toggle_maintenance(&mut self) -> bool {
        let enabled = !self.current.maintenance_enabled();
        self.set_maintenance(enabled);
        enabled
    }

    /// Send all three settings. The saved values become the new baseline.
    pub async fn save(&mut self, api: &dyn TrackerApi) -> Result<(), WorkflowError> {
        let settings = self.current.clone();
        match api
            .update_settings(&settings)
            .await
            .and_then(|ack| ack.into_result())
        {
            Ok(_) => {
                tracing::info!(company = %settings.company_name, "settings saved");
                self.original = settings.clone();
                self.current = settings;
                self.notifier
                    .notify(Notice::success("Success", "Settings saved successfully!"));
                Ok(())
            }
            Err(e) => {
                let err = WorkflowError::from(e);
                self.notifier.notify(Notice::error(
                    "Error",
                    err.user_message("Failed to save settings"),
                ));
                Err(err)
            }
        }
    }

    /// Restore the last loaded or saved values if `confirm` agrees.
    pub fn discard(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if !confirm() {
            return false;
        }
        self.current = self.original.clone();
        self.notifier.notify(Notice::info(
            "Reset",
            "Settings reset to last saved values",
        ));
        true
    }
}
