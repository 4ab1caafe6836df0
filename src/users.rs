//! User management list with periodic refresh.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::api::{TrackerApi, UserRecord};
use crate::errors::{ApiError, WorkflowError};
use crate::events::Badge;
use crate::notify::{Notice, Notifier};
use crate::timestamps::display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    /// Anything other than `active` counts as inactive.
    pub fn parse(raw: Option<&str>) -> Self {
        if raw == Some("active") {
            UserStatus::Active
        } else {
            UserStatus::Inactive
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Inactive,
            UserStatus::Inactive => UserStatus::Active,
        }
    }

    /// Label of the action that flips this status.
    pub fn toggle_label(self) -> &'static str {
        match self {
            UserStatus::Active => "Deactivate",
            UserStatus::Inactive => "Activate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub status: String,
    pub badge: Badge,
    pub last_login: String,
    pub action: &'static str,
}

impl From<&UserRecord> for UserRow {
    fn from(u: &UserRecord) -> Self {
        let status = UserStatus::parse(u.status.as_deref());
        let or_na = |v: &Option<String>| {
            v.as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or("N/A")
                .to_string()
        };
        Self {
            id: u.id,
            name: or_na(&u.name),
            role: or_na(&u.role),
            status: or_na(&u.status),
            badge: match status {
                UserStatus::Active => Badge::Success,
                UserStatus::Inactive => Badge::Error,
            },
            last_login: u
                .last_login
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(display)
                .unwrap_or_else(|| "Never".to_string()),
            action: status.toggle_label(),
        }
    }
}

pub struct UsersView {
    users: Vec<UserRecord>,
    notifier: Arc<dyn Notifier>,
}

impl UsersView {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            users: Vec::new(),
            notifier,
        }
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn rows(&self) -> Vec<UserRow> {
        self.users.iter().map(UserRow::from).collect()
    }

    pub fn find(&self, id: i64) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Replace the list with the server's. Any failure empties it.
    pub async fn load(&mut self, api: &dyn TrackerApi) {
        let result = api.users().await.and_then(|r| {
            if r.success {
                Ok(r.data.unwrap_or_default())
            } else {
                Err(ApiError::Rejected { message: r.message })
            }
        });
        self.users = match result {
            Ok(users) => users,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load users");
                Vec::new()
            }
        };
    }

    /// Flip a user between active and inactive, then reload.
    pub async fn toggle_status(&mut self, api: &dyn TrackerApi, id: i64, current: UserStatus) -> Result<UserStatus, WorkflowError> {
        let new_status = current.toggled();
        let result = api
            .update_user_status(id, new_status.as_str())
            .await
            .and_then(|ack| ack.into_result());

        match result {
            Ok(_) => {
                let verb = match new_status {
                    UserStatus::Active => "activated",
                    UserStatus::Inactive => "deactivated",
                };
                tracing::info!(id, status = new_status.as_str(), "user status updated");
                self.notifier
                    .notify(Notice::success("Success", format!("User {} successfully", verb)));
                self.load(api).await;
                Ok(new_status)
            }
            Err(e) => {
                let err = WorkflowError::from(e);
                self.notifier.notify(Notice::error(
                    "Error",
                    err.user_message("Failed to update user status"),
                ));
                Err(err)
            }
        }
    }

    /// Delete a user after `confirm` agrees, then reload. Returns whether a
    /// delete was attempted and succeeded.
    pub async fn delete(&mut self, api: &dyn TrackerApi, id: i64, confirm: impl FnOnce() -> bool) -> Result<bool, WorkflowError> {
        if !confirm() {
            return Ok(false);
        }
        match api.delete_user(id).await.and_then(|ack| ack.into_result()) {
            Ok(_) => {
                tracing::info!(id, "user deleted");
                self.notifier
                    .notify(Notice::success("Success", "User deleted successfully"));
                self.load(api).await;
                Ok(true)
            }
            Err(e) => {
                let err = WorkflowError::from(e);
                self.notifier.notify(Notice::error(
                    "Error",
                    err.user_message("Failed to delete user"),
                ));
                Err(err)
            }
        }
    }

    /// Reload every `interval` until `shutdown` resolves, calling
    /// `on_refresh` after each load. The first load happens immediately.
    /// Polls run one after another, so they never overlap.
    pub async fn watch<S, F>(&mut self, api: &dyn TrackerApi, interval: Duration, shutdown: S, mut on_refresh: F)
    where
        S: Future<Output = ()>,
        F: FnMut(&UsersView),
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::debug!("user watch stopped");
                    break;
                }
                _ = ticker.tick() => {
                    self.load(api).await;
                    on_refresh(self);
                }
            }
        }
    }
}
