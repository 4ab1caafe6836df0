//! Login, password reset and the locally stored user.
//!
//! The stored user is advisory: [`check_access`] grants every view to every
//! role, and the server does not require the token.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::{LoginRequest, ResetPasswordRequest, TrackerApi};
use crate::errors::{ApiError, WorkflowError};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Operator,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Operator => "operator",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "admin" => Ok(Role::Admin),
            "operator" => Ok(Role::Operator),
            _ => Err(WorkflowError::Validation(
                "Invalid role. Please enter 'admin' or 'operator'.".to_string(),
            )),
        }
    }
}

/// Views of the client, used by the access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Attach,
    Link,
    Lookup,
    History,
    Users,
    Settings,
}

/// Every role may open every page.
pub fn check_access(_user: Option<&StoredUser>, _page: Page) -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub token: Option<String>,
}

impl StoredUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin.as_str()
    }
}

/// JSON file holding the logged-in user.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored user, or `None` when nobody is logged in.
    pub fn load(&self) -> Result<Option<StoredUser>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {}", self.path.display()))?;
        let user = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session file: {}", self.path.display()))?;
        Ok(Some(user))
    }

    pub fn save(&self, user: &StoredUser) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(user).context("Failed to serialize session")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))?;
        Ok(())
    }

    /// Remove the stored user. Returns whether one existed.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove session file: {}", self.path.display()))?;
        Ok(true)
    }
}

/// Exchange credentials for a token.
pub async fn login(api: &dyn TrackerApi, role: &str, name: &str, password: &str) -> Result<StoredUser, WorkflowError> {
    if role.trim().is_empty() || name.trim().is_empty() || password.is_empty() {
        return Err(WorkflowError::Validation("Please fill in all fields".to_string()));
    }

    let request = LoginRequest {
        role: role.trim().to_string(),
        name: name.trim().to_string(),
        password: password.to_string(),
    };
    let response = api.login(&request).await.map_err(|e| match e {
        ApiError::Rejected { message } => ApiError::Rejected {
            message: message.or_else(|| Some("Invalid credentials".to_string())),
        },
        other => other,
    })?;

    if !response.success {
        return Err(WorkflowError::Api(ApiError::Rejected {
            message: response
                .message
                .or_else(|| Some("Invalid credentials".to_string())),
        }));
    }

    tracing::info!(name = %request.name, role = %request.role, "logged in");
    Ok(StoredUser {
        name: request.name,
        role: request.role,
        token: response.token,
    })
}

/// Check a password change before it is sent.
pub fn validate_password_reset(role: &str, new_password: &str, confirm_password: &str) -> Result<Role, WorkflowError> {
    let role: Role = role.parse()?;
    if new_password.is_empty() || confirm_password.is_empty() {
        return Err(WorkflowError::Validation("Please fill in all fields".to_string()));
    }
    if new_password != confirm_password {
        return Err(WorkflowError::Validation("Passwords do not match".to_string()));
    }
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(WorkflowError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(role)
}

pub async fn reset_password(api: &dyn TrackerApi, role: &str, new_password: &str, confirm_password: &str) -> Result<String, WorkflowError> {
    let role = validate_password_reset(role, new_password, confirm_password)?;
    let request = ResetPasswordRequest {
        new_password: new_password.to_string(),
        role: role.as_str().to_string(),
    };
    let ack = api.reset_password(&request).await?;
    if !ack.success {
        return Err(WorkflowError::Api(ApiError::Rejected {
            message: ack.message.or_else(|| Some("Password reset failed".to_string())),
        }));
    }
    tracing::info!(role = %role, "password reset");
    Ok(ack
        .message
        .unwrap_or_else(|| "Password reset successfully!".to_string()))
}
