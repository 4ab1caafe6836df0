//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module     | Commands handled                          |
//! |------------|-------------------------------------------|
//! | `attach`   | `Attach`                                  |
//! | `lookup`   | `Lookup`                                  |
//! | `link`     | `Link`                                    |
//! | `history`  | `History`                                 |
//! | `users`    | `Users`                                   |
//! | `settings` | `Settings`                                |
//! | `auth`     | `Login`, `ResetPassword`, `Logout`        |
//! | `config`   | `Config`                                  |

pub mod attach;
pub mod auth;
pub mod config;
pub mod history;
pub mod link;
pub mod lookup;
pub mod settings;
pub mod users;

pub use attach::cmd_attach;
pub use auth::{cmd_login, cmd_logout, cmd_reset_password};
pub use config::cmd_config;
pub use history::cmd_history;
pub use link::cmd_link;
pub use lookup::cmd_lookup;
pub use settings::cmd_settings;
pub use users::cmd_users;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use trolley_track::api::HttpTrackerApi;
use trolley_track::config::TrackerConfig;
use trolley_track::errors::WorkflowError;
use trolley_track::notify::{Notifier, Toaster};
use trolley_track::session::{Page, SessionStore, check_access};
use trolley_track::ui::TermPrompter;

use crate::Cli;

/// A failure the user has already seen as a notice.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Reported(String);

pub fn reported(err: WorkflowError) -> anyhow::Error {
    Reported(err.to_string()).into()
}

/// Everything a command needs: effective config, notifier and prompts.
pub struct Context {
    pub config: TrackerConfig,
    pub prompter: TermPrompter,
    toaster: Arc<Toaster>,
}

impl Context {
    pub fn new(project_dir: &Path, cli: &Cli) -> Result<Self> {
        let config = TrackerConfig::new(
            project_dir.to_path_buf(),
            cli.server_url.clone(),
            cli.verbose,
            cli.yes,
        )?;
        for warning in config.validate() {
            tracing::warn!("{}", warning);
        }
        let toaster = Arc::new(Toaster::new(config.toast_duration()));
        Ok(Self {
            prompter: TermPrompter::new(config.yes),
            toaster,
            config,
        })
    }

    /// Client for the configured server. Building it does not connect.
    pub fn api(&self) -> Result<HttpTrackerApi> {
        let api = HttpTrackerApi::new(self.config.server_url(), self.config.request_timeout())?;
        tracing::debug!(url = %api.base_url(), "using tracker server");
        Ok(api)
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.toaster.clone()
    }

    pub fn session(&self) -> SessionStore {
        SessionStore::new(self.config.session_file())
    }

    /// Check the stored user may open `page`.
    pub fn open(&self, page: Page) -> Result<()> {
        let user = self.session().load()?;
        if !check_access(user.as_ref(), page) {
            anyhow::bail!("Access denied");
        }
        if let Some(user) = &user {
            tracing::debug!(user = %user.name, role = %user.role, ?page, "opening page");
        }
        Ok(())
    }

    /// Interactive loops only run on a real terminal.
    pub fn interactive(&self) -> bool {
        console::Term::stdout().is_term()
    }
}
