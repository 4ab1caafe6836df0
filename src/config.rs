//! Client configuration read from `.trolley/trolley.toml`.
//!
//! Settings are layered file → environment → CLI:
//!
//! ```toml
//! [server]
//! base_url = "http://localhost:5000"
//! timeout_secs = 15
//!
//! [ui]
//! toast_secs = 3
//! reset_delay_secs = 2
//!
//! [history]
//! page_size = 10
//!
//! [users]
//! poll_interval_secs = 30
//!
//! [linker]
//! reclassify = false
//! ```
//!
//! `TROLLEY_SERVER_URL` overrides `server.base_url`; `--server-url` overrides both.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "trolley.toml";
pub const SESSION_FILE: &str = "session.json";
pub const SERVER_URL_ENV: &str = "TROLLEY_SERVER_URL";

/// Where the tracker REST API lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. Absent means requests never time out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSection {
    /// How long a toast stays visible.
    #[serde(default = "default_toast_secs")]
    pub toast_secs: u64,
    /// Pause between a successful attach and the automatic form reset.
    #[serde(default = "default_reset_delay_secs")]
    pub reset_delay_secs: u64,
}

fn default_toast_secs() -> u64 {
    3
}

fn default_reset_delay_secs() -> u64 {
    2
}

impl Default for UiSection {
    fn default() -> Self {
        Self {
            toast_secs: default_toast_secs(),
            reset_delay_secs: default_reset_delay_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySection {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    10
}

impl Default for HistorySection {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersSection {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_poll_interval_secs() -> u64 {
    30
}

impl Default for UsersSection {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

/// Process linker behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkerSection {
    /// Re-query the process classification before labelling and before
    /// connecting, instead of reusing the result of the scan.
    #[serde(default)]
    pub reclassify: bool,
}

/// Contents of `trolley.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerToml {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub ui: UiSection,
    #[serde(default)]
    pub history: HistorySection,
    #[serde(default)]
    pub users: UsersSection,
    #[serde(default)]
    pub linker: LinkerSection,
}

impl TrackerToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse trolley.toml")
    }

    /// Load `trolley.toml` from `tracker_dir`, or defaults when it is missing.
    pub fn load_or_default(tracker_dir: &Path) -> Result<Self> {
        let config_path = tracker_dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize trolley.toml")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Return human-readable warnings; an empty list means the file is sane.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        match reqwest::Url::parse(&self.server.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => warnings.push(format!(
                "Unsupported scheme '{}' in server.base_url: use http or https",
                url.scheme()
            )),
            Err(e) => warnings.push(format!(
                "Invalid server.base_url '{}': {}",
                self.server.base_url, e
            )),
        }
        if self.server.timeout_secs == Some(0) {
            warnings.push("server.timeout_secs is 0: every request would time out".to_string());
        }
        if self.history.page_size == 0 {
            warnings.push("history.page_size must be at least 1".to_string());
        }
        if self.users.poll_interval_secs == 0 {
            warnings.push("users.poll_interval_secs must be at least 1".to_string());
        }
        if self.ui.toast_secs == 0 {
            warnings.push("ui.toast_secs is 0: notices would vanish immediately".to_string());
        }

        warnings
    }
}

/// Directory holding the config and session files.
pub fn get_tracker_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(".trolley")
}

/// Effective configuration after merging file, environment and CLI.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub project_dir: PathBuf,
    pub tracker_dir: PathBuf,
    pub toml: TrackerToml,
    pub verbose: bool,
    /// Auto-confirm every prompt.
    pub yes: bool,
    server_url: String,
}

impl TrackerConfig {
    pub fn new(
        project_dir: PathBuf,
        cli_server_url: Option<String>,
        verbose: bool,
        yes: bool,
    ) -> Result<Self> {
        let env_url = std::env::var(SERVER_URL_ENV).ok();
        Self::with_overrides(project_dir, env_url, cli_server_url, verbose, yes)
    }

    /// Like [`TrackerConfig::new`] with the environment value passed in.
    pub fn with_overrides(
        project_dir: PathBuf,
        env_server_url: Option<String>,
        cli_server_url: Option<String>,
        verbose: bool,
        yes: bool,
    ) -> Result<Self> {
        let project_dir = project_dir
            .canonicalize()
            .context("Failed to resolve project directory")?;
        let tracker_dir = get_tracker_dir(&project_dir);
        let toml = TrackerToml::load_or_default(&tracker_dir)?;

        let server_url = cli_server_url
            .or(env_server_url)
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| toml.server.base_url.clone());

        Ok(Self {
            project_dir,
            tracker_dir,
            toml,
            verbose,
            yes,
            server_url,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.toml.server.timeout_secs.map(Duration::from_secs)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.toml.ui.toast_secs)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_secs(self.toml.ui.reset_delay_secs)
    }

    pub fn page_size(&self) -> usize {
        self.toml.history.page_size.max(1)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.toml.users.poll_interval_secs.max(1))
    }

    pub fn reclassify(&self) -> bool {
        self.toml.linker.reclassify
    }

    pub fn config_file(&self) -> PathBuf {
        self.tracker_dir.join(CONFIG_FILE)
    }

    pub fn session_file(&self) -> PathBuf {
        self.tracker_dir.join(SESSION_FILE)
    }

    pub fn validate(&self) -> Vec<String> {
        self.toml.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_empty_uses_defaults() {
        let toml = TrackerToml::parse("").unwrap();
        assert_eq!(toml.server.base_url, "http://localhost:5000");
        assert!(toml.server.timeout_secs.is_none());
        assert_eq!(toml.ui.toast_secs, 3);
        assert_eq!(toml.ui.reset_delay_secs, 2);
        assert_eq!(toml.history.page_size, 10);
        assert_eq!(toml.users.poll_interval_secs, 30);
        assert!(!toml.linker.reclassify);
    }

    #[test]
    fn test_parse_partial_sections() {
        let content = r#"
[server]
base_url = "http://mill.local:8080"
timeout_secs = 15

[linker]
reclassify = true
"#;
        let toml = TrackerToml::parse(content).unwrap();
        assert_eq!(toml.server.base_url, "http://mill.local:8080");
        assert_eq!(toml.server.timeout_secs, Some(15));
        assert!(toml.linker.reclassify);
        assert_eq!(toml.history.page_size, 10);
    }

    #[test]
    fn test_parse_rejects_bad_types() {
        assert!(TrackerToml::parse("[history]\npage_size = \"ten\"").is_err());
    }

    #[test]
    fn test_validate_default_is_clean() {
        assert!(TrackerToml::default().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_each_problem() {
        let mut toml = TrackerToml::default();
        toml.server.base_url = "not a url".into();
        toml.history.page_size = 0;
        toml.users.poll_interval_secs = 0;
        let warnings = toml.validate();
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("server.base_url"));
    }

    #[test]
    fn test_validate_rejects_non_http_scheme() {
        let mut toml = TrackerToml::default();
        toml.server.base_url = "ftp://mill.local".into();
        assert!(toml.validate()[0].contains("ftp"));
    }

    #[test]
    fn test_load_and_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".trolley").join(CONFIG_FILE);
        let mut toml = TrackerToml::default();
        toml.history.page_size = 25;
        toml.save(&path).unwrap();

        let loaded = TrackerToml::load(&path).unwrap();
        assert_eq!(loaded.history.page_size, 25);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempdir().unwrap();
        let toml = TrackerToml::load_or_default(dir.path()).unwrap();
        assert_eq!(toml.server.base_url, "http://localhost:5000");
    }

    #[test]
    fn test_server_url_precedence() {
        let dir = tempdir().unwrap();
        let tracker_dir = get_tracker_dir(dir.path());
        let mut toml = TrackerToml::default();
        toml.server.base_url = "http://from-file:5000".into();
        toml.save(&tracker_dir.join(CONFIG_FILE)).unwrap();

        let file_only =
            TrackerConfig::with_overrides(dir.path().to_path_buf(), None, None, false, false)
                .unwrap();
        assert_eq!(file_only.server_url(), "http://from-file:5000");

        let env = TrackerConfig::with_overrides(
            dir.path().to_path_buf(),
            Some("http://from-env:5000".into()),
            None,
            false,
            false,
        )
        .unwrap();
        assert_eq!(env.server_url(), "http://from-env:5000");

        let cli = TrackerConfig::with_overrides(
            dir.path().to_path_buf(),
            Some("http://from-env:5000".into()),
            Some("http://from-cli:5000".into()),
            false,
            true,
        )
        .unwrap();
        assert_eq!(cli.server_url(), "http://from-cli:5000");
        assert!(cli.yes);
    }

    #[test]
    fn test_paths_live_in_tracker_dir() {
        let dir = tempdir().unwrap();
        let config =
            TrackerConfig::with_overrides(dir.path().to_path_buf(), None, None, false, false)
                .unwrap();
        let root = dir.path().canonicalize().unwrap();
        assert_eq!(config.config_file(), root.join(".trolley/trolley.toml"));
        assert_eq!(config.session_file(), root.join(".trolley/session.json"));
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        let dir = tempdir().unwrap();
        let mut config =
            TrackerConfig::with_overrides(dir.path().to_path_buf(), None, None, false, false)
                .unwrap();
        config.toml.history.page_size = 0;
        assert_eq!(config.page_size(), 1);
        assert!(config.request_timeout().is_none());
    }
}
