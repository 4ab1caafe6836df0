//! Terminal prompts behind a trait so interactive flows can be scripted.

use anyhow::{Context, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password, Select};

pub trait Prompter {
    /// Free text. An empty answer is allowed and returned as-is.
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String>;
    fn password(&self, prompt: &str) -> Result<String>;
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
    /// Index of the chosen item.
    fn select(&self, prompt: &str, items: &[String], default: usize) -> Result<usize>;
}

/// Adapter for the controllers' confirmation closures. A failed prompt
/// counts as "no".
pub fn confirmation<'a>(prompter: &'a dyn Prompter, prompt: &'a str) -> impl FnOnce() -> bool + 'a {
    move || prompter.confirm(prompt, false).unwrap_or(false)
}

/// dialoguer-backed prompter. With `assume_yes` every confirmation is
/// answered "yes" without asking.
pub struct TermPrompter {
    theme: ColorfulTheme,
    assume_yes: bool,
}

impl TermPrompter {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            theme: ColorfulTheme::default(),
            assume_yes,
        }
    }
}

impl Prompter for TermPrompter {
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input.interact_text().context("Failed to read input")
    }

    fn password(&self, prompt: &str) -> Result<String> {
        Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .context("Failed to read password")
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .context("Failed to read confirmation")
    }

    fn select(&self, prompt: &str, items: &[String], default: usize) -> Result<usize> {
        Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default.min(items.len().saturating_sub(1)))
            .interact()
            .context("Failed to read selection")
    }
}
