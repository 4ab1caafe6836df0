//! Trolley attach form — `trolley-track attach`.

use anyhow::Result;

use trolley_track::session::Page;
use trolley_track::ui::prompt::{Prompter, confirmation};
use trolley_track::ui::render;
use trolley_track::wizard::{FormWizard, TrolleyField, WizardButtons, WizardState};

use super::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachAction {
    Scan,
    Edit,
    Back,
    Next,
    Submit,
    Reset,
    Quit,
}

impl AttachAction {
    pub fn label(self) -> &'static str {
        match self {
            AttachAction::Scan => "Scan trolley barcode",
            AttachAction::Edit => "Fill in this step",
            AttachAction::Back => "Back",
            AttachAction::Next => "Next",
            AttachAction::Submit => "Submit",
            AttachAction::Reset => "Reset form",
            AttachAction::Quit => "Quit",
        }
    }
}

/// Menu entries for the current form state. Disabled controls are omitted.
pub fn attach_actions(state: WizardState, buttons: WizardButtons) -> Vec<AttachAction> {
    let mut actions = vec![AttachAction::Scan];
    if state != WizardState::Locked {
        actions.push(AttachAction::Edit);
    }
    if buttons.back_enabled {
        actions.push(AttachAction::Back);
    }
    if buttons.actions_enabled {
        if buttons.next_visible {
            actions.push(AttachAction::Next);
        }
        if buttons.submit_visible {
            actions.push(AttachAction::Submit);
        }
        actions.push(AttachAction::Reset);
    }
    actions.push(AttachAction::Quit);
    actions
}

/// Prompt for every field of the current step, prefilled with its value.
fn fill_step(prompter: &dyn Prompter, form: &mut FormWizard) -> Result<()> {
    let step = form.state().step();
    for field in TrolleyField::for_step(step) {
        let current = form.draft().get(field).to_string();
        let prompt = if field.is_multiline() {
            format!("{} (one line)", field.label())
        } else {
            field.label().to_string()
        };
        let value = prompter.input(&prompt, Some(current.as_str()).filter(|c| !c.is_empty()))?;
        form.set_field(field, &value)?;
    }
    Ok(())
}

pub async fn cmd_attach(ctx: &Context) -> Result<()> {
    ctx.open(Page::Attach)?;
    let api = ctx.api()?;
    let mut form = FormWizard::new(ctx.notifier(), ctx.config.reset_delay());

    loop {
        println!();
        println!("{}", render::wizard(&form));

        let actions = attach_actions(form.state(), form.buttons());
        let labels: Vec<String> = actions.iter().map(|a| a.label().to_string()).collect();
        let default = actions
            .iter()
            .position(|a| matches!(a, AttachAction::Edit))
            .unwrap_or(0);

        match actions[ctx.prompter.select("Action", &labels, default)?] {
            AttachAction::Scan => {
                let raw = ctx.prompter.input("Trolley barcode", None)?;
                // Rejections are shown as notices.
                let _ = form.scan(&raw);
            }
            AttachAction::Edit => fill_step(&ctx.prompter, &mut form)?,
            AttachAction::Back => {
                form.back();
            }
            AttachAction::Next => {
                form.next();
            }
            AttachAction::Submit => {
                let spinner = render::spinner("Saving trolley data...");
                let result = form.submit(&api).await;
                spinner.finish_and_clear();
                if let Err(e) = result {
                    tracing::debug!(error = %e, "submit failed");
                }
            }
            AttachAction::Reset => {
                form.reset(confirmation(
                    &ctx.prompter,
                    "Reset the form? Entered data will be lost.",
                ));
            }
            AttachAction::Quit => break,
        }
    }

    Ok(())
}
