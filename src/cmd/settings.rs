//! Application settings — `trolley-track settings`.

use anyhow::Result;

use trolley_track::api::HttpTrackerApi;
use trolley_track::session::Page;
use trolley_track::settings::{SettingsView, TIMEZONES};
use trolley_track::ui::prompt::{Prompter, confirmation};
use trolley_track::ui::render;

use super::super::{SettingsCommands, Toggle};
use super::{Context, reported};

/// Timezone choices with the current value first if it is not a preset.
fn timezone_choices(current: &str) -> Vec<String> {
    let mut items: Vec<String> = TIMEZONES.iter().map(|t| t.to_string()).collect();
    if !TIMEZONES.contains(&current) {
        items.insert(0, current.to_string());
    }
    items
}

async fn edit(ctx: &Context, api: &HttpTrackerApi, view: &mut SettingsView) -> Result<()> {
    loop {
        println!();
        println!("{}", render::settings(view.current(), view.is_modified()));

        let mut items = vec![
            "Company name".to_string(),
            "Timezone".to_string(),
            "Toggle maintenance mode".to_string(),
        ];
        if view.is_modified() {
            items.push("Save".to_string());
            items.push("Discard changes".to_string());
        }
        items.push("Quit".to_string());

        match items[ctx.prompter.select("Action", &items, 0)?].as_str() {
            "Company name" => {
                let current = view.current().company_name.clone();
                let name = ctx.prompter.input("Company name", Some(current.as_str()))?;
                view.set_company_name(name.trim());
            }
            "Timezone" => {
                let choices = timezone_choices(&view.current().timezone);
                let current = choices
                    .iter()
                    .position(|c| *c == view.current().timezone)
                    .unwrap_or(0);
                let idx = ctx.prompter.select("Timezone", &choices, current)?;
                view.set_timezone(&choices[idx]);
            }
            "Toggle maintenance mode" => {
                view.toggle_maintenance();
            }
            "Save" => {
                let _ = view.save(api).await;
            }
            "Discard changes" => {
                view.discard(confirmation(
                    &ctx.prompter,
                    "Discard all unsaved changes?",
                ));
            }
            _ => {
                if view.is_modified()
                    && !ctx.prompter.confirm("Quit without saving?", false)?
                {
                    continue;
                }
                break;
            }
        }
    }
    Ok(())
}

pub async fn cmd_settings(ctx: &Context, command: Option<SettingsCommands>) -> Result<()> {
    ctx.open(Page::Settings)?;
    let api = ctx.api()?;
    let mut view = SettingsView::new(ctx.notifier());
    view.load(&api).await;

    match command {
        None | Some(SettingsCommands::Show) => {
            println!("{}", render::settings(view.current(), false));
        }
        Some(SettingsCommands::Set {
            company_name,
            timezone,
        }) => {
            if company_name.is_none() && timezone.is_none() {
                anyhow::bail!("Nothing to change. Pass --company-name and/or --timezone.");
            }
            if let Some(name) = company_name {
                view.set_company_name(name.trim());
            }
            if let Some(tz) = timezone {
                view.set_timezone(tz.trim());
            }
            view.save(&api).await.map_err(reported)?;
            println!("{}", render::settings(view.current(), false));
        }
        Some(SettingsCommands::Maintenance { state }) => {
            view.set_maintenance(matches!(state, Toggle::On));
            view.save(&api).await.map_err(reported)?;
            println!("{}", render::settings(view.current(), false));
        }
        Some(SettingsCommands::Edit) => edit(ctx, &api, &mut view).await?,
    }

    Ok(())
}
