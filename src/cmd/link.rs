//! Trolley to process linking — `trolley-track link`.

use anyhow::Result;

use trolley_track::linker::ProcessLinker;
use trolley_track::session::Page;
use trolley_track::ui::prompt::{Prompter, confirmation};
use trolley_track::ui::render;

use super::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAction {
    ScanTrolley,
    ScanProcess,
    ProcessName,
    Connect,
    Reset,
    Quit,
}

/// Menu entries for the linker's current gates.
pub fn link_actions(trolley: bool, process: bool, name_visible: bool) -> Vec<LinkAction> {
    let mut actions = vec![LinkAction::ScanTrolley, LinkAction::ScanProcess];
    if name_visible {
        actions.push(LinkAction::ProcessName);
    }
    if trolley && process {
        actions.push(LinkAction::Connect);
    }
    actions.push(LinkAction::Reset);
    actions.push(LinkAction::Quit);
    actions
}

pub async fn cmd_link(ctx: &Context) -> Result<()> {
    ctx.open(Page::Link)?;
    let api = ctx.api()?;
    let mut linker = ProcessLinker::new(ctx.notifier(), ctx.config.reclassify());

    loop {
        println!();
        println!("{}", render::linker(&linker));

        let actions = link_actions(
            linker.trolley().is_some(),
            linker.process().is_some(),
            linker.name_field_visible(),
        );
        let connect_label = linker.connect_label(&api).await;
        let labels: Vec<String> = actions
            .iter()
            .map(|a| match a {
                LinkAction::ScanTrolley => "Scan trolley barcode".to_string(),
                LinkAction::ScanProcess => "Scan process barcode".to_string(),
                LinkAction::ProcessName => "Set process name".to_string(),
                LinkAction::Connect => connect_label.to_string(),
                LinkAction::Reset => "Reset".to_string(),
                LinkAction::Quit => "Quit".to_string(),
            })
            .collect();
        let default = actions
            .iter()
            .position(|a| *a == LinkAction::Connect)
            .unwrap_or(0);

        match actions[ctx.prompter.select("Action", &labels, default)?] {
            LinkAction::ScanTrolley => {
                let raw = ctx.prompter.input("Trolley barcode", None)?;
                let _ = linker.scan_trolley(&raw);
            }
            LinkAction::ScanProcess => {
                let raw = ctx.prompter.input("Process barcode", None)?;
                let spinner = render::spinner("Verifying process barcode...");
                let _ = linker.scan_process(&api, &raw).await;
                spinner.finish_and_clear();
            }
            LinkAction::ProcessName => {
                let current = linker.process_name().to_string();
                let name = ctx
                    .prompter
                    .input("Process name", Some(current.as_str()).filter(|c| !c.is_empty()))?;
                linker.set_process_name(&name);
            }
            LinkAction::Connect => {
                let spinner = render::spinner("Connecting...");
                let _ = linker.connect(&api).await;
                spinner.finish_and_clear();
            }
            LinkAction::Reset => {
                linker.reset(confirmation(
                    &ctx.prompter,
                    "Clear all scanned barcodes?",
                ));
            }
            LinkAction::Quit => break,
        }
    }

    Ok(())
}
