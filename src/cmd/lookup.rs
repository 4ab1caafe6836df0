//! Barcode lookup — `trolley-track lookup [BARCODE]`.

use anyhow::Result;
use console::style;

use trolley_track::lookup::{BarcodeLookup, LookupState};
use trolley_track::session::Page;
use trolley_track::ui::prompt::Prompter;
use trolley_track::ui::render;

use super::{Context, reported};

fn print_state(state: &LookupState) {
    match state {
        LookupState::Results(view) => println!("\n{}", render::barcode_view(view)),
        LookupState::NoData => println!("{}", style("No information found for this barcode.").dim()),
        LookupState::Idle | LookupState::Loading => {}
    }
}

/// With a barcode, look it up once and exit. Without one, keep scanning
/// until an empty barcode is entered.
pub async fn cmd_lookup(ctx: &Context, barcode: Option<&str>) -> Result<()> {
    ctx.open(Page::Lookup)?;
    let api = ctx.api()?;
    let mut lookup = BarcodeLookup::new(ctx.notifier());

    if let Some(barcode) = barcode {
        let spinner = render::spinner("Searching...");
        let result = lookup.search(&api, barcode).await;
        spinner.finish_and_clear();
        print_state(lookup.state());
        return result.map_err(reported);
    }

    loop {
        let raw = ctx.prompter.input("Barcode (empty to quit)", None)?;
        if raw.trim().is_empty() {
            break;
        }
        let spinner = render::spinner("Searching...");
        let _ = lookup.search(&api, &raw).await;
        spinner.finish_and_clear();
        print_state(lookup.state());

        if matches!(lookup.state(), LookupState::Results(_)) {
            let items = vec!["Scan another".to_string(), "Clear results".to_string()];
            if ctx.prompter.select("Next", &items, 0)? == 1 {
                lookup.clear();
            }
        }
    }

    Ok(())
}
