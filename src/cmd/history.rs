//! Tracking history browser — `trolley-track history`.

use anyhow::Result;
use chrono::NaiveDate;
use console::style;

use trolley_track::history::{HistoryFilter, HistoryView};
use trolley_track::session::Page;
use trolley_track::ui::prompt::Prompter;
use trolley_track::ui::render;

use super::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryAction {
    Next,
    Prev,
    GoTo,
    Search,
    Date,
    ClearFilters,
    Refresh,
    Quit,
}

impl HistoryAction {
    fn label(self) -> &'static str {
        match self {
            HistoryAction::Next => "Next page",
            HistoryAction::Prev => "Previous page",
            HistoryAction::GoTo => "Go to page",
            HistoryAction::Search => "Search",
            HistoryAction::Date => "Filter by date",
            HistoryAction::ClearFilters => "Clear filters",
            HistoryAction::Refresh => "Refresh",
            HistoryAction::Quit => "Quit",
        }
    }
}

fn history_actions(view: &HistoryView) -> Vec<HistoryAction> {
    let pager = view.pager();
    let mut actions = Vec::new();
    if pager.has_next() {
        actions.push(HistoryAction::Next);
    }
    if pager.has_prev() {
        actions.push(HistoryAction::Prev);
    }
    if pager.page_count() > 1 {
        actions.push(HistoryAction::GoTo);
    }
    actions.extend([HistoryAction::Search, HistoryAction::Date]);
    if !view.filter().is_empty() {
        actions.push(HistoryAction::ClearFilters);
    }
    actions.extend([HistoryAction::Refresh, HistoryAction::Quit]);
    actions
}

/// Empty input clears the date; anything unparsable is `Err`.
fn parse_date(raw: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(Some)
}

async fn load(ctx: &Context, view: &mut HistoryView) -> Result<()> {
    let api = ctx.api()?;
    let spinner = render::spinner("Loading history...");
    view.load(&api).await;
    spinner.finish_and_clear();
    Ok(())
}

fn print_page(view: &HistoryView) {
    println!();
    println!("{}", render::history_table(&view.page_rows()));
    println!("{}", render::pager(view.pager()));
}

pub async fn cmd_history(
    ctx: &Context,
    search: Option<&str>,
    date: Option<NaiveDate>,
    page: usize,
    interactive: bool,
) -> Result<()> {
    ctx.open(Page::History)?;
    let mut view = HistoryView::new(ctx.notifier(), ctx.config.page_size());
    load(ctx, &mut view).await?;
    view.apply_filter(HistoryFilter::new(search.unwrap_or_default(), date));
    view.go_to_page(page);

    let interactive = interactive && ctx.interactive();
    loop {
        print_page(&view);
        if !interactive {
            break;
        }

        let actions = history_actions(&view);
        let labels: Vec<String> = actions.iter().map(|a| a.label().to_string()).collect();
        match actions[ctx.prompter.select("Action", &labels, 0)?] {
            HistoryAction::Next => {
                view.next_page();
            }
            HistoryAction::Prev => {
                view.prev_page();
            }
            HistoryAction::GoTo => {
                let raw = ctx.prompter.input("Page", None)?;
                match raw.trim().parse::<usize>() {
                    Ok(n) if view.go_to_page(n) => {}
                    _ => println!(
                        "{}",
                        style(format!("Pages run from 1 to {}", view.pager().page_count())).yellow()
                    ),
                }
            }
            HistoryAction::Search => {
                let current = view.filter().search.clone();
                let term = ctx
                    .prompter
                    .input("Search", Some(current.as_str()).filter(|c| !c.is_empty()))?;
                let date = view.filter().date;
                view.apply_filter(HistoryFilter::new(term.trim(), date));
            }
            HistoryAction::Date => {
                let raw = ctx.prompter.input("Date (YYYY-MM-DD, empty for any)", None)?;
                match parse_date(&raw) {
                    Ok(date) => {
                        let search = view.filter().search.clone();
                        view.apply_filter(HistoryFilter::new(search, date));
                    }
                    Err(_) => println!("{}", style("Dates use the form YYYY-MM-DD").yellow()),
                }
            }
            HistoryAction::ClearFilters => view.apply_filter(HistoryFilter::default()),
            HistoryAction::Refresh => load(ctx, &mut view).await?,
            HistoryAction::Quit => break,
        }
    }

    Ok(())
}
