//! Plain-text renderers for every view, styled with `console`.
//!
//! Renderers return strings and never print, so the command layer decides
//! where output goes.

use std::time::Duration;

use console::{Alignment, pad_str, style};
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::Settings;
use crate::events::Badge;
use crate::history::HistoryRow;
use crate::linker::{LinkStatus, ProcessLinker};
use crate::lookup::{
    BarcodeView, CONNECTED_ELSEWHERE, DetailField, NO_PARAMETERS, NOT_AVAILABLE, ProcessView, TrolleyView,
};
use crate::pagination::Pager;
use crate::timestamps::display;
use crate::ui::icons::{BARCODE, CHECK, CLOCK, CROSS, GEAR, HISTORY, LINK, PROCESS, TROLLEY, USER, WARN};
use crate::users::UserRow;
use crate::wizard::{FormWizard, TrolleyField, WizardState};

/// Width long free-text values are wrapped to.
const WRAP_WIDTH: usize = 60;

/// Start a spinner shown while a request is in flight.
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("spinner template is a valid static string"),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

pub fn badge(label: &str, badge: Badge) -> String {
    let text = format!("[{}]", label);
    match badge {
        Badge::Success => style(text).green().to_string(),
        Badge::Warning => style(text).yellow().to_string(),
        Badge::Info => style(text).cyan().to_string(),
        Badge::Error => style(text).red().to_string(),
    }
}

fn heading(icon: impl std::fmt::Display, title: &str) -> String {
    format!("{}{}", icon, style(title).bold())
}

/// Wrap `value` under a label, indenting continuation lines.
fn wrapped(label: &str, value: &str) -> String {
    let indent = " ".repeat(label.len() + 4);
    let options = textwrap::Options::new(WRAP_WIDTH)
        .initial_indent("")
        .subsequent_indent(&indent);
    format!("  {}: {}", style(label).dim(), textwrap::fill(value, options))
}

fn field_lines(fields: &[DetailField], out: &mut Vec<String>) {
    for field in fields {
        out.push(wrapped(field.label, &field.value));
    }
}

/// Step indicator and the fields of the current step.
pub fn wizard(form: &FormWizard) -> String {
    let mut out = Vec::new();
    match form.barcode() {
        Some(barcode) => out.push(heading(&TROLLEY, &format!("Trolley {}", barcode))),
        None => out.push(heading(&BARCODE, "Scan a trolley barcode to begin")),
    }

    let step = form.state().step();
    let marker = |n: u8| {
        if n == step {
            style(format!("({})", n)).cyan().bold().to_string()
        } else {
            style(format!(" {} ", n)).dim().to_string()
        }
    };
    out.push(format!("  {} Order & Fabric  {} Trolley & Dates", marker(1), marker(2)));

    if form.state() != WizardState::Locked {
        for field in TrolleyField::for_step(step) {
            let value = form.draft().get(field);
            let shown = if value.is_empty() {
                style("-").dim().to_string()
            } else {
                value.to_string()
            };
            out.push(wrapped(field.label(), &shown));
        }
    }
    out.join("\n")
}

fn trolley_view(view: &TrolleyView, out: &mut Vec<String>) {
    match &view.trolley_data {
        Some(data) => {
            out.push(format!("  Attached: {}", display(&data.attached_at)));
            let params = data.parameters();
            if params.is_empty() {
                out.push(format!("  {}", style(NO_PARAMETERS).dim()));
            } else {
                field_lines(&params, out);
            }
        }
        None => out.push(format!("  {}", style(CONNECTED_ELSEWHERE).yellow())),
    }

    if let Some(current) = &view.current_process {
        out.push(String::new());
        out.push(heading(&PROCESS, "Current Process"));
        out.push(format!("  {} ({})", current.process_name, current.process_barcode));
        out.push(format!(
            "  Connected: {}",
            current
                .connected_at
                .as_deref()
                .map(display)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        ));
        out.push(format!("  {}", badge(current.status, Badge::Warning)));
    }

    if !view.history.is_empty() {
        out.push(String::new());
        out.push(heading(&HISTORY, "Process History"));
        for entry in &view.history {
            out.push(format!(
                "  {}. {} ({}) {}",
                entry.step,
                entry.process_name,
                entry.process_barcode,
                badge(entry.status, Badge::Success)
            ));
            let time = |t: &Option<String>| t.as_deref().map(display).unwrap_or_else(|| "-".to_string());
            out.push(format!(
                "     {}in {}  out {}",
                CLOCK,
                time(&entry.input_time),
                time(&entry.output_time)
            ));
        }
    }
}

fn process_view(view: &ProcessView, out: &mut Vec<String>) {
    out.push(format!("  Name: {}", view.process_name));
    out.push(format!("  Type: {}", view.process_type));
    let status_badge = match view.current_status {
        "Active" => Badge::Warning,
        "Empty" => Badge::Info,
        _ => Badge::Success,
    };
    out.push(format!("  Status: {}", badge(view.current_status, status_badge)));
    out.push(format!("  Started: {}", display(&view.started_at)));

    if let Some(trolley) = &view.attached_trolley {
        out.push(String::new());
        out.push(heading(&TROLLEY, &format!("Attached Trolley {}", trolley.trolley_barcode)));
        out.push(format!("  Connected: {}", display(&trolley.connected_at)));
        field_lines(&trolley.fields, out);
    }

    if !view.history.is_empty() {
        out.push(String::new());
        out.push(heading(&HISTORY, "Process History"));
        for entry in &view.history {
            out.push(format!(
                "  {}. {}  {}  {}",
                entry.step,
                entry.action,
                entry.trolley_barcode.as_deref().unwrap_or(NOT_AVAILABLE),
                entry.timestamp.as_deref().map(display).unwrap_or_default()
            ));
        }
    }
}

/// Full lookup result panel.
pub fn barcode_view(view: &BarcodeView) -> String {
    let mut out = vec![heading(
        &BARCODE,
        &format!("{}: {}", view.type_label(), view.barcode()),
    )];
    match view {
        BarcodeView::Trolley(t) => trolley_view(t, &mut out),
        BarcodeView::Process(p) => process_view(p, &mut out),
    }
    out.join("\n")
}

/// Left-aligned columns sized to their widest cell.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .map(|r| console::measure_text_width(&r[i]))
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: Vec<String>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad_str(c, *w, Alignment::Left, None).into_owned())
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![style(line(headers.iter().map(|h| h.to_string()).collect())).bold().to_string()];
    out.extend(rows.iter().map(|r| line(r.clone())));
    out.join("\n")
}

pub fn history_table(rows: &[HistoryRow]) -> String {
    if rows.is_empty() {
        return format!("{}{}", HISTORY, style("No history records found").dim());
    }
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                r.customer_name.clone(),
                r.lot_number.clone(),
                r.trolley_barcode.clone(),
                r.process_barcode.clone(),
                r.created_at.clone(),
                r.start_time.clone(),
                r.end_time.clone(),
                r.duration.clone(),
                badge(&r.event, r.badge),
            ]
        })
        .collect();
    table(
        &[
            "ID", "Customer", "Lot", "Trolley", "Process", "Created", "Start", "End", "Duration", "Event",
        ],
        &cells,
    )
}

/// Summary line plus page links, e.g. `« 1 … 4 [5] 6 … 10 »`.
pub fn pager(pager: &Pager) -> String {
    let mut parts = Vec::new();
    parts.push(if pager.has_prev() { "«".to_string() } else { style("«").dim().to_string() });
    for link in pager.links() {
        parts.push(match link {
            Some(n) if n == pager.page() => style(format!("[{}]", n)).cyan().bold().to_string(),
            Some(n) => n.to_string(),
            None => "…".to_string(),
        });
    }
    parts.push(if pager.has_next() { "»".to_string() } else { style("»").dim().to_string() });
    format!("{}\n{}", pager.summary(), parts.join(" "))
}

pub fn users_table(rows: &[UserRow]) -> String {
    if rows.is_empty() {
        return format!("{}{}", USER, style("No users found").dim());
    }
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.name.clone(),
                r.role.clone(),
                badge(&r.status, r.badge),
                r.last_login.clone(),
            ]
        })
        .collect();
    table(&["ID", "Name", "Role", "Status", "Last Login"], &cells)
}

pub fn settings(settings: &Settings, modified: bool) -> String {
    let maintenance = if settings.maintenance_enabled() {
        badge("Enabled", Badge::Warning)
    } else {
        badge("Disabled", Badge::Success)
    };
    let mut out = vec![
        heading(&GEAR, "Settings"),
        format!("  Company Name: {}", settings.company_name),
        format!("  Timezone: {}", settings.timezone),
        format!("  Maintenance Mode: {}", maintenance),
    ];
    if modified {
        out.push(format!("  {}{}", WARN, style("Unsaved changes").yellow()));
    }
    out.join("\n")
}

/// Both scan slots of the linker plus the outcome of the last connect.
pub fn linker(linker: &ProcessLinker) -> String {
    let slot = |value: Option<String>| match value {
        Some(v) => format!("{}{}", CHECK, v),
        None => style("not scanned").dim().to_string(),
    };
    let mut out = vec![
        heading(&LINK, "Link Trolley to Process"),
        format!("  Trolley: {}", slot(linker.trolley().map(str::to_string))),
        format!(
            "  Process: {}",
            slot(linker.process().map(|p| format!("{} ({})", p.barcode, p.kind)))
        ),
    ];
    if linker.name_field_visible() {
        out.push(format!("  Process Name: {}", linker.process_name()));
    }
    if let Some(status) = linker.status() {
        out.push(String::new());
        out.push(link_status(status));
    }
    out.join("\n")
}

pub fn link_status(status: &LinkStatus) -> String {
    let title = if status.success {
        format!("{}{}", CHECK, style(&status.title).green().bold())
    } else {
        format!("{}{}", CROSS, style(&status.title).red().bold())
    };
    format!("{}\n  {}", title, status.message)
}
