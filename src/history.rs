//! Tracking history: fetched once, then filtered and paged in memory.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::api::{HistoryRecord, TrackerApi};
use crate::events::{Badge, EventType};
use crate::notify::{Notice, Notifier};
use crate::pagination::Pager;
use crate::timestamps::{display, format_duration, utc_day};

const PLACEHOLDER: &str = "-";

/// Free-text search plus an optional calendar day. Both must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub search: String,
    pub date: Option<NaiveDate>,
}

impl HistoryFilter {
    pub fn new(search: impl Into<String>, date: Option<NaiveDate>) -> Self {
        Self {
            search: search.into(),
            date,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.date.is_none()
    }

    pub fn matches(&self, record: &HistoryRecord) -> bool {
        self.matches_search(record) && self.matches_date(record)
    }

    fn matches_search(&self, record: &HistoryRecord) -> bool {
        let term = self.search.to_lowercase();
        if term.is_empty() {
            return true;
        }
        [
            &record.customer_name,
            &record.lot_number,
            &record.fabric_quality,
            &record.trolley_barcode,
            &record.process_barcode,
        ]
        .into_iter()
        .flatten()
        .any(|v| v.to_lowercase().contains(&term))
            || record.id.as_deref().is_some_and(|id| id.contains(&term))
    }

    /// Day comparison uses the UTC calendar day of `created_at`.
    fn matches_date(&self, record: &HistoryRecord) -> bool {
        match self.date {
            None => true,
            Some(day) => record.created_at.as_deref().and_then(utc_day) == Some(day),
        }
    }

    pub fn apply<'a>(&self, records: &'a [HistoryRecord]) -> Vec<&'a HistoryRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// One table row, every cell already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub id: String,
    pub customer_name: String,
    pub lot_number: String,
    pub trolley_barcode: String,
    pub process_barcode: String,
    pub created_at: String,
    pub start_time: String,
    pub end_time: String,
    pub duration: String,
    pub event: String,
    pub badge: Badge,
}

fn cell(value: &Option<String>) -> String {
    match value.as_deref() {
        None | Some("") | Some("N/A") | Some("na") => PLACEHOLDER.to_string(),
        Some(v) => v.to_string(),
    }
}

fn time_cell(value: &Option<String>) -> String {
    match value.as_deref().filter(|v| !v.is_empty()) {
        Some(v) => display(v),
        None => PLACEHOLDER.to_string(),
    }
}

impl From<&HistoryRecord> for HistoryRow {
    fn from(r: &HistoryRecord) -> Self {
        let event = r.event_type.as_deref().map(EventType::parse);
        Self {
            id: cell(&r.id),
            customer_name: cell(&r.customer_name),
            lot_number: cell(&r.lot_number),
            trolley_barcode: cell(&r.trolley_barcode),
            process_barcode: cell(&r.process_barcode),
            created_at: time_cell(&r.created_at),
            start_time: time_cell(&r.process_start_time),
            end_time: time_cell(&r.process_end_time),
            duration: format_duration(r.process_start_time.as_deref(), r.process_end_time.as_deref())
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            event: event
                .as_ref()
                .map(|e| e.label().to_string())
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            badge: event.map(|e| e.badge()).unwrap_or(Badge::Info),
        }
    }
}

pub struct HistoryView {
    records: Vec<HistoryRecord>,
    filter: HistoryFilter,
    /// Indices into `records` that pass the filter, in server order.
    visible: Vec<usize>,
    pager: Pager,
    notifier: Arc<dyn Notifier>,
}

impl HistoryView {
    pub fn new(notifier: Arc<dyn Notifier>, page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            filter: HistoryFilter::default(),
            visible: Vec::new(),
            pager: Pager::new(page_size),
            notifier,
        }
    }

    /// Fetch every record. `success: false` yields an empty list silently;
    /// a failed request yields an empty list with an info notice.
    pub async fn load(&mut self, api: &dyn TrackerApi) {
        self.records = match api.history().await {
            Ok(response) if response.success => response.data.unwrap_or_default(),
            Ok(_) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load history");
                self.notifier.notify(Notice::info(
                    "Info",
                    "No history records found or unable to connect to server.",
                ));
                Vec::new()
            }
        };
        tracing::debug!(count = self.records.len(), "history loaded");
        self.refilter();
    }

    pub fn set_records(&mut self, records: Vec<HistoryRecord>) {
        self.records = records;
        self.refilter();
    }

    /// Replace the filter and go back to page 1.
    pub fn apply_filter(&mut self, filter: HistoryFilter) {
        self.filter = filter;
        self.refilter();
    }

    fn refilter(&mut self) {
        self.visible = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| self.filter.matches(r))
            .map(|(i, _)| i)
            .collect();
        self.pager.set_total(self.visible.len());
        self.pager.reset();
    }

    pub fn filter(&self) -> &HistoryFilter {
        &self.filter
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn total_records(&self) -> usize {
        self.records.len()
    }

    pub fn filtered(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.visible.iter().map(|&i| &self.records[i])
    }

    pub fn page_rows(&self) -> Vec<HistoryRow> {
        self.pager
            .slice(&self.visible)
            .iter()
            .map(|&i| HistoryRow::from(&self.records[i]))
            .collect()
    }

    pub fn next_page(&mut self) -> bool {
        self.pager.next()
    }

    pub fn prev_page(&mut self) -> bool {
        self.pager.prev()
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        self.pager.go_to(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{Endpoint, MockTrackerApi};
    use crate::notify::RecordingNotifier;
    use serde_json::json;

    fn record(id: u32, customer: &str, created_at: &str) -> HistoryRecord {
        HistoryRecord {
            id: Some(id.to_string()),
            customer_name: Some(customer.to_string()),
            created_at: Some(created_at.to_string()),
            ..Default::default()
        }
    }

    fn sample() -> Vec<HistoryRecord> {
        vec![
            record(1, "Acme Textiles", "Mon, 01 Jan 2024 10:00:00 GMT"),
            record(2, "Acme Textiles", "Tue, 02 Jan 2024 23:30:00 GMT"),
            record(3, "Blue Loom", "2024-01-02T01:00:00+05:00"),
            HistoryRecord {
                id: Some("14".into()),
                trolley_barcode: Some("TR-ACME-9".into()),
                created_at: Some("2024-01-02 12:00:00".into()),
                ..Default::default()
            },
        ]
    }

    fn ids(records: &[&HistoryRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone().unwrap()).collect()
    }

    fn view() -> HistoryView {
        HistoryView::new(Arc::new(RecordingNotifier::default()), 10)
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let data = sample();
        let f = HistoryFilter::new("acme", None);
        assert_eq!(ids(&f.apply(&data)), vec!["1", "2", "14"]);
    }

    #[test]
    fn search_matches_id_text() {
        let data = sample();
        assert_eq!(ids(&HistoryFilter::new("4", None).apply(&data)), vec!["14"]);
    }

    #[test]
    fn date_filter_uses_utc_day() {
        let data = sample();
        let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1);
        let jan2 = NaiveDate::from_ymd_opt(2024, 1, 2);
        // 01:00 at +05:00 is 20:00 UTC the previous day.
        assert_eq!(ids(&HistoryFilter::new("", jan1).apply(&data)), vec!["1", "3"]);
        assert_eq!(ids(&HistoryFilter::new("", jan2).apply(&data)), vec!["2", "14"]);
    }

    #[test]
    fn filters_commute_and_are_idempotent() {
        let data = sample();
        let jan2 = NaiveDate::from_ymd_opt(2024, 1, 2);
        let search = HistoryFilter::new("acme", None);
        let date = HistoryFilter::new("", jan2);
        let both = HistoryFilter::new("acme", jan2);

        let search_then_date: Vec<HistoryRecord> = search.apply(&data).into_iter().cloned().collect();
        let search_then_date = ids(&date.apply(&search_then_date));
        let date_then_search: Vec<HistoryRecord> = date.apply(&data).into_iter().cloned().collect();
        let date_then_search = ids(&search.apply(&date_then_search));
        assert_eq!(search_then_date, date_then_search);
        assert_eq!(search_then_date, ids(&both.apply(&data)));

        let once: Vec<HistoryRecord> = both.apply(&data).into_iter().cloned().collect();
        assert_eq!(ids(&both.apply(&once)), ids(&both.apply(&data)));
    }

    #[test]
    fn records_without_created_at_fail_date_filter() {
        let data = vec![HistoryRecord {
            id: Some("1".into()),
            ..Default::default()
        }];
        let f = HistoryFilter::new("", NaiveDate::from_ymd_opt(2024, 1, 1));
        assert!(f.apply(&data).is_empty());
    }

    #[test]
    fn row_uses_placeholders_duration_and_badge() {
        let r = HistoryRecord {
            id: Some("7".into()),
            customer_name: Some("N/A".into()),
            lot_number: Some(String::new()),
            event_type: Some("process_input".into()),
            process_start_time: Some("2024-01-01 08:00:00".into()),
            process_end_time: Some("2024-01-01 09:15:00".into()),
            ..Default::default()
        };
        let row = HistoryRow::from(&r);
        assert_eq!(row.id, "7");
        assert_eq!(row.customer_name, "-");
        assert_eq!(row.lot_number, "-");
        assert_eq!(row.created_at, "-");
        assert_eq!(row.duration, "1h 15m");
        assert_eq!(row.event, "Process Started");
        assert_eq!(row.badge, Badge::Warning);
    }

    #[test]
    fn filtering_resets_to_first_page() {
        let mut v = view();
        let records: Vec<_> = (1..=23)
            .map(|i| record(i, "Acme", "2024-01-01 10:00:00"))
            .collect();
        v.set_records(records);
        assert_eq!(v.pager().page_count(), 3);
        assert!(v.next_page());
        assert!(v.next_page());
        assert_eq!(v.page_rows().len(), 3);
        assert_eq!(v.page_rows()[0].id, "21");
        assert!(!v.next_page());

        v.apply_filter(HistoryFilter::new("acme", None));
        assert_eq!(v.pager().page(), 1);
        assert!(!v.prev_page());
    }

    #[tokio::test]
    async fn load_reads_data() {
        let mut v = view();
        let api = MockTrackerApi::new();
        api.reply(
            Endpoint::History,
            json!({"success": true, "data": [{"id": 1, "customer_name": "Acme"}]}),
        );
        v.load(&api).await;
        assert_eq!(v.total_records(), 1);
        assert_eq!(v.page_rows()[0].id, "1");
    }

    #[tokio::test]
    async fn load_failures_leave_empty_list() {
        let notes = Arc::new(RecordingNotifier::default());
        let mut v = HistoryView::new(notes.clone(), 10);

        let api = MockTrackerApi::new();
        api.reply(Endpoint::History, json!({"success": false}));
        v.load(&api).await;
        assert_eq!(v.total_records(), 0);
        assert!(notes.notices().is_empty());

        let api = MockTrackerApi::new();
        api.fail(Endpoint::History, 503);
        v.load(&api).await;
        assert_eq!(v.total_records(), 0);
        assert_eq!(v.pager().summary(), "Showing 0 entries");
        assert_eq!(notes.notices().len(), 1);
    }
}
