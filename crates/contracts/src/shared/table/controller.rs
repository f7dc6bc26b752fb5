//! Table controller: owns the state of one grid and decides which request to
//! issue after each user intent. It performs no I/O; the caller fetches the
//! returned [`TableQuery`] and hands the outcome back through
//! [`TableController::receive`].

use super::cache::QueryCache;
use super::column::TableConfig;
use super::debounce::SearchDebouncer;
use super::query::{FilterSpec, TableQuery};
use super::response::PageResponse;
use super::saved_view::{SaveViewRequest, SavedView};
use super::selection::{HeaderCheckState, RowSelection};
use super::state::TableState;
use serde_json::Value;

/// Error text of a list request dropped because a newer one replaced it
pub const ABORTED: &str = "aborted";

/// A row the grid can select
pub trait TableRow: Clone {
    fn row_id(&self) -> String;
}

impl TableRow for Value {
    fn row_id(&self) -> String {
        match self.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReceiveOutcome {
    /// Response matched the current state and is now displayed
    Applied,
    /// Response belongs to an older state and was not displayed
    Stale,
    /// Current page fell off the end of the result; fetch this query instead
    NeedsRefetch(TableQuery),
}

pub struct TableController<R: TableRow> {
    config: TableConfig,
    state: TableState,
    selection: RowSelection,
    rows: Vec<R>,
    error: Option<String>,
    loading: bool,
    cache: QueryCache<PageResponse<R>>,
    current_key: String,
    debouncer: SearchDebouncer,
}

impl<R: TableRow> TableController<R> {
    pub fn new(config: TableConfig) -> Self {
        let state = TableState::new(&config);
        Self {
            config,
            state,
            selection: RowSelection::new(),
            rows: Vec::new(),
            error: None,
            loading: false,
            cache: QueryCache::default(),
            current_key: String::new(),
            debouncer: SearchDebouncer::new(),
        }
    }

    // ============================================================================
    // Read access
    // ============================================================================

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_empty(&self) -> bool {
        !self.loading && self.error.is_none() && self.rows.is_empty()
    }

    pub fn current_query(&self) -> TableQuery {
        self.state.to_query()
    }

    pub fn selection(&self) -> &RowSelection {
        &self.selection
    }

    // ============================================================================
    // Fetch bookkeeping
    // ============================================================================

    /// Query for the first render
    pub fn load(&mut self) -> Option<TableQuery> {
        self.request()
    }

    /// Make the current state the one to display. A cached response is shown
    /// at once; otherwise the query is returned unless it is already in flight.
    fn request(&mut self) -> Option<TableQuery> {
        loop {
            let query = self.state.to_query();
            let key = query.cache_key();
            self.current_key = key.clone();

            let cached = self.cache.get(&key).cloned();
            if let Some(page) = cached {
                self.loading = false;
                self.error = None;
                self.rows = page.data;
                if self.state.apply_response(&page.pagination) {
                    continue;
                }
                return None;
            }

            self.loading = true;
            self.error = None;
            return self.cache.begin(&key).then_some(query);
        }
    }

    /// Hand back the outcome of a fetch started for `query`
    pub fn receive(
        &mut self,
        query: &TableQuery,
        result: Result<PageResponse<R>, String>,
    ) -> ReceiveOutcome {
        let key = query.cache_key();
        self.cache.finish(&key);
        if let Ok(page) = &result {
            self.cache.store(&key, page.clone());
        }
        if key != self.current_key {
            return ReceiveOutcome::Stale;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                self.error = None;
                self.rows = page.data;
                if self.state.apply_response(&page.pagination) {
                    self.selection.clear();
                    if let Some(next) = self.request() {
                        return ReceiveOutcome::NeedsRefetch(next);
                    }
                }
                ReceiveOutcome::Applied
            }
            Err(message) => {
                self.error = Some(message);
                self.rows.clear();
                ReceiveOutcome::Applied
            }
        }
    }

    /// Release `previous` after its request was aborted in favour of `next`.
    /// A different key is finished as failed so it can be fetched again later;
    /// the same key stays in flight and `next` takes over its slot.
    pub fn supersede(&mut self, previous: &TableQuery, next: &TableQuery) {
        if previous.cache_key() != next.cache_key() {
            self.receive(previous, Err(ABORTED.to_string()));
        }
    }

    /// Re-issue the current query, bypassing the cache
    pub fn retry(&mut self) -> Option<TableQuery> {
        let key = self.state.to_query().cache_key();
        self.cache.invalidate(&key);
        self.cache.finish(&key);
        self.request()
    }

    /// Forget every cached page, e.g. after a record was written
    pub fn invalidate(&mut self) -> Option<TableQuery> {
        self.cache.invalidate_all();
        self.request()
    }

    // ============================================================================
    // Intents
    // ============================================================================

    pub fn click_header(&mut self, field: &str) -> Option<TableQuery> {
        if !self.state.toggle_sort(field) {
            return None;
        }
        self.selection.clear();
        self.request()
    }

    pub fn go_to_page(&mut self, page: usize) -> Option<TableQuery> {
        if !self.state.set_page(page) {
            return None;
        }
        self.selection.clear();
        self.request()
    }

    pub fn next_page(&mut self) -> Option<TableQuery> {
        if !self.state.next_page() {
            return None;
        }
        self.selection.clear();
        self.request()
    }

    pub fn prev_page(&mut self) -> Option<TableQuery> {
        if !self.state.prev_page() {
            return None;
        }
        self.selection.clear();
        self.request()
    }

    pub fn change_page_size(&mut self, size: usize) -> Option<TableQuery> {
        if !self.state.set_page_size(size) {
            return None;
        }
        self.selection.clear();
        self.request()
    }

    /// Keystroke in the search box; returns the debounce ticket to settle later
    pub fn search_input(&mut self, text: &str) -> u64 {
        self.debouncer.schedule(text)
    }

    /// Debounce timer for `ticket` fired
    pub fn search_settled(&mut self, ticket: u64) -> Option<TableQuery> {
        let text = self.debouncer.settle(ticket)?;
        self.submit_search(&text)
    }

    /// Apply a search immediately, e.g. on Enter
    pub fn submit_search(&mut self, text: &str) -> Option<TableQuery> {
        self.debouncer.cancel();
        if !self.state.set_search(text) {
            return None;
        }
        self.selection.clear();
        self.request()
    }

    pub fn add_filter(&mut self, filter: FilterSpec) -> Option<TableQuery> {
        self.state.add_filter(filter);
        self.selection.clear();
        self.request()
    }

    pub fn remove_filter(&mut self, field: &str) -> Option<TableQuery> {
        if !self.state.remove_filter(field) {
            return None;
        }
        self.selection.clear();
        self.request()
    }

    pub fn clear_filters(&mut self) -> Option<TableQuery> {
        if !self.state.clear_filters() {
            return None;
        }
        self.selection.clear();
        self.request()
    }

    /// Visible columns are part of the request, selection is kept
    pub fn toggle_column(&mut self, key: &str) -> Option<TableQuery> {
        if !self.state.toggle_column(key) {
            return None;
        }
        self.request()
    }

    pub fn load_view(&mut self, view: &SavedView) -> Option<TableQuery> {
        self.state.apply_view(view);
        self.selection.clear();
        self.request()
    }

    pub fn snapshot_view(&self, name: &str) -> SaveViewRequest {
        self.state.snapshot_view(name, &self.config.endpoint)
    }

    // ============================================================================
    // Selection
    // ============================================================================

    fn page_ids(&self) -> Vec<String> {
        self.rows.iter().map(TableRow::row_id).collect()
    }

    pub fn toggle_row(&mut self, id: &str) {
        self.selection.toggle(id);
    }

    pub fn toggle_all_rows(&mut self) {
        let ids = self.page_ids();
        self.selection.toggle_all(ids.iter().map(String::as_str));
    }

    pub fn select_all_rows(&mut self) {
        let ids = self.page_ids();
        self.selection.select_all(ids.iter().map(String::as_str));
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    pub fn header_state(&self) -> HeaderCheckState {
        let ids = self.page_ids();
        self.selection.header_state(ids.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::table::column::ColumnDef;
    use crate::shared::table::query::SortSpec;
    use serde_json::json;

    fn controller() -> TableController<Value> {
        TableController::new(
            TableConfig::new(
                "/api/contacts",
                vec![
                    ColumnDef::new("name", "Name"),
                    ColumnDef::new("email", "Email"),
                    ColumnDef::new("phones", "Phones").not_sortable(),
                ],
            )
            .with_default_sort(vec![SortSpec::desc("createdAt")]),
        )
    }

    fn rows(range: std::ops::RangeInclusive<usize>) -> Vec<Value> {
        range.map(|i| json!({"id": format!("c-{i}"), "name": format!("Contact {i}")})).collect()
    }

    /// Server stand-in holding `total` rows
    fn serve(query: &TableQuery, total: usize) -> PageResponse<Value> {
        let start = query.offset() + 1;
        let end = (query.offset() + query.page_size).min(total);
        let data = if start > end { Vec::new() } else { rows(start..=end) };
        PageResponse::new(data, total, query.page_size)
    }

    #[test]
    fn thirty_contacts_span_two_pages() {
        let mut table = controller();
        let q = table.load().expect("first load fetches");
        assert!(table.is_loading());
        assert_eq!(table.receive(&q, Ok(serve(&q, 30))), ReceiveOutcome::Applied);
        assert_eq!(table.rows().len(), 25);
        assert_eq!(table.state().total_pages, 2);
        assert!(table.state().can_next());

        let q = table.next_page().expect("page 2 fetches");
        assert_eq!(q.page, 2);
        table.receive(&q, Ok(serve(&q, 30)));
        assert_eq!(table.rows().len(), 5);
        assert!(!table.state().can_next());
        assert_eq!(table.next_page(), None);
    }

    #[test]
    fn returning_to_an_aborted_query_fetches_it_again() {
        let mut table = controller();
        let first = table.load().unwrap();
        let searched = table.submit_search("rami").unwrap();
        table.supersede(&first, &searched);

        let back = table
            .submit_search("")
            .expect("aborted query is no longer in flight");
        assert_eq!(back.cache_key(), first.cache_key());
        table.supersede(&searched, &back);
        assert!(table.is_loading());
        assert_eq!(table.error(), None);

        assert_eq!(table.receive(&back, Ok(serve(&back, 30))), ReceiveOutcome::Applied);
        assert_eq!(table.rows().len(), 25);
        assert_eq!(table.error(), None);
    }

    #[test]
    fn retry_while_in_flight_keeps_the_slot() {
        let mut table = controller();
        let first = table.load().unwrap();
        let again = table.retry().expect("retry refetches");
        table.supersede(&first, &again);
        assert!(table.is_loading());
        assert_eq!(table.error(), None);

        assert_eq!(table.receive(&again, Ok(serve(&again, 30))), ReceiveOutcome::Applied);
        assert_eq!(table.rows().len(), 25);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut table = controller();
        let first = table.load().unwrap();
        table.receive(&first, Ok(serve(&first, 100)));

        let sorted_by_name = table.click_header("name").unwrap();
        let sorted_desc = table.click_header("name").unwrap();
        assert_ne!(sorted_by_name.cache_key(), sorted_desc.cache_key());

        assert_eq!(table.receive(&sorted_desc, Ok(serve(&sorted_desc, 100))), ReceiveOutcome::Applied);
        let shown = table.rows().to_vec();
        // older request resolves last
        let late = PageResponse::new(rows(90..=100), 100, 25);
        assert_eq!(table.receive(&sorted_by_name, Ok(late)), ReceiveOutcome::Stale);
        assert_eq!(table.rows(), shown.as_slice());
    }

    #[test]
    fn identical_query_is_not_fetched_twice() {
        let mut table = controller();
        let q = table.load().unwrap();
        assert_eq!(table.click_header("phones"), None);
        assert_eq!(table.retry().map(|r| r.cache_key()), Some(q.cache_key()));

        table.receive(&q, Ok(serve(&q, 60)));
        let page2 = table.go_to_page(2).unwrap();
        table.receive(&page2, Ok(serve(&page2, 60)));

        // back to page 1 is served from cache
        assert_eq!(table.go_to_page(1), None);
        assert!(!table.is_loading());
        assert_eq!(table.rows()[0]["id"], "c-1");
    }

    #[test]
    fn error_is_shown_and_retry_refetches() {
        let mut table = controller();
        let q = table.load().unwrap();
        table.receive(&q, Err("HTTP 500".into()));
        assert_eq!(table.error(), Some("HTTP 500"));
        assert!(!table.is_loading());
        let again = table.retry().expect("retry fetches");
        assert_eq!(again, q);
        table.receive(&again, Ok(serve(&again, 3)));
        assert_eq!(table.error(), None);
        assert_eq!(table.rows().len(), 3);
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let mut table = controller();
        let q = table.load().unwrap();
        table.receive(&q, Ok(PageResponse::empty()));
        assert!(table.is_empty());
        assert_eq!(table.state().empty_colspan(), 4);
    }

    #[test]
    fn shrunk_result_triggers_refetch_of_last_page() {
        let mut table = controller();
        let q = table.load().unwrap();
        table.receive(&q, Ok(serve(&q, 100)));
        let q = table.go_to_page(4).unwrap();
        table.receive(&q, Ok(serve(&q, 100)));

        // rows deleted elsewhere, cache dropped
        table.invalidate();
        let q = table.current_query();
        match table.receive(&q, Ok(serve(&q, 30))) {
            ReceiveOutcome::NeedsRefetch(next) => assert_eq!(next.page, 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn selection_rules() {
        let mut table = controller();
        let q = table.load().unwrap();
        table.receive(&q, Ok(serve(&q, 500)));

        table.select_all_rows();
        assert_eq!(table.selection().len(), 25);
        assert_eq!(table.header_state(), HeaderCheckState::Checked);
        table.toggle_row("c-3");
        assert_eq!(table.header_state(), HeaderCheckState::Indeterminate);

        table.toggle_column("email");
        assert_eq!(table.selection().len(), 24);

        table.next_page();
        assert!(table.selection().is_empty());
    }

    #[test]
    fn debounced_search_uses_latest_text() {
        let mut table = controller();
        let q = table.load().unwrap();
        table.receive(&q, Ok(serve(&q, 100)));
        table.go_to_page(3);

        let t1 = table.search_input("ac");
        let t2 = table.search_input("acme");
        assert_eq!(table.search_settled(t1), None);
        let q = table.search_settled(t2).expect("search fetches");
        assert_eq!(q.search, "acme");
        assert_eq!(q.page, 1);
    }

    #[test]
    fn saved_view_load_resets_page() {
        let mut table = controller();
        let q = table.load().unwrap();
        table.receive(&q, Ok(serve(&q, 500)));
        table.go_to_page(5);

        let view = SavedView {
            id: "1".into(),
            name: "Mine".into(),
            columns: vec!["name".into()],
            sorts: vec![SortSpec::asc("name")],
            filters: vec![],
            page_size: 10,
        };
        let q = table.load_view(&view).unwrap();
        assert_eq!(q.page, 1);
        assert_eq!(q.page_size, 10);
        assert_eq!(q.columns, vec!["name"]);
        assert_eq!(table.snapshot_view("Mine").sorts, view.sorts);
    }
}
