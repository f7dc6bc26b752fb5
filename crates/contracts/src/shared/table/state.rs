use super::column::TableConfig;
use super::query::{normalize_page_size, FilterSpec, SortDirection, SortSpec, TableQuery, PAGE_SIZES};
use super::response::Pagination;
use super::saved_view::{SaveViewRequest, SavedView};
use std::collections::HashSet;

/// UI state of one table: the only input of the list request
#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    /// 1-based
    pub page: usize,
    pub page_size: usize,
    /// Ordered by click sequence, most recently added last
    pub sorts: Vec<SortSpec>,
    pub filters: Vec<FilterSpec>,
    /// Already debounced search text
    pub search: String,
    pub visible_columns: HashSet<String>,
    /// Totals reported by the last applied response
    pub total: usize,
    pub total_pages: usize,
    column_order: Vec<String>,
    sortable: HashSet<String>,
}

impl TableState {
    pub fn new(config: &TableConfig) -> Self {
        Self {
            page: 1,
            page_size: config.default_page_size,
            sorts: config.default_sort.clone(),
            filters: Vec::new(),
            search: String::new(),
            visible_columns: config
                .columns
                .iter()
                .filter(|c| c.visible)
                .map(|c| c.key.clone())
                .collect(),
            total: 0,
            total_pages: 0,
            column_order: config.columns.iter().map(|c| c.key.clone()).collect(),
            sortable: config
                .columns
                .iter()
                .filter(|c| c.sortable)
                .map(|c| c.key.clone())
                .collect(),
        }
    }

    // ============================================================================
    // Sorting
    // ============================================================================

    /// Cycle a column: unsorted -> asc -> desc -> unsorted. A newly sorted
    /// column goes to the end of the list; changing direction keeps its slot.
    /// Returns false when the column is not sortable.
    pub fn toggle_sort(&mut self, field: &str) -> bool {
        if !self.sortable.contains(field) {
            return false;
        }
        match self.sorts.iter().position(|s| s.field == field) {
            None => self.sorts.push(SortSpec::asc(field)),
            Some(i) if self.sorts[i].direction == SortDirection::Asc => {
                self.sorts[i].direction = SortDirection::Desc;
            }
            Some(i) => {
                self.sorts.remove(i);
            }
        }
        self.page = 1;
        true
    }

    pub fn sort_of(&self, field: &str) -> Option<(usize, SortDirection)> {
        self.sorts
            .iter()
            .position(|s| s.field == field)
            .map(|i| (i, self.sorts[i].direction))
    }

    // ============================================================================
    // Paging
    // ============================================================================

    fn last_page(&self) -> usize {
        self.total_pages.max(1)
    }

    /// Clamped into `1..=totalPages`; returns whether the page changed
    pub fn set_page(&mut self, page: usize) -> bool {
        let page = page.clamp(1, self.last_page());
        let changed = page != self.page;
        self.page = page;
        changed
    }

    pub fn can_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn can_prev(&self) -> bool {
        self.page > 1
    }

    pub fn next_page(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if !self.can_prev() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Always resets to page 1; sizes outside the pager options are refused
    pub fn set_page_size(&mut self, size: usize) -> bool {
        if !PAGE_SIZES.contains(&size) {
            return false;
        }
        self.page_size = size;
        self.page = 1;
        true
    }

    /// Record totals from a response. When the current page no longer exists
    /// (e.g. a filter shrank the result) the page is pulled back and `true`
    /// is returned so the caller can re-fetch.
    pub fn apply_response(&mut self, pagination: &Pagination) -> bool {
        self.total = pagination.total;
        self.total_pages = pagination.total_pages;
        if self.page > self.last_page() {
            self.page = self.last_page();
            return true;
        }
        false
    }

    // ============================================================================
    // Search and filters
    // ============================================================================

    pub fn set_search(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text == self.search {
            return false;
        }
        self.search = text.to_string();
        self.page = 1;
        true
    }

    /// Replaces any existing filter on the same field
    pub fn add_filter(&mut self, filter: FilterSpec) {
        self.filters.retain(|f| f.field != filter.field);
        self.filters.push(filter);
        self.page = 1;
    }

    pub fn remove_filter(&mut self, field: &str) -> bool {
        let before = self.filters.len();
        self.filters.retain(|f| f.field != field);
        let changed = self.filters.len() != before;
        if changed {
            self.page = 1;
        }
        changed
    }

    pub fn clear_filters(&mut self) -> bool {
        if self.filters.is_empty() {
            return false;
        }
        self.filters.clear();
        self.page = 1;
        true
    }

    // ============================================================================
    // Columns
    // ============================================================================

    pub fn toggle_column(&mut self, key: &str) -> bool {
        if !self.column_order.iter().any(|k| k == key) {
            return false;
        }
        if !self.visible_columns.remove(key) {
            self.visible_columns.insert(key.to_string());
        }
        true
    }

    pub fn is_column_visible(&self, key: &str) -> bool {
        self.visible_columns.contains(key)
    }

    /// Visible keys in the configured column order
    pub fn visible_columns_in_order(&self) -> Vec<String> {
        self.column_order
            .iter()
            .filter(|k| self.visible_columns.contains(*k))
            .cloned()
            .collect()
    }

    /// Width of the "no data" row: visible columns plus the checkbox column
    pub fn empty_colspan(&self) -> usize {
        self.visible_columns.len() + 1
    }

    // ============================================================================
    // Saved views
    // ============================================================================

    pub fn snapshot_view(&self, name: &str, endpoint: &str) -> SaveViewRequest {
        SaveViewRequest {
            name: name.trim().to_string(),
            columns: self.visible_columns_in_order(),
            sorts: self.sorts.clone(),
            filters: self.filters.clone(),
            page_size: self.page_size,
            endpoint: endpoint.to_string(),
        }
    }

    /// Overwrite columns, sorts, filters and page size in one step and go
    /// back to page 1. Unknown column keys in the view are ignored.
    pub fn apply_view(&mut self, view: &SavedView) {
        self.visible_columns = view
            .columns
            .iter()
            .filter(|k| self.column_order.contains(k))
            .cloned()
            .collect();
        self.sorts = view.sorts.clone();
        self.filters = view.filters.clone();
        self.page_size = normalize_page_size(view.page_size);
        self.page = 1;
    }

    pub fn to_query(&self) -> TableQuery {
        TableQuery {
            page: self.page,
            page_size: self.page_size,
            search: self.search.clone(),
            sorts: self.sorts.clone(),
            filters: self.filters.clone(),
            columns: self.visible_columns_in_order(),
        }
    }
}
