//! Generic table controller
//!
//! A sans-IO state machine behind every CRM data grid: it owns paging, sort,
//! filter, search and column state, serializes it into the list request,
//! decides which responses are still current, and keeps row selection and
//! saved views consistent. The frontend component only performs the HTTP
//! calls and renders whatever the controller holds.

mod cache;
mod column;
mod controller;
mod debounce;
mod export;
mod query;
mod response;
mod saved_view;
mod selection;
mod state;
mod tracker;

pub use cache::QueryCache;
pub use column::{ColumnDef, TableConfig, TableFeatures};
pub use controller::{ReceiveOutcome, TableController, TableRow, ABORTED};
pub use debounce::{SearchDebouncer, SEARCH_DEBOUNCE_MS};
pub use export::{export_filename, export_url, ExportFormat};
pub use query::{
    normalize_page_size, FilterOperator, FilterSpec, ListParams, QueryParamError, SortDirection,
    SortSpec, TableQuery, DEFAULT_PAGE_SIZE, MAX_PAGE, PAGE_SIZES,
};
pub use response::{PageResponse, Pagination};
pub use saved_view::{SaveViewRequest, SavedView, SAVED_VIEWS_ENDPOINT};
pub use selection::{HeaderCheckState, RowSelection};
pub use state::TableState;
pub use tracker::RequestTracker;
