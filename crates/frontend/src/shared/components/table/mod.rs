pub mod cell_format;
pub mod column_toggle;
pub mod data_table;
pub mod filter_bar;
pub mod labels;
pub mod saved_views_menu;
pub mod sortable_header_cell;
pub mod table_cell_checkbox;
pub mod table_header_checkbox;

pub use cell_format::{CellDisplay, CellRenderers};
pub use data_table::DataTable;
pub use filter_bar::QuickFilter;
pub use labels::ArabicLabels;
