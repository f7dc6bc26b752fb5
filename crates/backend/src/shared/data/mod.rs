pub mod db;
pub mod entity_table;
pub mod list_query;
pub mod record_store;
pub mod row_codec;
