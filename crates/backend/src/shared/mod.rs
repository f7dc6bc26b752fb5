pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod logging;
pub mod records;
pub mod saved_views;
