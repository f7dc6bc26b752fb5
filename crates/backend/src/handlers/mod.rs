pub mod a005_lead;
pub mod collections;
pub mod dev_seed;
pub mod saved_views;
