pub mod table;
pub mod validation;
