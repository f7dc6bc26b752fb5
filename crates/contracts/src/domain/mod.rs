pub mod a001_user;
pub mod a002_team;
pub mod a003_account;
pub mod a004_contact;
pub mod a005_lead;
pub mod a006_opportunity;
pub mod a007_ticket;
pub mod a008_quote;
pub mod a009_invoice;
pub mod a010_subscription;
pub mod a011_activity;
pub mod a012_audit_log;
pub mod a013_tag;
pub mod a014_custom_field;
pub mod common;
