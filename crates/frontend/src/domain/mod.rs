pub mod a003_account;
pub mod a004_contact;
pub mod a006_opportunity;
pub mod a007_ticket;
