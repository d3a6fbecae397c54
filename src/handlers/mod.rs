pub mod auth;
pub mod companies;
pub mod crm;
pub mod dashboard;
pub mod inventory;
pub mod invoices;
pub mod line_items;
pub mod navigation;
pub mod profile;
pub mod team;
