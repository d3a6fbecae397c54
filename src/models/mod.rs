pub mod access;
pub mod auth;
pub mod company;
pub mod crm;
pub mod dashboard;
pub mod inventory;
pub mod invoice;
pub mod profile;
