pub mod access;
pub mod auth;
pub mod company_service;
pub mod dashboard_service;
pub mod directory_service;
pub mod document_service;
pub mod inventory_service;
pub mod invoice_service;
pub mod line_items;
pub mod team_service;
