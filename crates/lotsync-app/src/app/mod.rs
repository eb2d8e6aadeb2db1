//! Application use cases

pub mod import_service;

pub use import_service::{list_inventory, list_lots, run_import, ImportOptions};
