//! Persistent store for dealer inventory rows

pub mod inventory;

pub use inventory::InventoryStore;
