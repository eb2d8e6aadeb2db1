//! Persistence implementations
//!
//! File-based implementation of the domain's inventory repository.

mod file_inventory_repo;

pub use file_inventory_repo::FileInventoryRepository;
