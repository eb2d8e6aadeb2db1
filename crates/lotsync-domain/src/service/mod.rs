//! Domain services

pub mod classifier;
pub mod commit;
pub mod runner;
pub mod inventory_set;

pub use classifier::classify;
pub use commit::full_replace;
pub use runner::FullReplaceRunner;
pub use inventory_set::InventorySet;
