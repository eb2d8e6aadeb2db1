//! Domain layer: reconciliation of a dealer feed against persisted inventory

pub mod model;
pub mod repository;
pub mod service;
