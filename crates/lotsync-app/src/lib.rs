//! Application service layer - use cases, config

pub mod app;
pub mod config;
pub mod repository;
