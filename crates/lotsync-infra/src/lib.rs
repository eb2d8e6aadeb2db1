//! Infrastructure layer - persistence implementations, feed importers

pub mod feed;
pub mod persistence;
