//! Metadata information regarding the queryable entities.

pub mod database;

// re-export without modules
pub use database::*;
