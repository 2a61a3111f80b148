//! Static description of the entities a query can be built against.

pub mod metadata;
