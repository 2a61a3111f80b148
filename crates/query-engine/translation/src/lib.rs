//! Translate incoming query options to a parameterized SQL statement.

pub mod translation;
