//! SQL AST types and their rendering to parameterized SQL strings.

pub mod sql;
