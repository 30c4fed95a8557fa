//! Database layer
//!
//! PostgreSQL connection pooling and schema migrations.

pub mod migrations;
pub mod pool;

pub use pool::Database;
