//! Database access: one short-lived connection per interaction.
//!
//! Layout:
//! - `connection.rs`: backend selection from the URL scheme
//! - `dialect.rs`: per-backend introspection SQL
//! - `schema.rs`: table/column listing rendered as text
//! - `executor.rs`: verbatim statement execution and result formatting

pub mod connection;
pub mod dialect;
pub mod executor;
pub mod schema;

pub use connection::DbConnection;
pub use executor::SQL_ERROR_PREFIX;
pub use schema::EMPTY_SCHEMA;
