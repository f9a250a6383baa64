//! Per-backend SQL used for schema introspection.

use sqlx::{Database, MySql, Sqlite};

/// Backend-specific introspection queries.
pub trait Dialect: Database {
    /// Lists user tables; first column is the table name.
    const TABLES_SQL: &'static str;

    /// Lists columns of `table`; first column is the name, second the type.
    fn describe_sql(table: &str) -> String;
}

impl Dialect for MySql {
    const TABLES_SQL: &'static str = "SHOW TABLES";

    fn describe_sql(table: &str) -> String {
        format!("DESCRIBE `{}`", table.replace('`', "``"))
    }
}

impl Dialect for Sqlite {
    const TABLES_SQL: &'static str = "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name";

    fn describe_sql(table: &str) -> String {
        format!(
            "SELECT name, type FROM pragma_table_info('{}')",
            table.replace('\'', "''")
        )
    }
}
