use sqlx::mysql::MySqlConnection;
use sqlx::sqlite::SqliteConnection;
use sqlx::{ColumnIndex, Decode, Executor, MySql, Row, Sqlite};
use std::fmt::Write as _;

use crate::db::dialect::Dialect;

pub const EMPTY_SCHEMA: &str = "The database is empty. No tables found.";

/// A table name with its `(column, type)` pairs.
type TableColumns = (String, Vec<(String, String)>);

/// Reads every user table and its columns over a concrete connection type.
macro_rules! schema_reader {
    ($(#[$meta:meta])* $name:ident, $db:ty, $conn:ty) => {
        $(#[$meta])*
        pub async fn $name(conn: &mut $conn) -> Result<String, sqlx::Error> {
            let tables = (&mut *conn)
                .fetch_all(sqlx::raw_sql(<$db as Dialect>::TABLES_SQL))
                .await?;

            let mut described: Vec<TableColumns> = Vec::with_capacity(tables.len());
            for table in &tables {
                let name = text_at(table, 0);
                let describe = <$db as Dialect>::describe_sql(&name);
                let columns = (&mut *conn).fetch_all(sqlx::raw_sql(&describe)).await?;
                let columns = columns
                    .iter()
                    .map(|c| (text_at(c, 0), text_at(c, 1)))
                    .collect();
                described.push((name, columns));
            }
            Ok(render_schema(&described))
        }
    };
}

schema_reader!(
    /// `SHOW TABLES` then `DESCRIBE` per table.
    read_mysql_schema,
    MySql,
    MySqlConnection
);
schema_reader!(
    /// `sqlite_master` then `pragma_table_info` per table.
    read_sqlite_schema,
    Sqlite,
    SqliteConnection
);

/// Render tables and columns as plain text.
///
/// ```text
/// Table: users
///   - id (int)
///   - email (varchar(255))
/// ```
fn render_schema(tables: &[TableColumns]) -> String {
    if tables.is_empty() {
        return EMPTY_SCHEMA.to_string();
    }

    let mut out = String::new();
    for (name, columns) in tables {
        let _ = writeln!(out, "Table: {name}");
        for (column, ty) in columns {
            let _ = writeln!(out, "  - {column} ({ty})");
        }
    }
    out
}

/// Read a cell as text, whatever its declared type.
///
/// Simple-protocol results arrive as text, so the unchecked decode works for
/// numbers and dates too; non-UTF-8 payloads fall back to a lossy read.
pub(crate) fn text_at<R>(row: &R, idx: usize) -> String
where
    R: Row,
    for<'r> Option<String>: Decode<'r, R::Database>,
    for<'r> Option<Vec<u8>>: Decode<'r, R::Database>,
    usize: ColumnIndex<R>,
{
    match row.try_get_unchecked::<Option<String>, _>(idx) {
        Ok(Some(text)) => text,
        Ok(None) => "NULL".to_string(),
        Err(_) => match row.try_get_unchecked::<Option<Vec<u8>>, _>(idx) {
            Ok(Some(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
            Ok(None) => "NULL".to_string(),
            Err(_) => "?".to_string(),
        },
    }
}
