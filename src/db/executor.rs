use futures::TryStreamExt;
use sqlx::mysql::MySqlConnection;
use sqlx::sqlite::SqliteConnection;
use sqlx::{Column, ColumnIndex, Decode, Either, Executor, Row, Statement};
use tracing::{debug, warn};

use crate::db::schema::text_at;

pub const SQL_ERROR_PREFIX: &str = "SQL Error:";

enum Outcome<R> {
    Rows(Vec<R>),
    /// No rows came back; `columns` is what the statement would have returned.
    Empty { columns: Vec<String>, affected: u64 },
}

/// Runs `sql` verbatim over a concrete connection type and describes the
/// outcome as text. Never fails: driver errors come back as
/// `SQL Error: <message>`.
macro_rules! statement_executor {
    ($(#[$meta:meta])* $name:ident, $conn:ty) => {
        $(#[$meta])*
        pub async fn $name(conn: &mut $conn, sql: &str) -> String {
            let outcome = async {
                let mut rows = Vec::new();
                let mut affected = 0u64;

                let mut stream = (&mut *conn).fetch_many(sqlx::raw_sql(sql));
                while let Some(step) = stream.try_next().await? {
                    match step {
                        Either::Left(done) => affected += done.rows_affected(),
                        Either::Right(row) => rows.push(row),
                    }
                }
                drop(stream);

                if !rows.is_empty() {
                    return Ok(Outcome::Rows(rows));
                }
                // A query that matched nothing still has a shape worth showing.
                let columns = match (&mut *conn).prepare(sql).await {
                    Ok(stmt) => stmt.columns().iter().map(|c| c.name().to_string()).collect(),
                    Err(e) => {
                        debug!(error = %e, "no column metadata for empty result");
                        Vec::new()
                    }
                };
                Ok::<_, sqlx::Error>(Outcome::Empty { columns, affected })
            }
            .await;

            match outcome {
                Ok(Outcome::Rows(rows)) => format_rows(&rows),
                Ok(Outcome::Empty { columns, .. }) if !columns.is_empty() => {
                    header_lines(&columns).join("\n")
                }
                Ok(Outcome::Empty { affected, .. }) => {
                    format!("Query executed successfully. {affected} rows affected.")
                }
                Err(e) => {
                    warn!(error = %e, "statement failed");
                    format!("{SQL_ERROR_PREFIX} {}", driver_message(&e))
                }
            }
        }
    };
}

statement_executor!(execute_mysql, MySqlConnection);
statement_executor!(execute_sqlite, SqliteConnection);

/// Column names joined by ` | ` and a dash rule of the same width.
fn header_lines<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let header = names
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" | ");
    let rule = "-".repeat(header.chars().count());
    vec![header, rule]
}

/// Header of column names, a dash rule, then one ` | `-joined line per row.
fn format_rows<R>(rows: &[R]) -> String
where
    R: Row,
    for<'r> Option<String>: Decode<'r, R::Database>,
    for<'r> Option<Vec<u8>>: Decode<'r, R::Database>,
    usize: ColumnIndex<R>,
{
    let Some(first) = rows.first() else {
        return String::new();
    };

    let names = first.columns().iter().map(|c| c.name()).collect::<Vec<_>>();
    let mut out = header_lines(&names);
    out.extend(rows.iter().map(|row| {
        (0..row.len())
            .map(|idx| text_at(row, idx))
            .collect::<Vec<_>>()
            .join(" | ")
    }));
    out.join("\n")
}

/// Database-reported message when there is one, else the full error text.
fn driver_message(e: &sqlx::Error) -> String {
    match e {
        sqlx::Error::Database(db) => match db.code() {
            Some(code) => format!("{code}: {}", db.message()),
            None => db.message().to_string(),
        },
        other => other.to_string(),
    }
}
