use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::db::{executor, schema};
use crate::error::CourierError;

/// One connection for one interaction; the URL scheme picks the backend.
pub enum DbConnection {
    MySql(MySqlConnection),
    Sqlite(SqliteConnection),
}

impl DbConnection {
    pub async fn connect(url: &str) -> Result<Self, CourierError> {
        if url.starts_with("mysql:") {
            let opts = MySqlConnectOptions::from_str(url).map_err(CourierError::DatabaseConnect)?;
            let conn = opts.connect().await.map_err(CourierError::DatabaseConnect)?;
            debug!("connected to MySQL");
            Ok(Self::MySql(conn))
        } else if url.starts_with("sqlite:") {
            let opts = SqliteConnectOptions::from_str(url)
                .map_err(CourierError::DatabaseConnect)?
                .create_if_missing(true);
            let conn = opts.connect().await.map_err(CourierError::DatabaseConnect)?;
            debug!("connected to SQLite");
            Ok(Self::Sqlite(conn))
        } else {
            let scheme = url.split_once(':').map(|(s, _)| s).unwrap_or(url);
            Err(CourierError::InvalidDatabaseUrl(format!(
                "scheme `{scheme}` is not supported; use mysql:// or sqlite:"
            )))
        }
    }

    pub async fn read_schema(&mut self) -> Result<String, CourierError> {
        let schema = match self {
            Self::MySql(conn) => schema::read_mysql_schema(conn).await?,
            Self::Sqlite(conn) => schema::read_sqlite_schema(conn).await?,
        };
        Ok(schema)
    }

    pub async fn execute(&mut self, sql: &str) -> String {
        match self {
            Self::MySql(conn) => executor::execute_mysql(conn, sql).await,
            Self::Sqlite(conn) => executor::execute_sqlite(conn, sql).await,
        }
    }

    pub async fn close(self) {
        let res = match self {
            Self::MySql(conn) => conn.close().await,
            Self::Sqlite(conn) => conn.close().await,
        };
        if let Err(e) = res {
            warn!(error = %e, "failed to close database connection cleanly");
        }
    }
}
