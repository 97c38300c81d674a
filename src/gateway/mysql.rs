//! MySQL/MariaDB gateway implementation.
//!
//! Uses mysql_async on a private current-thread tokio runtime so the load
//! pipeline itself stays synchronous. Autocommit is switched off for the
//! session; rows become durable only on [`Gateway::commit`].

use mysql_async::prelude::*;
use mysql_async::{Conn, OptsBuilder, Params, Value};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

use super::Gateway;
use crate::error::{LoadError, Result};
use crate::header::quote_ident;

/// MySQL server error code for a duplicate key (index) name.
const ER_DUP_KEYNAME: u16 = 1061;

/// Connection settings for [`MysqlGateway::connect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
        }
    }
}

impl From<mysql_async::Error> for LoadError {
    fn from(err: mysql_async::Error) -> Self {
        match err {
            mysql_async::Error::Server(ref e) if e.code == ER_DUP_KEYNAME => {
                LoadError::IndexExists(e.message.clone())
            }
            _ => LoadError::Database(err.to_string()),
        }
    }
}

/// Gateway over a single MySQL connection.
pub struct MysqlGateway {
    runtime: Runtime,
    conn: Option<Conn>,
}

impl MysqlGateway {
    /// Connect to the server. No database is selected yet.
    pub fn connect(options: &ConnectOptions) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;

        let opts = OptsBuilder::default()
            .ip_or_hostname(options.host.as_str())
            .tcp_port(options.port)
            .user(Some(options.user.as_str()))
            .pass(Some(options.password.as_str()))
            .init(vec!["SET NAMES utf8mb4", "SET autocommit = 0"]);

        let conn = runtime.block_on(Conn::new(opts))?;

        info!(
            "Connected to MySQL: {}@{}:{}",
            options.user, options.host, options.port
        );

        Ok(Self {
            runtime,
            conn: Some(conn),
        })
    }

    fn parts(&mut self) -> Result<(&Runtime, &mut Conn)> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| LoadError::Database("connection already closed".to_string()))?;
        Ok((&self.runtime, conn))
    }

    /// Close the connection, waiting for the server to acknowledge.
    pub fn disconnect(mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            self.runtime.block_on(conn.disconnect())?;
        }
        Ok(())
    }
}

impl Gateway for MysqlGateway {
    fn execute(&mut self, sql: &str, params: &[String]) -> Result<()> {
        let (runtime, conn) = self.parts()?;
        if params.is_empty() {
            runtime.block_on(conn.query_drop(sql))?;
        } else {
            let values: Vec<Value> = params.iter().map(|p| Value::from(p.as_str())).collect();
            runtime.block_on(conn.exec_drop(sql, Params::Positional(values)))?;
        }
        Ok(())
    }

    fn select_database(&mut self, database: &str) -> Result<()> {
        debug!("Selecting database {}", database);
        let (runtime, conn) = self.parts()?;
        runtime.block_on(conn.query_drop(format!("USE {}", quote_ident(database))))?;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let (runtime, conn) = self.parts()?;
        runtime.block_on(conn.query_drop("COMMIT"))?;
        Ok(())
    }
}

impl Drop for MysqlGateway {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(e) = self.runtime.block_on(conn.disconnect()) {
                debug!("Error closing MySQL connection: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_error(code: u16, message: &str) -> mysql_async::Error {
        mysql_async::Error::Server(mysql_async::ServerError {
            code,
            message: message.to_string(),
            state: "42000".to_string(),
        })
    }

    #[test]
    fn test_duplicate_key_name_maps_to_index_exists() {
        let err = LoadError::from(server_error(ER_DUP_KEYNAME, "Duplicate key name 'ids'"));
        match err {
            LoadError::IndexExists(message) => assert_eq!(message, "Duplicate key name 'ids'"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_other_server_errors_map_to_database() {
        let err = LoadError::from(server_error(1170, "BLOB/TEXT column 'id' used in key"));
        assert!(matches!(err, LoadError::Database(_)));
        assert!(err.to_string().contains("BLOB/TEXT column 'id' used in key"));

        let err = LoadError::from(server_error(1045, "Access denied for user 'root'"));
        assert!(matches!(err, LoadError::Database(_)));
    }
}
