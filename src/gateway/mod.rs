//! Database Gateway: the capability the load pipeline writes through.
//!
//! The pipeline only ever executes statements, selects a database and commits.
//! Connection setup belongs to the concrete gateway.

mod memory;
#[cfg(feature = "mysql")]
mod mysql;

pub use memory::{MemoryGateway, Statement};
#[cfg(feature = "mysql")]
pub use mysql::{ConnectOptions, MysqlGateway};

use crate::error::Result;

/// Statement execution and commit on one exclusively owned connection.
pub trait Gateway {
    /// Execute one statement, binding `params` positionally to its `?` markers.
    ///
    /// A failed `CREATE INDEX` on an index that already exists must be
    /// reported as [`LoadError::IndexExists`](crate::LoadError::IndexExists).
    fn execute(&mut self, sql: &str, params: &[String]) -> Result<()>;

    /// Make `database` the default database for later statements.
    fn select_database(&mut self, database: &str) -> Result<()>;

    /// Durably commit everything executed so far.
    fn commit(&mut self) -> Result<()>;
}

impl<G: Gateway + ?Sized> Gateway for &mut G {
    fn execute(&mut self, sql: &str, params: &[String]) -> Result<()> {
        (**self).execute(sql, params)
    }

    fn select_database(&mut self, database: &str) -> Result<()> {
        (**self).select_database(database)
    }

    fn commit(&mut self) -> Result<()> {
        (**self).commit()
    }
}
