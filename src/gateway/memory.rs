//! In-memory gateway that records every statement.
//!
//! Backs `--dry-run` and the test suite.

use std::fmt;

use super::Gateway;
use crate::error::{LoadError, Result};

/// One executed statement with its bound values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<String>,
}

impl Statement {
    /// Returns true for a row insert.
    pub fn is_insert(&self) -> bool {
        self.sql.starts_with("INSERT INTO ")
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}", self.sql)
        } else {
            write!(f, "{} -- {:?}", self.sql, self.params)
        }
    }
}

/// Gateway that keeps statements in memory instead of talking to a server.
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    statements: Vec<Statement>,
    /// Statement count at each commit.
    commits: Vec<usize>,
    database: Option<String>,
    index_exists: bool,
    fail_after_inserts: Option<usize>,
    inserts: usize,
}

impl MemoryGateway {
    /// Create an empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every `CREATE INDEX` as if the index already existed.
    pub fn with_existing_index(mut self) -> Self {
        self.index_exists = true;
        self
    }

    /// Fail every INSERT after the first `n` succeed.
    pub fn fail_after_inserts(mut self, n: usize) -> Self {
        self.fail_after_inserts = Some(n);
        self
    }

    /// All statements executed so far, in order.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Bound values of every INSERT executed so far, in order.
    pub fn inserted_rows(&self) -> Vec<&[String]> {
        self.statements
            .iter()
            .filter(|s| s.is_insert())
            .map(|s| s.params.as_slice())
            .collect()
    }

    /// Bound values of every INSERT covered by a commit.
    pub fn committed_rows(&self) -> Vec<&[String]> {
        let committed = self.commits.last().copied().unwrap_or(0);
        self.statements[..committed]
            .iter()
            .filter(|s| s.is_insert())
            .map(|s| s.params.as_slice())
            .collect()
    }

    /// Number of commits issued.
    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    /// Statement count at each commit.
    pub fn commit_points(&self) -> &[usize] {
        &self.commits
    }

    /// The currently selected database.
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }
}

impl Gateway for MemoryGateway {
    fn execute(&mut self, sql: &str, params: &[String]) -> Result<()> {
        if self.index_exists && sql.starts_with("CREATE INDEX ") {
            return Err(LoadError::IndexExists(sql.to_string()));
        }

        let statement = Statement {
            sql: sql.to_string(),
            params: params.to_vec(),
        };

        if statement.is_insert() {
            if self.fail_after_inserts.is_some_and(|n| self.inserts >= n) {
                return Err(LoadError::Database(format!(
                    "insert {} rejected",
                    self.inserts + 1
                )));
            }
            self.inserts += 1;
        }

        self.statements.push(statement);
        Ok(())
    }

    fn select_database(&mut self, database: &str) -> Result<()> {
        self.database = Some(database.to_string());
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.commits.push(self.statements.len());
        Ok(())
    }
}
