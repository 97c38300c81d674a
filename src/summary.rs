use std::fmt;

use crate::header::{ColumnName, ID_COLUMN};
use crate::sql_type::SqlType;

/// Outcome of one completed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    /// Target table name (unquoted).
    pub table: String,
    /// Normalized column names, in header order.
    pub columns: Vec<ColumnName>,
    /// Inferred type of each column, same order.
    pub types: Vec<SqlType>,
    /// True if the header had no `id` column and the database numbers rows.
    pub generated_id: bool,
    /// Data rows that voted on the column types.
    pub rows_sampled: usize,
    /// Data rows inserted.
    pub rows_inserted: u64,
    /// Inserted rows that were shorter than the header and got padded.
    pub rows_padded: u64,
    /// Commits issued, the final one included.
    pub commits: usize,
}

impl LoadSummary {
    /// Create a summary for a load that has not inserted anything yet.
    pub fn new(
        table: &str,
        columns: Vec<ColumnName>,
        types: Vec<SqlType>,
        generated_id: bool,
    ) -> Self {
        Self {
            table: table.to_string(),
            columns,
            types,
            generated_id,
            rows_sampled: 0,
            rows_inserted: 0,
            rows_padded: 0,
            commits: 0,
        }
    }
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Table: {}", self.table)?;
        writeln!(f, "  Rows sampled: {}", self.rows_sampled)?;
        writeln!(f, "  Rows inserted: {}", self.rows_inserted)?;
        writeln!(f, "  Rows padded: {}", self.rows_padded)?;
        writeln!(f, "  Commits: {}", self.commits)?;
        if self.generated_id {
            writeln!(f, "  Generated id: {}", ID_COLUMN)?;
        }
        writeln!(f, "  Columns:")?;
        for (i, (name, sql_type)) in self.columns.iter().zip(self.types.iter()).enumerate() {
            writeln!(f, "    {}: {} ({})", i + 1, name, sql_type)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::normalize_header;

    #[test]
    fn test_display_lists_columns() {
        let mut summary = LoadSummary::new(
            "people",
            normalize_header(&["id", "Name"]),
            vec![SqlType::Int, SqlType::Varchar],
            false,
        );
        summary.rows_inserted = 2;
        summary.commits = 1;

        let text = summary.to_string();
        assert!(text.starts_with("Table: people\n"));
        assert!(text.contains("  Rows inserted: 2\n"));
        assert!(text.contains("    2: `name` (varchar(255))\n"));
        assert!(!text.contains("Generated id"));
    }

    #[test]
    fn test_display_notes_generated_id() {
        let summary = LoadSummary::new(
            "scores",
            normalize_header(&["name"]),
            vec![SqlType::Varchar],
            true,
        );
        assert!(summary.to_string().contains("  Generated id: id\n"));
    }
}
