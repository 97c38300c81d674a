//! Schema generation and the SQL statements issued during a load.

use std::fmt;

use crate::error::{LoadError, Result};
use crate::header::{quote_ident, ColumnName, ID_COLUMN};
use crate::sql_type::SqlType;

/// Longest identifier MySQL accepts, in characters.
const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Character set of created tables.
pub const TABLE_CHARSET: &str = "utf8mb4";

/// Name of the secondary index created on `id`.
pub const ID_INDEX: &str = "ids";

/// How the primary key column is provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdPolicy {
    /// Use the CSV's `id` column if present; otherwise declare `id` as an
    /// auto-increment column filled in by the database.
    #[default]
    AutoIncrement,
    /// Reject a header without an `id` column.
    Require,
}

/// Validate a table or database name supplied by the caller.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(LoadError::InvalidConfig(
            "Identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(LoadError::InvalidConfig(format!(
            "Identifier contains a null byte: {name:?}"
        )));
    }

    if name.chars().count() > MAX_IDENTIFIER_LENGTH {
        return Err(LoadError::InvalidConfig(format!(
            "Identifier exceeds {MAX_IDENTIFIER_LENGTH} characters: {name:?}"
        )));
    }

    Ok(())
}

/// `CREATE DATABASE IF NOT EXISTS` statement.
pub fn create_database_sql(database: &str) -> String {
    format!("CREATE DATABASE IF NOT EXISTS {};", quote_ident(database))
}

/// `DROP TABLE IF EXISTS` statement.
pub fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {};", quote_ident(table))
}

/// Secondary index on `id`.
pub fn create_index_sql(table: &str) -> String {
    format!(
        "CREATE INDEX {ID_INDEX} ON {} ({ID_COLUMN});",
        quote_ident(table)
    )
}

/// One column definition of the generated table.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SchemaColumn {
    name: ColumnName,
    sql_type: SqlType,
}

/// Table definition derived from a normalized header and its inferred types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    table: String,
    /// Inferred type of the CSV's own `id` column, if it has one.
    id_type: Option<SqlType>,
    /// Every header column except `id`, in header order.
    columns: Vec<SchemaColumn>,
    /// Every header column, in header order; the bind order of each INSERT.
    insert_columns: Vec<ColumnName>,
}

impl Schema {
    /// Build the schema for `table`.
    ///
    /// `header` and `types` must have the same length.
    pub fn new(
        table: &str,
        header: &[ColumnName],
        types: &[SqlType],
        id_policy: IdPolicy,
    ) -> Result<Self> {
        if header.len() != types.len() {
            return Err(LoadError::ColumnCountMismatch {
                header: header.len(),
                types: types.len(),
            });
        }

        let mut id_type = None;
        let mut columns = Vec::with_capacity(header.len());
        for (name, &sql_type) in header.iter().zip(types) {
            if name.is_id() {
                id_type = Some(sql_type);
            } else {
                columns.push(SchemaColumn {
                    name: name.clone(),
                    sql_type,
                });
            }
        }

        match id_type {
            Some(sql_type) if !sql_type.is_keyable() => {
                return Err(LoadError::UnkeyableId(sql_type));
            }
            None if id_policy == IdPolicy::Require => return Err(LoadError::MissingIdColumn),
            _ => {}
        }

        Ok(Self {
            table: table.to_string(),
            id_type,
            columns,
            insert_columns: header.to_vec(),
        })
    }

    /// Target table name (unquoted).
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Number of values bound per INSERT.
    pub fn width(&self) -> usize {
        self.insert_columns.len()
    }

    /// Returns true if the database generates `id` values.
    pub fn has_generated_id(&self) -> bool {
        self.id_type.is_none()
    }

    fn id_definition(&self) -> String {
        match self.id_type {
            Some(sql_type) => format!("{} {sql_type} NOT NULL", quote_ident(ID_COLUMN)),
            None => format!("{} int NOT NULL AUTO_INCREMENT", quote_ident(ID_COLUMN)),
        }
    }

    /// The `CREATE TABLE IF NOT EXISTS` statement.
    pub fn create_table_sql(&self) -> String {
        let mut sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {},\n",
            quote_ident(&self.table),
            self.id_definition()
        );
        for column in &self.columns {
            sql.push_str(&format!("    {} {},\n", column.name, column.sql_type));
        }
        sql.push_str(&format!(
            "    PRIMARY KEY ({ID_COLUMN})\n) DEFAULT CHARSET={TABLE_CHARSET};"
        ));
        sql
    }

    /// The parameterized INSERT binding every header column positionally.
    pub fn insert_sql(&self) -> String {
        let names: Vec<String> = self.insert_columns.iter().map(ColumnName::quoted).collect();
        let markers = vec!["?"; self.insert_columns.len()];
        format!(
            "INSERT INTO {} ({}) VALUES ({});",
            quote_ident(&self.table),
            names.join(", "),
            markers.join(", ")
        )
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.create_table_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::normalize_header;

    #[test]
    fn test_id_column_is_excluded_and_keyed() {
        let header = normalize_header(&["id", "name"]);
        let schema = Schema::new(
            "people",
            &header,
            &[SqlType::Int, SqlType::Varchar],
            IdPolicy::default(),
        )
        .unwrap();

        assert_eq!(
            schema.create_table_sql(),
            "CREATE TABLE IF NOT EXISTS `people` (\n    `id` int NOT NULL,\n    `name` varchar(255),\n    PRIMARY KEY (id)\n) DEFAULT CHARSET=utf8mb4;"
        );
        assert_eq!(schema.width(), 2);
        assert!(!schema.has_generated_id());
        assert_eq!(
            schema.insert_sql(),
            "INSERT INTO `people` (`id`, `name`) VALUES (?, ?);"
        );
    }

    #[test]
    fn test_missing_id_is_generated() {
        let header = normalize_header(&["When", "Amount"]);
        let schema = Schema::new(
            "t",
            &header,
            &[SqlType::DateTime, SqlType::Double],
            IdPolicy::AutoIncrement,
        )
        .unwrap();

        let ddl = schema.create_table_sql();
        assert!(ddl.contains("`id` int NOT NULL AUTO_INCREMENT,"));
        assert!(ddl.contains("`when` datetime,\n    `amount` double,\n    PRIMARY KEY (id)"));
        assert!(schema.has_generated_id());
        assert_eq!(schema.insert_sql(), "INSERT INTO `t` (`when`, `amount`) VALUES (?, ?);");
    }

    #[test]
    fn test_require_id_policy() {
        let header = normalize_header(&["name"]);
        let err = Schema::new("t", &header, &[SqlType::Varchar], IdPolicy::Require).unwrap_err();
        assert!(matches!(err, LoadError::MissingIdColumn));

        let header = normalize_header(&["ID", "name"]);
        assert!(Schema::new("t", &header, &[SqlType::Int, SqlType::Varchar], IdPolicy::Require).is_ok());
    }

    #[test]
    fn test_text_id_is_rejected() {
        let header = normalize_header(&["id", "name"]);
        let err = Schema::new(
            "t",
            &header,
            &[SqlType::Text, SqlType::Varchar],
            IdPolicy::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::UnkeyableId(SqlType::Text)));

        // Long values in other columns are fine
        let schema = Schema::new(
            "t",
            &header,
            &[SqlType::Varchar, SqlType::Text],
            IdPolicy::default(),
        )
        .unwrap();
        assert!(schema.create_table_sql().contains("`id` varchar(255) NOT NULL,"));
        assert!(schema.create_table_sql().contains("`name` text,"));
    }

    #[test]
    fn test_column_count_mismatch() {
        let header = normalize_header(&["a", "b"]);
        let err = Schema::new("t", &header, &[SqlType::Int], IdPolicy::default()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::ColumnCountMismatch {
                header: 2,
                types: 1
            }
        ));
    }

    #[test]
    fn test_statement_shapes() {
        assert_eq!(create_database_sql("test"), "CREATE DATABASE IF NOT EXISTS `test`;");
        assert_eq!(drop_table_sql("sales"), "DROP TABLE IF EXISTS `sales`;");
        assert_eq!(create_index_sql("sales"), "CREATE INDEX ids ON `sales` (id);");
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("sales_2024").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("a\0b").is_err());
        assert!(validate_identifier(&"x".repeat(65)).is_err());
    }
}
