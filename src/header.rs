//! Header normalization: raw CSV header cells to safe, unique column names.

use std::fmt;

use foldhash::{HashMap, HashMapExt, HashSet, HashSetExt};

use crate::infer::regexes::NON_WORD_PATTERN;

/// Name of the column used as primary key.
pub const ID_COLUMN: &str = "id";

/// Base name for header cells that sanitize to nothing.
pub const PLACEHOLDER_COLUMN: &str = "column";

/// A sanitized, de-duplicated column name.
///
/// Holds the bare name; [`ColumnName::quoted`] (and `Display`) give the
/// backtick-quoted identifier used in SQL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnName(String);

impl ColumnName {
    /// The bare (unquoted) name.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name as a quoted MySQL identifier.
    pub fn quoted(&self) -> String {
        quote_ident(&self.0)
    }

    /// Returns true for the column literally named `id`.
    #[inline]
    pub fn is_id(&self) -> bool {
        self.0 == ID_COLUMN
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.quoted())
    }
}

/// Quote a MySQL identifier, doubling embedded backticks.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Lower-case the name, collapse each run of non-word characters into one
/// underscore and trim underscores from both ends.
pub fn sanitize_column_name(name: &str) -> String {
    let lower = name.to_lowercase();
    NON_WORD_PATTERN
        .replace_all(&lower, "_")
        .trim_matches('_')
        .to_string()
}

/// Normalize a raw header row.
///
/// The output has the same length and order as `row`. Cells that sanitize to
/// an empty string are named [`PLACEHOLDER_COLUMN`]. Repeated names get the
/// occurrence count appended (`date`, `date2`, `date3`, ...); if that name is
/// itself taken the count keeps increasing until the name is unique.
pub fn normalize_header<S: AsRef<str>>(row: &[S]) -> Vec<ColumnName> {
    let mut occurrences: HashMap<String, usize> = HashMap::with_capacity(row.len());
    let mut produced: HashSet<String> = HashSet::with_capacity(row.len());
    let mut header = Vec::with_capacity(row.len());

    for raw in row {
        let mut base = sanitize_column_name(raw.as_ref());
        if base.is_empty() {
            base = PLACEHOLDER_COLUMN.to_string();
        }
        let count = occurrences.entry(base.clone()).or_insert(0);

        let name = loop {
            *count += 1;
            let candidate = if *count > 1 {
                format!("{base}{count}")
            } else {
                base.clone()
            };
            if produced.insert(candidate.clone()) {
                break candidate;
            }
        };

        header.push(ColumnName(name));
    }

    header
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(row: &[&str]) -> Vec<String> {
        normalize_header(row)
            .iter()
            .map(|c| c.as_str().to_string())
            .collect()
    }

    #[test]
    fn test_sanitize_column_name() {
        assert_eq!(sanitize_column_name("First Name"), "first_name");
        assert_eq!(sanitize_column_name("  Total $ (USD) "), "total_usd");
        assert_eq!(sanitize_column_name("__already__snake__"), "already__snake");
        assert_eq!(sanitize_column_name("Größe"), "größe");
        assert_eq!(sanitize_column_name("$$$"), "");
    }

    #[test]
    fn test_duplicates_get_counts() {
        assert_eq!(names(&["Total $", "Total $"]), vec!["total", "total2"]);
        assert_eq!(
            names(&["date", "Date", "DATE!"]),
            vec!["date", "date2", "date3"]
        );
    }

    #[test]
    fn test_empty_and_duplicate_names_stay_unique() {
        let out = names(&["", "", "Id"]);
        assert_eq!(out, vec!["column", "column2", "id"]);
    }

    #[test]
    fn test_no_name_is_empty() {
        let out = names(&["$$$", " ", "_", "column", "Column!"]);
        assert_eq!(
            out,
            vec!["column", "column2", "column3", "column4", "column5"]
        );
        assert!(out.iter().all(|name| !name.is_empty()));
    }

    #[test]
    fn test_suffix_collision_is_skipped() {
        let out = names(&["a", "a2", "a"]);
        assert_eq!(out, vec!["a", "a2", "a3"]);
    }

    #[test]
    fn test_output_is_pairwise_unique() {
        let row = ["x", "x", "x2", "X 2", "", "_", "x"];
        let out = normalize_header(&row);
        let unique: std::collections::HashSet<_> = out.iter().collect();
        assert_eq!(out.len(), row.len());
        assert_eq!(unique.len(), out.len());
    }

    #[test]
    fn test_quoting() {
        let out = normalize_header(&["Order Date", "id"]);
        assert_eq!(out[0].to_string(), "`order_date`");
        assert!(out[1].is_id());
        assert_eq!(quote_ident("we`ird"), "`we``ird`");
    }
}
