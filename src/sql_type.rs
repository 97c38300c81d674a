use std::fmt;

/// MySQL column type inferred for a CSV field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SqlType {
    /// Whole number that fits in a signed 32-bit integer.
    Int,
    /// Whole number whose magnitude exceeds 2147483647.
    BigInt,
    /// Floating point number.
    Double,
    /// Date with time of day.
    DateTime,
    /// Date without time component.
    Date,
    /// Time of day without date component.
    Time,
    /// String longer than 255 characters.
    Text,
    /// Any other string (fallback type).
    #[default]
    Varchar,
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl SqlType {
    /// Number of variants in the SqlType enum.
    pub const COUNT: usize = 8;

    /// Longest string, in characters, that still fits the `varchar(255)` bucket.
    pub const VARCHAR_MAX_CHARS: usize = 255;

    /// Returns the index for this type (0-7), suitable for array indexing.
    #[inline]
    pub const fn as_index(&self) -> usize {
        match self {
            SqlType::Int => 0,
            SqlType::BigInt => 1,
            SqlType::Double => 2,
            SqlType::DateTime => 3,
            SqlType::Date => 4,
            SqlType::Time => 5,
            SqlType::Text => 6,
            SqlType::Varchar => 7,
        }
    }

    /// Inverse of [`SqlType::as_index`].
    pub const fn from_index(index: usize) -> Option<SqlType> {
        match index {
            0 => Some(SqlType::Int),
            1 => Some(SqlType::BigInt),
            2 => Some(SqlType::Double),
            3 => Some(SqlType::DateTime),
            4 => Some(SqlType::Date),
            5 => Some(SqlType::Time),
            6 => Some(SqlType::Text),
            7 => Some(SqlType::Varchar),
            _ => None,
        }
    }

    /// The type name as written in a column definition.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Int => "int",
            SqlType::BigInt => "bigint",
            SqlType::Double => "double",
            SqlType::DateTime => "datetime",
            SqlType::Date => "date",
            SqlType::Time => "time",
            SqlType::Text => "text",
            SqlType::Varchar => "varchar(255)",
        }
    }

    /// Returns true if MySQL can index this type without a prefix length.
    #[inline]
    pub fn is_keyable(&self) -> bool {
        !matches!(self, SqlType::Text)
    }

    /// Types that win a column outright when observed in even one cell,
    /// in the order they are checked.
    pub const DOMINANT: [SqlType; 2] = [SqlType::Text, SqlType::BigInt];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip_covers_all_variants() {
        for i in 0..SqlType::COUNT {
            let t = SqlType::from_index(i).unwrap();
            assert_eq!(t.as_index(), i);
        }
        assert_eq!(SqlType::from_index(SqlType::COUNT), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(SqlType::Varchar.to_string(), "varchar(255)");
        assert_eq!(SqlType::BigInt.to_string(), "bigint");
        assert_eq!(SqlType::default(), SqlType::Varchar);
    }

    #[test]
    fn test_only_text_needs_a_key_prefix() {
        assert!(!SqlType::Text.is_keyable());
        assert!(SqlType::Varchar.is_keyable());
        assert!(SqlType::BigInt.is_keyable());
        assert!(SqlType::DateTime.is_keyable());
    }
}
