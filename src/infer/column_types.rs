//! Reduction of per-cell observations to one type per column.

use std::io::Read;

use super::type_detection::detect_cell_type;
use crate::error::{LoadError, Result};
use crate::sample::SampleSize;
use crate::source::CsvSource;
use crate::sql_type::SqlType;

/// Ordered count of the types observed in one column.
///
/// Besides the count, each type remembers when it was first seen so that ties
/// in the mode resolve to the earliest observed type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTally {
    counts: [usize; SqlType::COUNT],
    first_seen: [usize; SqlType::COUNT],
    observations: usize,
}

impl Default for TypeTally {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTally {
    /// Create an empty tally.
    pub const fn new() -> Self {
        Self {
            counts: [0; SqlType::COUNT],
            first_seen: [usize::MAX; SqlType::COUNT],
            observations: 0,
        }
    }

    /// Record one observed cell type.
    #[inline]
    pub fn observe(&mut self, sql_type: SqlType) {
        let idx = sql_type.as_index();
        if self.counts[idx] == 0 {
            self.first_seen[idx] = self.observations;
        }
        self.counts[idx] += 1;
        self.observations += 1;
    }

    /// Number of cells observed.
    #[inline]
    pub fn len(&self) -> usize {
        self.observations
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.observations == 0
    }

    /// How many cells were classified as `sql_type`.
    #[inline]
    pub fn count(&self, sql_type: SqlType) -> usize {
        self.counts[sql_type.as_index()]
    }

    /// The winning type for the column.
    ///
    /// `text` wins if seen at all, then `bigint`; otherwise the most frequent
    /// type, earliest first on ties. An empty tally is `varchar(255)`.
    pub fn winner(&self) -> SqlType {
        if self.is_empty() {
            return SqlType::Varchar;
        }

        if let Some(dominant) = SqlType::DOMINANT.into_iter().find(|&t| self.count(t) > 0) {
            return dominant;
        }

        (0..SqlType::COUNT)
            .filter(|&i| self.counts[i] > 0)
            .max_by(|&a, &b| {
                self.counts[a]
                    .cmp(&self.counts[b])
                    .then_with(|| self.first_seen[b].cmp(&self.first_seen[a]))
            })
            .and_then(SqlType::from_index)
            .unwrap_or_default()
    }
}

impl FromIterator<SqlType> for TypeTally {
    fn from_iter<I: IntoIterator<Item = SqlType>>(iter: I) -> Self {
        let mut tally = TypeTally::new();
        for t in iter {
            tally.observe(t);
        }
        tally
    }
}

/// Result of the sampling pass: the raw header and one tally per column.
#[derive(Debug, Clone)]
pub struct ColumnSample {
    /// Raw header names, as read.
    pub header: Vec<String>,
    /// One tally per header column, same order.
    pub tallies: Vec<TypeTally>,
    /// Number of data rows that were sampled.
    pub rows_sampled: usize,
}

impl ColumnSample {
    /// Start an empty sample for the given header.
    pub fn new(header: Vec<String>) -> Self {
        let tallies = vec![TypeTally::new(); header.len()];
        Self {
            header,
            tallies,
            rows_sampled: 0,
        }
    }

    /// Classify every cell of one data row.
    ///
    /// Short rows only contribute the fields they have; cells beyond the
    /// header width are ignored.
    pub fn observe_row(&mut self, row: &[String]) {
        for (tally, cell) in self.tallies.iter_mut().zip(row) {
            tally.observe(detect_cell_type(cell));
        }
        self.rows_sampled += 1;
    }

    /// The winning type of each column, in header order.
    pub fn column_types(&self) -> Vec<SqlType> {
        self.tallies.iter().map(TypeTally::winner).collect()
    }
}

/// Infer the type of each column from the first rows of `source`.
///
/// Consumes the header and at most `sample_size` data rows. Fails with
/// [`LoadError::EmptyData`] if the source has no header row.
pub fn infer_column_types<R: Read>(
    source: &mut CsvSource<R>,
    sample_size: SampleSize,
) -> Result<ColumnSample> {
    let header = source.next_row()?.ok_or(LoadError::EmptyData)?;
    let mut sample = ColumnSample::new(header);

    while !sample_size.is_full(sample.rows_sampled) {
        match source.next_row()? {
            Some(row) => sample.observe_row(&row),
            None => break,
        }
    }

    Ok(sample)
}
