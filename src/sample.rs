/// Bound on the Sample Window used for type inference.
///
/// Rows past the window are still loaded, they just don't vote on column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSize {
    /// Sample the first `n` data rows after the header.
    Records(usize),
    /// Sample every data row.
    ///
    /// # Warning
    ///
    /// Inference then reads the whole file before the first row is inserted.
    /// Memory stays bounded (one tally per column), but the first pass costs as
    /// much as the load itself.
    All,
}

impl Default for SampleSize {
    fn default() -> Self {
        SampleSize::Records(SampleSize::DEFAULT_RECORDS)
    }
}

impl SampleSize {
    /// Number of data rows sampled when nothing else is configured.
    pub const DEFAULT_RECORDS: usize = 1000;

    /// Returns the number of records to sample, or None for All.
    pub fn records(&self) -> Option<usize> {
        match self {
            SampleSize::Records(n) => Some(*n),
            SampleSize::All => None,
        }
    }

    /// Returns true if `rows_sampled` rows already fill the window.
    #[inline]
    pub fn is_full(&self, rows_sampled: usize) -> bool {
        self.records().is_some_and(|n| rows_sampled >= n)
    }
}
