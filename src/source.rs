//! Forward-only CSV record stream.
//!
//! The file is read twice per load (once for inference, once for insertion),
//! each time through its own `CsvSource`. Nothing beyond the current record is
//! buffered.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{LoadError, Result};

/// UTF-8 byte order mark, stripped from the first field of the first record.
const UTF8_BOM: &str = "\u{feff}";

/// A CSV file read as raw string rows, header included.
///
/// Rows may have any number of fields; callers decide how to handle short or
/// long rows.
pub struct CsvSource<R> {
    reader: csv::Reader<R>,
    record: csv::ByteRecord,
    records_read: u64,
}

impl CsvSource<BufReader<File>> {
    /// Open the CSV file at `path`.
    pub fn open<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::from_reader(BufReader::new(file), delimiter))
    }
}

impl<R: Read> CsvSource<R> {
    /// Read CSV records from any reader.
    pub fn from_reader(reader: R, delimiter: u8) -> Self {
        let reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        Self {
            reader,
            record: csv::ByteRecord::new(),
            records_read: 0,
        }
    }

    /// Number of records returned so far, header included.
    #[inline]
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Read the next record, or `None` at end of file.
    pub fn next_row(&mut self) -> Result<Option<Vec<String>>> {
        if !self.reader.read_byte_record(&mut self.record)? {
            return Ok(None);
        }
        self.records_read += 1;

        let mut row = Vec::with_capacity(self.record.len());
        for field in self.record.iter() {
            let field = simdutf8::basic::from_utf8(field).map_err(|_| LoadError::Encoding {
                record: self.records_read,
            })?;
            row.push(field.to_string());
        }

        if self.records_read == 1 {
            if let Some(first) = row.first_mut() {
                if let Some(rest) = first.strip_prefix(UTF8_BOM) {
                    *first = rest.to_string();
                }
            }
        }

        Ok(Some(row))
    }
}

impl<R: Read> Iterator for CsvSource<R> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}
