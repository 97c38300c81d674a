//! Main Loader builder and the streaming load pipeline.
//!
//! A load reads the CSV twice: a bounded sampling pass that infers one type
//! per column, then a full pass that fixes the schema from the header row and
//! streams every data row into the table. Nothing is rolled back on failure:
//! batches committed before an error stay in the table.

use std::io::Read;
use std::path::Path;

use tracing::{debug, info, trace};

use crate::error::{LoadError, Result};
use crate::gateway::Gateway;
use crate::header::{normalize_header, ColumnName};
use crate::infer::column_types::{infer_column_types, ColumnSample};
use crate::sample::SampleSize;
use crate::schema::{
    create_database_sql, create_index_sql, drop_table_sql, validate_identifier, IdPolicy, Schema,
};
use crate::source::CsvSource;
use crate::sql_type::SqlType;
use crate::summary::LoadSummary;

/// What to do with a table of the same name that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TablePolicy {
    /// Drop the existing table (and its data) before creating the new one.
    #[default]
    Replace,
    /// Keep an existing table and append rows to it.
    CreateIfAbsent,
}

/// CSV loader.
///
/// # Example
///
/// ```no_run
/// use csv2mysql::{Loader, MemoryGateway, SampleSize};
///
/// let mut loader = Loader::new();
/// loader.sample_size(SampleSize::Records(500)).batch_size(5000);
///
/// let mut gateway = MemoryGateway::new();
/// let summary = loader.run("sales.csv", "test", "sales", &mut gateway).unwrap();
/// println!("{summary}");
/// ```
#[derive(Debug, Clone)]
pub struct Loader {
    /// Sample Window for type inference.
    sample_size: SampleSize,
    /// Rows inserted between commits.
    batch_size: usize,
    /// Field delimiter.
    delimiter: u8,
    /// Handling of an existing table.
    table_policy: TablePolicy,
    /// Handling of a header without `id`.
    id_policy: IdPolicy,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    /// Rows inserted between commits unless configured otherwise.
    pub const DEFAULT_BATCH_SIZE: usize = 10_000;

    /// Create a new Loader with default settings.
    pub fn new() -> Self {
        Self {
            sample_size: SampleSize::default(),
            batch_size: Self::DEFAULT_BATCH_SIZE,
            delimiter: b',',
            table_policy: TablePolicy::default(),
            id_policy: IdPolicy::default(),
        }
    }

    /// Set the Sample Window for type inference.
    pub fn sample_size(&mut self, sample_size: SampleSize) -> &mut Self {
        self.sample_size = sample_size;
        self
    }

    /// Set how many rows are inserted between commits.
    pub fn batch_size(&mut self, batch_size: usize) -> &mut Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the field delimiter.
    pub fn delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the handling of an existing table.
    pub fn table_policy(&mut self, table_policy: TablePolicy) -> &mut Self {
        self.table_policy = table_policy;
        self
    }

    /// Set the handling of a header without an `id` column.
    pub fn id_policy(&mut self, id_policy: IdPolicy) -> &mut Self {
        self.id_policy = id_policy;
        self
    }

    /// Run a complete load: prepare the database, infer the column types from
    /// the Sample Window, then stream the whole file into `table`.
    pub fn run<P, G>(
        &self,
        path: P,
        database: &str,
        table: &str,
        gateway: &mut G,
    ) -> Result<LoadSummary>
    where
        P: AsRef<Path>,
        G: Gateway + ?Sized,
    {
        let path = path.as_ref();
        info!(
            "Importing `{}' into MySQL database `{}.{}'",
            path.display(),
            database,
            table
        );

        self.prepare_database(database, gateway)?;

        info!("Analyzing column types ...");
        let sample = self.infer_types(path)?;
        let types = sample.column_types();
        info!(
            "Column types from {} sampled rows: {}",
            sample.rows_sampled,
            types
                .iter()
                .map(SqlType::as_sql)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut summary = self.load_path(path, table, &types, gateway)?;
        summary.rows_sampled = sample.rows_sampled;
        Ok(summary)
    }

    /// Create `database` if needed and make it the default database.
    pub fn prepare_database<G: Gateway + ?Sized>(
        &self,
        database: &str,
        gateway: &mut G,
    ) -> Result<()> {
        validate_identifier(database)?;
        gateway.execute(&create_database_sql(database), &[])?;
        gateway.select_database(database)
    }

    /// Sampling pass over the CSV file at `path`.
    pub fn infer_types<P: AsRef<Path>>(&self, path: P) -> Result<ColumnSample> {
        let mut source = CsvSource::open(path, self.delimiter)?;
        infer_column_types(&mut source, self.sample_size)
    }

    /// Sampling pass over CSV data from a reader.
    pub fn infer_types_from_reader<R: Read>(&self, reader: R) -> Result<ColumnSample> {
        let mut source = CsvSource::from_reader(reader, self.delimiter);
        infer_column_types(&mut source, self.sample_size)
    }

    /// Load pass over the CSV file at `path`, using previously inferred types.
    pub fn load_path<P, G>(
        &self,
        path: P,
        table: &str,
        types: &[SqlType],
        gateway: &mut G,
    ) -> Result<LoadSummary>
    where
        P: AsRef<Path>,
        G: Gateway + ?Sized,
    {
        let source = CsvSource::open(path, self.delimiter)?;
        self.load_source(source, table, types, gateway)
    }

    /// Load pass over CSV data from a reader, using previously inferred types.
    pub fn load_reader<R, G>(
        &self,
        reader: R,
        table: &str,
        types: &[SqlType],
        gateway: &mut G,
    ) -> Result<LoadSummary>
    where
        R: Read,
        G: Gateway + ?Sized,
    {
        let source = CsvSource::from_reader(reader, self.delimiter);
        self.load_source(source, table, types, gateway)
    }

    fn load_source<R, G>(
        &self,
        mut source: CsvSource<R>,
        table: &str,
        types: &[SqlType],
        gateway: &mut G,
    ) -> Result<LoadSummary>
    where
        R: Read,
        G: Gateway + ?Sized,
    {
        validate_identifier(table)?;
        if self.batch_size == 0 {
            return Err(LoadError::InvalidConfig(
                "batch size must be at least 1".to_string(),
            ));
        }

        let header = source.next_row()?.ok_or(LoadError::EmptyData)?;
        let columns = normalize_header(&header);
        let schema = self.create_table(&columns, table, types, gateway)?;

        let mut summary =
            LoadSummary::new(table, columns, types.to_vec(), schema.has_generated_id());
        self.stream_rows(&mut source, &schema, gateway, &mut summary)?;
        Ok(summary)
    }

    /// Fix the schema from the normalized header and (re)create the table.
    fn create_table<G: Gateway + ?Sized>(
        &self,
        columns: &[ColumnName],
        table: &str,
        types: &[SqlType],
        gateway: &mut G,
    ) -> Result<Schema> {
        let schema = Schema::new(table, columns, types, self.id_policy)?;
        info!("{}", schema.create_table_sql());

        if self.table_policy == TablePolicy::Replace {
            gateway.execute(&drop_table_sql(table), &[])?;
        }
        gateway.execute(&schema.create_table_sql(), &[])?;

        match gateway.execute(&create_index_sql(table), &[]) {
            Ok(()) => {}
            Err(LoadError::IndexExists(msg)) => {
                debug!("Index on `{}` already exists: {}", table, msg);
            }
            Err(e) => return Err(e),
        }

        Ok(schema)
    }

    /// Insert every remaining row, committing every `batch_size` rows and once
    /// more at the end.
    fn stream_rows<R, G>(
        &self,
        source: &mut CsvSource<R>,
        schema: &Schema,
        gateway: &mut G,
        summary: &mut LoadSummary,
    ) -> Result<()>
    where
        R: Read,
        G: Gateway + ?Sized,
    {
        info!("Inserting rows ...");
        let insert_sql = schema.insert_sql();
        let width = schema.width();

        while let Some(mut row) = source.next_row()? {
            if row.len() < width {
                trace!(
                    "Padding record {} from {} to {} fields",
                    source.records_read(),
                    row.len(),
                    width
                );
                row.resize(width, String::new());
                summary.rows_padded += 1;
            }

            gateway.execute(&insert_sql, &row)?;
            summary.rows_inserted += 1;

            if summary.rows_inserted % self.batch_size as u64 == 0 {
                gateway.commit()?;
                summary.commits += 1;
                info!("Committed {} rows", summary.rows_inserted);
            }
        }

        info!("Committing rows to database ...");
        gateway.commit()?;
        summary.commits += 1;
        info!("Done! {} rows inserted into `{}`", summary.rows_inserted, schema.table());
        Ok(())
    }
}
