//! csv2mysql: load a CSV file into a freshly created MySQL table
//!
//! Column types are inferred from a bounded sample of the file, then the
//! whole file is streamed into the table in commit batches.
//!
//! # Quick Start
//!
//! ```no_run
//! use csv2mysql::{ConnectOptions, Loader, MysqlGateway, SampleSize};
//!
//! let mut gateway = MysqlGateway::connect(&ConnectOptions::default()).unwrap();
//!
//! let mut loader = Loader::new();
//! loader.sample_size(SampleSize::Records(1000)).batch_size(10_000);
//!
//! let summary = loader.run("people.csv", "test", "people", &mut gateway).unwrap();
//! println!("Inserted {} rows", summary.rows_inserted);
//! ```
//!
//! # Type inference
//!
//! Every sampled cell is classified as exactly one of `int`, `bigint`,
//! `double`, `datetime`, `date`, `time`, `text` or `varchar(255)`. A column is
//! `text` if any cell was `text`, else `bigint` if any cell was `bigint`,
//! else the most frequent type, ties going to the type seen first.
//!
//! # Failure
//!
//! Loads are not transactional: rows committed before a failure stay in the
//! table. Re-running drops and recreates the table.

mod error;
pub mod gateway;
mod header;
mod infer;
mod loader;
mod sample;
mod schema;
mod source;
mod sql_type;
mod summary;

pub use error::{LoadError, Result};
pub use gateway::{Gateway, MemoryGateway, Statement};
#[cfg(feature = "mysql")]
pub use gateway::{ConnectOptions, MysqlGateway};
pub use header::{normalize_header, sanitize_column_name, ColumnName};
pub use infer::column_types::{infer_column_types, ColumnSample, TypeTally};
pub use infer::type_detection::detect_cell_type;
pub use loader::{Loader, TablePolicy};
pub use sample::SampleSize;
pub use schema::{IdPolicy, Schema};
pub use source::CsvSource;
pub use sql_type::SqlType;
pub use summary::LoadSummary;
