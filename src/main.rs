//! csv2mysql CLI - load a CSV file into a MySQL table

use clap::Parser;
use csv2mysql::{
    ConnectOptions, IdPolicy, LoadSummary, Loader, MemoryGateway, MysqlGateway, SampleSize,
    TablePolicy,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Automatically insert CSV contents into MySQL.
///
/// Infers a column type for every CSV column from the first rows of the file,
/// (re)creates the table and inserts every row.
#[derive(Parser, Debug)]
#[command(name = "csv2mysql")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The input CSV file
    input: PathBuf,

    /// Name of the table (default: CSV file name without extension)
    #[arg(short = 't', long)]
    table: Option<String>,

    /// Name of the database
    #[arg(short = 'D', long, default_value = "test")]
    database: String,

    /// MySQL login username
    #[arg(short = 'u', long, default_value = "root")]
    user: String,

    /// MySQL login password
    #[arg(short = 'p', long, env = "MYSQL_PWD", default_value = "", hide_env_values = true)]
    password: String,

    /// MySQL host
    #[arg(short = 'H', long, default_value = "localhost")]
    host: String,

    /// MySQL port
    #[arg(short = 'P', long, default_value = "3306")]
    port: u16,

    /// Number of data rows sampled for type inference
    #[arg(short = 'n', long, default_value = "1000")]
    sample_rows: usize,

    /// Sample every row for type inference (overrides --sample-rows)
    #[arg(short = 'a', long)]
    sample_all: bool,

    /// Number of rows inserted between commits
    #[arg(short = 'b', long, default_value = "10000")]
    batch_size: usize,

    /// Field delimiter (single ASCII character)
    #[arg(short = 'd', long, default_value = ",")]
    delimiter: char,

    /// Keep an existing table instead of dropping it
    #[arg(long)]
    keep_table: bool,

    /// Fail if the CSV has no `id` column instead of generating one
    #[arg(long)]
    require_id: bool,

    /// Print the statements instead of connecting to MySQL
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.verbose);

    match import(&args) {
        Ok(summary) => {
            print!("{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error importing {}: {}", args.input.display(), e);
            ExitCode::FAILURE
        }
    }
}

/// Progress goes to stdout. Driver chatter is capped at warnings unless
/// `RUST_LOG` says otherwise.
fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},mysql_async=warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stdout)
        .init();
}

fn import(args: &Args) -> Result<LoadSummary, Box<dyn std::error::Error>> {
    let table = match &args.table {
        Some(table) => table.clone(),
        None => table_name_from_path(&args.input)?,
    };

    let loader = build_loader(args)?;

    if args.dry_run {
        let mut gateway = MemoryGateway::new();
        let summary = loader.run(&args.input, &args.database, &table, &mut gateway)?;
        print_statements(&gateway);
        return Ok(summary);
    }

    let options = ConnectOptions {
        host: args.host.clone(),
        port: args.port,
        user: args.user.clone(),
        password: args.password.clone(),
    };
    let mut gateway = MysqlGateway::connect(&options)?;
    let summary = loader.run(&args.input, &args.database, &table, &mut gateway)?;
    gateway.disconnect()?;

    Ok(summary)
}

fn build_loader(args: &Args) -> Result<Loader, Box<dyn std::error::Error>> {
    if !args.delimiter.is_ascii() {
        return Err(format!("delimiter must be a single ASCII character: {:?}", args.delimiter).into());
    }

    let mut loader = Loader::new();

    if args.sample_all {
        loader.sample_size(SampleSize::All);
    } else {
        loader.sample_size(SampleSize::Records(args.sample_rows));
    }

    loader
        .batch_size(args.batch_size)
        .delimiter(args.delimiter as u8);

    if args.keep_table {
        loader.table_policy(TablePolicy::CreateIfAbsent);
    }
    if args.require_id {
        loader.id_policy(IdPolicy::Require);
    }

    Ok(loader)
}

/// The CSV file name without directory and extension.
fn table_name_from_path(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| format!("cannot derive a table name from {}", path.display()).into())
}

fn print_statements(gateway: &MemoryGateway) {
    let mut inserts = 0usize;
    for statement in gateway.statements() {
        if statement.is_insert() {
            if inserts == 0 {
                println!("{statement}");
            }
            inserts += 1;
        } else {
            println!("{statement}");
        }
    }
    println!("-- {} INSERT statements, {} commits", inserts, gateway.commit_count());
}
