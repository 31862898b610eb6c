use anyhow::Context;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use sqlcal::{parse_sql_interval, series, DatabaseBackend, DialectConfig, SqlDialect};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sqlcal")]
#[command(about = "Translate interval arithmetic and date bucketing into dialect SQL")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Target dialect (overrides the config file)
    #[arg(short, long, global = true)]
    dialect: Option<DatabaseBackend>,

    /// Configuration file (defaults to sqlcal.toml in the current directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an interval to a SQL expression
    Add {
        /// SQL expression, e.g. a column name
        expr: String,
        /// Interval, e.g. "2 months"
        interval: String,
    },

    /// Subtract an interval from a SQL expression
    Subtract { expr: String, interval: String },

    /// Bucket a SQL expression into interval-long windows from an origin
    Bucket {
        interval: String,
        source: String,
        /// Origin timestamp literal
        #[arg(long, default_value = "2000-01-01T00:00:00.000")]
        origin: String,
    },

    /// Emit a date-series derived table between two timestamps
    Series {
        interval: String,
        /// Start, e.g. 2024-01-01T00:00:00
        from: NaiveDateTime,
        /// End, e.g. 2024-03-31T23:59:59.999
        to: NaiveDateTime,
    },

    /// Dump the dialect's template registry as JSON
    Templates,

    /// Print the dialect's current-timestamp expression
    Now,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let mut config = match &cli.config {
        Some(path) => DialectConfig::from_file(path)?,
        None => DialectConfig::load_with_base_dir(".")?,
    };
    if let Some(backend) = cli.dialect {
        config.backend = backend;
    }
    let dialect = config.build_dialect();

    let output = match cli.command {
        Commands::Add { expr, interval } => dialect.add_interval(&expr, &interval)?,
        Commands::Subtract { expr, interval } => dialect.subtract_interval(&expr, &interval)?,
        Commands::Bucket {
            interval,
            source,
            origin,
        } => {
            let spec = parse_sql_interval(&interval)?;
            dialect.date_bin(&spec, &source, &origin)?
        }
        Commands::Series { interval, from, to } => {
            let spec = parse_sql_interval(&interval)?;
            let ranges = series::time_series(&spec, from, to)
                .with_context(|| format!("generating '{}' series", interval))?;
            dialect.series_sql(&ranges)?
        }
        Commands::Templates => dialect.templates().to_json()?,
        Commands::Now => dialect.now_timestamp().to_string(),
    };

    println!("{}", output);
    Ok(())
}
