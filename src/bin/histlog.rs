//! histlog CLI
//!
//! Command-line interface for inspecting and appending to a history log.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use histlog::config::{sanitize_file_name, DEFAULT_CAPACITY, DEFAULT_LOG_NAME};
use histlog::{HistoryConfig, LogStore};
use tracing_subscriber::{fmt, EnvFilter};

/// Exit status of a successful command
const EXIT_OK: u8 = 0;

/// Exit status of `contains` when the entry is not in the log
const EXIT_NOT_FOUND: u8 = 1;

/// histlog CLI
#[derive(Parser, Debug)]
#[command(name = "histlog")]
#[command(about = "Bounded, deduplicating history log")]
#[command(version)]
struct Args {
    /// Directory holding the log file
    #[arg(short, long)]
    dir: String,

    /// Log file name (invalid file name characters are replaced with '_')
    #[arg(short, long, default_value = DEFAULT_LOG_NAME)]
    name: String,

    /// Maximum number of entries kept after a flush
    #[arg(short, long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Record the same entry more than once
    #[arg(long)]
    allow_duplicates: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add entries and flush them to the log
    Add {
        /// Entries to add, in order
        #[arg(required = true)]
        entries: Vec<String>,

        /// Modifier recorded with every entry
        #[arg(short, long)]
        modifier: Option<String>,
    },

    /// Check whether an entry is in the log (exit code 1 if not)
    Contains {
        /// The entry to look up
        entry: String,

        /// Modifier the entry was recorded with
        #[arg(short, long)]
        modifier: Option<String>,
    },

    /// Print all entries, oldest first
    List,

    /// Print the CRC32 of the log file
    Checksum,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing/logging
    let default_filter = if args.verbose { "info,histlog=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    match run(args, &mut io::stdout().lock()) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args, out: &mut impl Write) -> histlog::Result<u8> {
    let config = HistoryConfig::builder()
        .dir(&args.dir)
        .file_name(sanitize_file_name(&args.name, "_"))
        .capacity(args.capacity)
        .allow_duplicates(args.allow_duplicates)
        .build();

    let mut log = LogStore::open(config)?;
    tracing::debug!("Opened {:?}", log);

    match args.command {
        Commands::Add { entries, modifier } => {
            let modifier = modifier.unwrap_or_default();
            let queued = entries
                .iter()
                .filter(|entry| log.add_with(entry, &modifier))
                .count();

            let summary = log.flush()?;
            writeln!(
                out,
                "queued {} of {}, wrote {} ({:?}), evicted {}",
                queued,
                entries.len(),
                summary.written,
                summary.mode,
                summary.dropped_existing + summary.dropped_pending
            )?;
            Ok(EXIT_OK)
        }
        Commands::Contains { entry, modifier } => {
            let found = log.contains_with(&entry, modifier.unwrap_or_default());
            writeln!(out, "{}", found)?;
            Ok(if found { EXIT_OK } else { EXIT_NOT_FOUND })
        }
        Commands::List => {
            for line in log.existing() {
                writeln!(out, "{}", histlog::EntryKey::from_line(line))?;
            }
            Ok(EXIT_OK)
        }
        Commands::Checksum => {
            match log.checksum()? {
                Some(crc) => writeln!(out, "{}  {}", crc, log.path().display())?,
                None => writeln!(out, "no log file at {}", log.path().display())?,
            }
            Ok(EXIT_OK)
        }
    }
}
