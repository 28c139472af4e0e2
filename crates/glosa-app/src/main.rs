use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glosa_config::Config;
use glosa_core::{Importer, RecordStore};
use glosa_store::JsonFileStore;

mod logging;
mod report;

use self::report::ConsoleReporter;

#[derive(Parser)]
#[command(name = "glosa")]
#[command(about = "Import and browse dictionary entries")]
#[command(version)]
struct Cli {
    /// JSON configuration file; environment values fill in what it leaves out
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Entry store directory
    #[arg(short, long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import the XML entries of a directory into the store
    Import {
        /// Directory containing dictionary entries
        #[arg(short, long)]
        input_directory: Option<PathBuf>,

        /// Stop at the first entry that fails
        #[arg(long)]
        fail_fast: bool,
    },

    /// Search entries by title word, ignoring case and diacritics
    Search {
        term: String,
    },

    /// Print the rendered body of one entry
    Show {
        id: u64,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::new(),
    };
    if let Some(store) = cli.store {
        config.store.path = store;
    }

    logging::init(&config.log);

    run(cli.command, config).inspect_err(|e| tracing::error!("{e:#}"))
}

fn run(command: Command, mut config: Config) -> anyhow::Result<()> {
    let mut store = JsonFileStore::open(&config.store.path)
        .with_context(|| format!("opening store {}", config.store.path.display()))?;

    match command {
        Command::Import {
            input_directory,
            fail_fast,
        } => {
            if let Some(dir) = input_directory {
                config.import.input_directory = dir;
            }
            config.import.fail_fast |= fail_fast;

            let mut reporter = ConsoleReporter::new();
            let summary = Importer::new(&mut store)
                .with_extension(config.import.extension.as_str())
                .with_fail_fast(config.import.fail_fast)
                .import_directory(&config.import.input_directory, &mut reporter)?;

            println!("Finished importing data.");
            if !summary.failures.is_empty() {
                anyhow::bail!("{} entries failed to import", summary.failures.len());
            }
        }
        Command::Search { term } => {
            let results = glosa_core::search(&store, &term)?;
            if results.is_empty() {
                println!("No entries match {term:?}.");
            }
            for record in results {
                println!("{:>8}  {}", record.id, record);
            }
        }
        Command::Show { id } => {
            let record = store
                .find_by_id(id)?
                .with_context(|| format!("no entry with id {id}"))?;
            println!("{record} (version {})", record.version());
            println!("{}", record.body_html);
        }
    }

    Ok(())
}
