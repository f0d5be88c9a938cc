use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vgrank_common::{Catalog, Config, PriceRange, SearchFilters, SortBy, SortOrder};
use vgrank_scout::cli::{self, OutputMode, Outcome};
use vgrank_scout::search::ProductSearch;
use vgrank_scout::storage::{FileStore, MemoryStore, StateStore};

#[derive(Parser)]
#[command(name = "vgrank", about = "Rank e-commerce sites by videogram listings for a title")]
struct Cli {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search for a title and show the per-site ranking
    Search {
        term: String,
        /// Also print aggregate statistics
        #[arg(long)]
        stats: bool,
        /// Print the ranking as JSON instead of a report
        #[arg(long)]
        json: bool,
    },
    /// Show the last saved ranking
    Last {
        #[arg(long)]
        stats: bool,
        #[arg(long)]
        json: bool,
    },
    /// List recent search terms
    History,
    /// Manage saved filter preferences
    Filters {
        #[command(subcommand)]
        action: FiltersAction,
    },
    /// Remove all saved state
    Clear,
}

#[derive(Subcommand)]
enum FiltersAction {
    Set {
        #[arg(long)]
        min_price: Option<u64>,
        #[arg(long)]
        max_price: Option<u64>,
        /// Only in-stock (true) or only out-of-stock (false) products
        #[arg(long)]
        available: Option<bool>,
        /// Restrict to these site labels (repeatable)
        #[arg(long = "site")]
        sites: Vec<String>,
        #[arg(long, value_enum)]
        sort_by: Option<SortArg>,
        #[arg(long)]
        desc: bool,
    },
    Show,
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Price,
    Title,
    Site,
    Date,
}

impl From<SortArg> for SortBy {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Price => SortBy::Price,
            SortArg::Title => SortBy::Title,
            SortArg::Site => SortBy::Site,
            SortArg::Date => SortBy::Date,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Cli::parse();

    let default_directive = if args.verbose { "vgrank=info" } else { "vgrank=warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_directive.parse()?))
        .init();

    let config = Config::from_env();
    if args.verbose {
        config.log_redacted();
    }

    let local = FileStore::new(config.data_dir.clone());
    info!(dir = %local.dir().display(), "Using local state directory");
    let state = StateStore::new(Arc::new(local), Arc::new(MemoryStore::new()));

    match args.command {
        Command::Search { term, stats, json } => {
            let catalog = Catalog::from_config(&config)?;
            let search = ProductSearch::from_config(&config, catalog);
            let outcome = cli::run_search(
                &search,
                &state,
                &term,
                OutputMode { stats, json },
                &mut std::io::stdout(),
                &mut std::io::stderr(),
            )
            .await?;
            Ok(match outcome {
                Outcome::Success => ExitCode::SUCCESS,
                Outcome::Failure => ExitCode::FAILURE,
            })
        }
        Command::Last { stats, json } => {
            cli::show_last(&state, OutputMode { stats, json }, &mut std::io::stdout())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::History => {
            for (i, term) in state.search_history().iter().enumerate() {
                println!("{:>2}. {term}", i + 1);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Filters { action } => {
            match action {
                FiltersAction::Set {
                    min_price,
                    max_price,
                    available,
                    sites,
                    sort_by,
                    desc,
                } => {
                    let price_range = match (min_price, max_price) {
                        (None, None) => None,
                        (min, max) => Some(PriceRange {
                            min: min.unwrap_or(0),
                            max: max.unwrap_or(u64::MAX),
                        }),
                    };
                    let filters = SearchFilters {
                        price_range,
                        availability: available,
                        sites: (!sites.is_empty()).then_some(sites),
                        sort_by: sort_by.map(SortBy::from),
                        sort_order: Some(if desc { SortOrder::Desc } else { SortOrder::Asc }),
                    };
                    state.save_search_filters(&filters);
                    println!("{}", serde_json::to_string_pretty(&filters)?);
                }
                FiltersAction::Show => {
                    let filters = state.search_filters().unwrap_or_default();
                    println!("{}", serde_json::to_string_pretty(&filters)?);
                }
                FiltersAction::Clear => {
                    state.save_search_filters(&SearchFilters::default());
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Clear => {
            state.clear_all();
            Ok(ExitCode::SUCCESS)
        }
    }
}
