//! The Vible CLI - Signature data and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Create an empty signature document
//! vible-cli signatures init --data-dir data
//!
//! # Show how many people have signed
//! vible-cli signatures count
//!
//! # Show the latest signatures
//! vible-cli signatures recent --limit 5
//!
//! # Browse the catalog
//! vible-cli catalog list --category clothing --sort price-low
//!
//! # Pick a quote
//! vible-cli quotes random --category love
//! vible-cli quotes list --min-inspiration 5
//! ```
//!
//! # Commands
//!
//! - `signatures` - Inspect or initialize the signature document
//! - `catalog` - List products
//! - `quotes` - Pick or list inspirational quotes

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vible_core::catalog::SortOrder;
use vible_core::quotes::DEFAULT_MIN_INSPIRATION;
use vible_core::signature::DEFAULT_RECENT_LIMIT;

mod commands;

#[derive(Parser)]
#[command(name = "vible-cli")]
#[command(author, version, about = "The Vible CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the signature document
    Signatures {
        #[command(subcommand)]
        action: SignatureAction,
    },
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Inspirational quotes
    Quotes {
        #[command(subcommand)]
        action: QuoteAction,
    },
}

#[derive(Subcommand)]
enum SignatureAction {
    /// Create an empty signature document if none exists
    Init {
        /// Directory holding signatures.json
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Print the number of signatures
    Count {
        /// Directory holding signatures.json
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Print the most recent signatures, newest first
    Recent {
        /// Directory holding signatures.json
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// How many to show
        #[arg(short, long, default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Category ID, or `all`
        #[arg(short, long)]
        category: Option<String>,

        /// Match against name and description
        #[arg(short, long, default_value = "")]
        search: String,

        /// Sort order (`name`, `price-low`, `price-high`)
        #[arg(long, default_value = "name")]
        sort: SortOrder,
    },
}

#[derive(Subcommand)]
enum QuoteAction {
    /// Print one random quote
    Random {
        /// Category ID; unknown categories pick from every quote
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List quotes by inspiration level
    List {
        /// Lowest inspiration level to include (1-5)
        #[arg(long, default_value_t = DEFAULT_MIN_INSPIRATION)]
        min_inspiration: u8,
    },
}

fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

#[allow(clippy::print_stdout)]
fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Signatures { action } => match action {
            SignatureAction::Init { data_dir } => {
                let path = commands::signatures::init(&data_dir)?;
                println!("Signature document ready at {}", path.display());
            }
            SignatureAction::Count { data_dir } => {
                println!("{}", commands::signatures::count(&data_dir)?);
            }
            SignatureAction::Recent { data_dir, limit } => {
                for signature in commands::signatures::recent(&data_dir, limit)? {
                    println!("{}", commands::signatures::format_line(&signature));
                }
            }
        },
        Commands::Catalog { action } => match action {
            CatalogAction::List {
                category,
                search,
                sort,
            } => {
                for product in commands::catalog::list(&search, category.as_deref(), sort) {
                    println!("{}", commands::catalog::format_line(product));
                }
            }
        },
        Commands::Quotes { action } => match action {
            QuoteAction::Random { category } => {
                if let Some(quote) =
                    commands::quotes::random(category.as_deref(), &mut rand::rng())
                {
                    println!("{}", commands::quotes::format_line(quote));
                }
            }
            QuoteAction::List { min_inspiration } => {
                for quote in commands::quotes::list(min_inspiration) {
                    println!("{}", commands::quotes::format_line(quote));
                }
            }
        },
    }
    Ok(())
}
