// Operator CLI for the auction ledger

use auction_core::{AuctionId, ConfigValidation};
use auction_effects::StorageHandler;
use auction_ledger::AuctionLedger;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "auction")]
#[command(about = "Auction ledger - run auction transactions against a local ledger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory for the filesystem backend (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Auction to address (overrides config)
    #[arg(short, long, global = true)]
    auction: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new auction, replacing any existing one
    Create {
        /// Asset identifier
        asset_id: String,

        /// Quantity on offer
        #[arg(allow_hyphen_values = true)]
        quantity: String,
    },

    /// Place an offer on the open auction
    Bid {
        /// Bidder identifier
        bidder: String,

        /// Offered price
        #[arg(allow_hyphen_values = true)]
        price: String,
    },

    /// Close the auction and record the winner
    Close,

    /// Print the stored auction record
    Query {
        /// Pretty-print the JSON record
        #[arg(long)]
        pretty: bool,
    },

    /// Invoke a transaction by function name
    Invoke {
        /// Function name (create, bid, close, query)
        function: String,

        /// Positional arguments
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Run transactions from a file, one per line
    Batch {
        /// Transaction file
        file: PathBuf,

        /// Continue after a failed transaction
        #[arg(long)]
        keep_going: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = config::resolve(
        cli.config.as_deref(),
        cli.data_dir,
        cli.auction.map(AuctionId::new),
    )?;
    config.validate()?;

    // Initialize tracing; stdout is reserved for transaction output
    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.log_level.to_ascii_lowercase()
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_writer(std::io::stderr)
        .init();
    debug!(?config, "Configuration resolved");

    let storage = StorageHandler::from_config(&config.storage);
    let ledger = AuctionLedger::new(storage, config.auction_id.clone());

    match cli.command {
        Commands::Create { asset_id, quantity } => {
            commands::transaction::invoke(&ledger, "create", &[asset_id, quantity]).await?;
        }
        Commands::Bid { bidder, price } => {
            commands::transaction::invoke(&ledger, "bid", &[bidder, price]).await?;
        }
        Commands::Close => {
            commands::transaction::invoke::<_, String>(&ledger, "close", &[]).await?;
        }
        Commands::Query { pretty } => {
            commands::transaction::query(&ledger, pretty).await?;
        }
        Commands::Invoke { function, args } => {
            commands::transaction::invoke(&ledger, &function, &args).await?;
        }
        Commands::Batch { file, keep_going } => {
            commands::batch::run_file(&ledger, &file, keep_going).await?;
        }
    }

    Ok(())
}
