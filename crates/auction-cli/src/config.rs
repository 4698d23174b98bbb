// Configuration layering for the CLI

use anyhow::Context;
use auction_core::{AuctionId, LedgerConfig};
use std::path::{Path, PathBuf};

/// Apply defaults, then the config file, then command-line overrides
pub fn resolve(
    file: Option<&Path>,
    data_dir: Option<PathBuf>,
    auction: Option<AuctionId>,
) -> anyhow::Result<LedgerConfig> {
    let mut config = match file {
        Some(path) => LedgerConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => LedgerConfig::default(),
    };

    if let Some(dir) = data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(auction) = auction {
        config = config.with_auction_id(auction);
    }

    Ok(config)
}
