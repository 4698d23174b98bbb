//! # Auction Ledger - State Machine Execution
//!
//! Executes auction transactions (`create`, `bid`, `close`, `query`) against
//! any `LedgerEffects` implementation.
//!
//! ```ignore
//! use auction_effects::MemoryLedgerHandler;
//! use auction_ledger::AuctionLedger;
//!
//! let ledger = AuctionLedger::with_default_auction(MemoryLedgerHandler::new());
//! ledger.invoke("create", &["CUSIP123", "100000"]).await?;
//! ledger.invoke("bid", &["alice", "101"]).await?;
//! ledger.invoke::<&str>("close", &[]).await?;
//! let bytes = ledger.query().await?;
//! ```
//!
//! The core does not retry. A mutation that races another writer on the same
//! auction fails with a retryable storage conflict; callers decide whether to
//! run it again.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Transaction executor
pub mod ledger;

pub use ledger::{AuctionLedger, Response};
