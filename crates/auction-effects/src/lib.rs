//! # Auction Effects - Storage Handlers
//!
//! Concrete implementations of the `LedgerEffects` trait from `auction-core`.
//!
//! **Constraint**: handlers know nothing about auctions. They move versioned
//! bytes in and out of a backend and report failures as `StorageError`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Memory and filesystem ledger handlers
pub mod storage;

pub use storage::{FilesystemLedgerHandler, MemoryLedgerHandler, StorageHandler};
