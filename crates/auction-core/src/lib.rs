//! # Auction Core - Foundation
//!
//! **Purpose**: Define the auction domain, its state transitions, the record
//! codec and the storage effect trait the rest of the workspace builds on.
//!
//! # Architecture Constraints
//!
//! - YES Domain types (`AuctionRecord`, `Asset`, `Offer`) and pure transitions
//! - YES Error taxonomy shared by every crate
//! - YES Effect trait definitions (`LedgerEffects`)
//! - NO effect handler implementations (those live in `auction-effects`)
//! - NO transaction execution against storage (that's `auction-ledger`)
//!
//! ## Core Concepts
//!
//! - **Auction record**: asset, append-only offers, closed flag and winner
//! - **Transaction**: closed enum decoded from a function name and string args
//! - **Versioned storage**: every write bumps a per-key version so
//!   read-modify-write commits can detect interleaved writers

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Ledger configuration types and validation
pub mod config;

/// Storage effect trait and storage errors
pub mod effects;

/// Unified auction error types
pub mod errors;

/// JSON record codec
pub mod serialization;

/// Transaction dispatch enum
pub mod transaction;

/// Auction domain types
pub mod types;

pub use config::{ConfigError, ConfigValidation, LedgerConfig, StorageBackend, StorageConfig};
pub use effects::{LedgerEffects, StorageError, Version, Versioned};
pub use errors::{AuctionError, InvariantViolation, Result, TransitionError};
pub use serialization::{decode_record, encode_record, SerializationError};
pub use transaction::Transaction;
pub use types::{Asset, AuctionId, AuctionRecord, Offer};
