//! Unified error type for auction operations
//!
//! Every failure a transaction can produce maps to exactly one variant of
//! [`AuctionError`]. Storage failures are wrapped verbatim so callers can
//! decide whether to retry.

use crate::effects::StorageError;
use crate::types::AuctionId;
use thiserror::Error;

/// Reasons a state transition is refused by an auction record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// Bid or Close attempted after the auction was sealed
    #[error("auction already closed")]
    AlreadyClosed,

    /// Close attempted before any offer was recorded
    #[error("no offers to close on")]
    NoOffers,
}

/// A record that breaks the auction invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// Asset identifier is empty
    #[error("asset id is empty")]
    EmptyAssetId,

    /// An offer carries an empty bidder identifier
    #[error("offer {index} has an empty bidder")]
    EmptyBidder {
        /// Position of the offer in submission order
        index: usize,
    },

    /// An open auction already names a winner
    #[error("open auction has winner {winner:?}")]
    WinnerWhileOpen {
        /// Stored winner
        winner: String,
    },

    /// A closed auction's winner is not the leading bidder
    #[error("closed auction winner {actual:?} is not the leading bidder {expected:?}")]
    WrongWinner {
        /// Bidder of the earliest maximal offer, if any
        expected: Option<String>,
        /// Stored winner
        actual: String,
    },
}

/// Error type for all auction transactions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuctionError {
    /// Wrong argument count or an argument that fails to parse
    #[error("Invalid argument: {message}")]
    Argument {
        /// Error message describing the offending argument
        message: String,
    },

    /// The operation needs a stored record but none exists
    #[error("Auction not found: {auction}")]
    StateNotFound {
        /// Auction whose key has never been written
        auction: AuctionId,
    },

    /// Stored bytes could not be decoded into a valid record
    #[error("Auction state corrupt for {auction}: {message}")]
    StateCorrupt {
        /// Auction whose record failed to decode
        auction: AuctionId,
        /// Decoder message
        message: String,
    },

    /// The record refused the requested transition
    #[error("Invalid transition: {0}")]
    InvalidTransition(#[from] TransitionError),

    /// Underlying ledger read or write failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Unrecognized transaction function name
    #[error("Invalid function: {function}")]
    Dispatch {
        /// Function name as received from the caller
        function: String,
    },
}

impl AuctionError {
    /// Create an argument error
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument {
            message: message.into(),
        }
    }

    /// Create a not-found error for the given auction
    pub fn not_found(auction: &AuctionId) -> Self {
        Self::StateNotFound {
            auction: auction.clone(),
        }
    }

    /// Create a corrupt-state error for the given auction
    pub fn corrupt(auction: &AuctionId, message: impl Into<String>) -> Self {
        Self::StateCorrupt {
            auction: auction.clone(),
            message: message.into(),
        }
    }

    /// Create a dispatch error for an unknown function
    pub fn dispatch(function: impl Into<String>) -> Self {
        Self::Dispatch {
            function: function.into(),
        }
    }

    /// Check whether the caller may retry the same transaction unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_retryable())
    }
}

/// Standard Result type for auction operations
pub type Result<T> = std::result::Result<T, AuctionError>;
