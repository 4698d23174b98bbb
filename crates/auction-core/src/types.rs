//! Auction domain types
//!
//! [`AuctionRecord`] is the only persisted entity. Its transition methods are
//! pure: they validate first and mutate only once every check has passed, so a
//! refused transition leaves the record untouched.

use crate::errors::{InvariantViolation, TransitionError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one auction; doubles as its storage key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuctionId(String);

impl AuctionId {
    /// Well-known key used when no explicit auction is named
    pub const DEFAULT: &'static str = "leilao";

    /// Create an auction id from any string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Storage key for this auction
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AuctionId {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for AuctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AuctionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The item being auctioned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Asset {
    /// Opaque asset identifier, e.g. a CUSIP
    pub id: String,
    /// Amount of the asset on offer
    pub quantity: i64,
}

impl Asset {
    /// Create an asset
    pub fn new(id: impl Into<String>, quantity: i64) -> Self {
        Self {
            id: id.into(),
            quantity,
        }
    }
}

/// A single bid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Offer {
    /// Opaque bidder identifier
    pub bidder: String,
    /// Offered price
    pub price: i64,
}

impl Offer {
    /// Create an offer
    pub fn new(bidder: impl Into<String>, price: i64) -> Self {
        Self {
            bidder: bidder.into(),
            price,
        }
    }
}

/// Persisted auction state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuctionRecord {
    /// Asset under auction
    pub asset: Asset,
    /// Offers in submission order
    pub offers: Vec<Offer>,
    /// Whether the auction has been sealed
    pub closed: bool,
    /// Winning bidder; empty until closed
    pub winner: String,
}

impl AuctionRecord {
    /// Fresh, open auction with no offers
    pub fn open(asset: Asset) -> Self {
        Self {
            asset,
            offers: Vec::new(),
            closed: false,
            winner: String::new(),
        }
    }

    /// Append an offer to an open auction
    pub fn place_offer(&mut self, offer: Offer) -> Result<(), TransitionError> {
        if self.closed {
            return Err(TransitionError::AlreadyClosed);
        }
        self.offers.push(offer);
        Ok(())
    }

    /// The offer that currently wins: highest price, earliest on ties
    pub fn leading_offer(&self) -> Option<&Offer> {
        // Only a strictly greater price displaces the running leader.
        self.offers
            .iter()
            .reduce(|best, offer| if offer.price > best.price { offer } else { best })
    }

    /// Seal the auction and record its winner
    pub fn close(&mut self) -> Result<&Offer, TransitionError> {
        if self.closed {
            return Err(TransitionError::AlreadyClosed);
        }
        let winner = self
            .leading_offer()
            .map(|offer| offer.bidder.clone())
            .ok_or(TransitionError::NoOffers)?;

        self.closed = true;
        self.winner = winner;
        self.winning_offer().ok_or(TransitionError::NoOffers)
    }

    /// Check the invariants every stored record must hold
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        if self.asset.id.is_empty() {
            return Err(InvariantViolation::EmptyAssetId);
        }
        if let Some(index) = self.offers.iter().position(|offer| offer.bidder.is_empty()) {
            return Err(InvariantViolation::EmptyBidder { index });
        }

        if !self.closed {
            if !self.winner.is_empty() {
                return Err(InvariantViolation::WinnerWhileOpen {
                    winner: self.winner.clone(),
                });
            }
            return Ok(());
        }

        let expected = self.leading_offer().map(|offer| offer.bidder.as_str());
        if expected != Some(self.winner.as_str()) {
            return Err(InvariantViolation::WrongWinner {
                expected: expected.map(str::to_string),
                actual: self.winner.clone(),
            });
        }
        Ok(())
    }

    /// Offer that won a closed auction
    pub fn winning_offer(&self) -> Option<&Offer> {
        if !self.closed {
            return None;
        }
        self.leading_offer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn bond() -> Asset {
        Asset::new("CUSIP123", 100_000)
    }

    #[test]
    fn test_open_record_is_empty() {
        let record = AuctionRecord::open(bond());
        assert!(record.offers.is_empty());
        assert!(!record.closed);
        assert_eq!(record.winner, "");
        assert!(record.leading_offer().is_none());
    }

    #[test]
    fn test_earliest_offer_wins_ties() {
        let mut record = AuctionRecord::open(bond());
        record.place_offer(Offer::new("b1", 50)).unwrap();
        record.place_offer(Offer::new("b2", 70)).unwrap();
        record.place_offer(Offer::new("b3", 70)).unwrap();

        let winner = record.close().unwrap();
        assert_eq!(winner, &Offer::new("b2", 70));
        assert_eq!(record.winner, "b2");
        assert!(record.closed);
    }

    #[test]
    fn test_negative_prices_still_rank() {
        let mut record = AuctionRecord::open(bond());
        record.place_offer(Offer::new("low", -10)).unwrap();
        record.place_offer(Offer::new("lower", -20)).unwrap();

        assert_eq!(record.close().unwrap().bidder, "low");
    }

    #[test]
    fn test_closed_record_rejects_offers() {
        let mut record = AuctionRecord::open(bond());
        record.place_offer(Offer::new("b1", 10)).unwrap();
        record.close().unwrap();
        let before = record.clone();

        assert_matches!(
            record.place_offer(Offer::new("late", 1_000)),
            Err(TransitionError::AlreadyClosed)
        );
        assert_matches!(record.close(), Err(TransitionError::AlreadyClosed));
        assert_eq!(record, before);
    }

    #[test]
    fn test_close_without_offers_leaves_record_open() {
        let mut record = AuctionRecord::open(bond());
        assert_matches!(record.close(), Err(TransitionError::NoOffers));
        assert!(!record.closed);
        assert_eq!(record.winner, "");
    }

    #[test]
    fn test_winning_offer_requires_close() {
        let mut record = AuctionRecord::open(bond());
        record.place_offer(Offer::new("b1", 10)).unwrap();
        assert!(record.winning_offer().is_none());
        record.close().unwrap();
        assert_eq!(record.winning_offer(), Some(&Offer::new("b1", 10)));
    }

    #[test]
    fn test_transitions_produce_valid_records() {
        let mut record = AuctionRecord::open(bond());
        assert_eq!(record.validate(), Ok(()));
        record.place_offer(Offer::new("b1", 10)).unwrap();
        record.place_offer(Offer::new("b2", 10)).unwrap();
        assert_eq!(record.validate(), Ok(()));
        record.close().unwrap();
        assert_eq!(record.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_broken_records() {
        let mut record = AuctionRecord::open(Asset::new("", 1));
        assert_eq!(record.validate(), Err(InvariantViolation::EmptyAssetId));

        record = AuctionRecord::open(bond());
        record.offers = vec![Offer::new("b1", 1), Offer::new("", 5)];
        assert_eq!(record.validate(), Err(InvariantViolation::EmptyBidder { index: 1 }));

        record = AuctionRecord::open(bond());
        record.winner = "ghost".to_string();
        assert_matches!(record.validate(), Err(InvariantViolation::WinnerWhileOpen { .. }));

        // Closed without offers, so no winner can be valid
        record = AuctionRecord::open(bond());
        record.closed = true;
        assert_eq!(
            record.validate(),
            Err(InvariantViolation::WrongWinner {
                expected: None,
                actual: String::new(),
            })
        );

        // Later bidder at the same price does not win
        record = AuctionRecord::open(bond());
        record.offers = vec![Offer::new("b1", 70), Offer::new("b2", 70)];
        record.closed = true;
        record.winner = "b2".to_string();
        assert_matches!(
            record.validate(),
            Err(InvariantViolation::WrongWinner { expected: Some(expected), .. }) if expected == "b1"
        );
    }

    #[test]
    fn test_default_auction_id() {
        assert_eq!(AuctionId::default().as_str(), "leilao");
        assert_eq!(AuctionId::from("bond-7").to_string(), "bond-7");
    }
}
