//! Transaction dispatch
//!
//! Callers address the auction with a function name and positional string
//! arguments. [`Transaction::decode`] turns that pair into a closed enum once,
//! at the boundary, so unknown functions and malformed arguments are refused
//! before any storage is touched.

use crate::errors::{AuctionError, Result};
use crate::types::{Asset, Offer};
use std::fmt;

/// A decoded auction transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    /// Start (or restart) the auction for an asset
    Create {
        /// Asset to auction
        asset: Asset,
    },
    /// Append an offer to the open auction
    Bid {
        /// Offer to record
        offer: Offer,
    },
    /// Seal the auction and pick the winner
    Close,
    /// Read the stored record verbatim
    Query,
}

impl Transaction {
    /// Function name for `Create`
    pub const CREATE: &'static str = "create";
    /// Function name for `Bid`
    pub const BID: &'static str = "bid";
    /// Function name for `Close`
    pub const CLOSE: &'static str = "close";
    /// Function name for `Query`
    pub const QUERY: &'static str = "query";

    /// Decode a function name and its arguments
    pub fn decode<S: AsRef<str>>(function: &str, args: &[S]) -> Result<Self> {
        match function {
            Self::CREATE => {
                let [id, quantity] = exact_args::<_, 2>(function, args)?;
                let id = identifier("asset id", id)?;
                let quantity = integer("quantity", quantity)?;
                Ok(Self::Create {
                    asset: Asset::new(id, quantity),
                })
            }
            Self::BID => {
                let [bidder, price] = exact_args::<_, 2>(function, args)?;
                let bidder = identifier("bidder", bidder)?;
                let price = integer("price", price)?;
                Ok(Self::Bid {
                    offer: Offer::new(bidder, price),
                })
            }
            // Close and Query take no arguments; extras from the dispatcher are ignored.
            Self::CLOSE => Ok(Self::Close),
            Self::QUERY => Ok(Self::Query),
            other => Err(AuctionError::dispatch(other)),
        }
    }

    /// Function name this transaction was decoded from
    pub fn function(&self) -> &'static str {
        match self {
            Self::Create { .. } => Self::CREATE,
            Self::Bid { .. } => Self::BID,
            Self::Close => Self::CLOSE,
            Self::Query => Self::QUERY,
        }
    }

    /// Whether executing this transaction writes to the ledger
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::Query)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create { asset } => write!(f, "create({}, {})", asset.id, asset.quantity),
            Self::Bid { offer } => write!(f, "bid({}, {})", offer.bidder, offer.price),
            Self::Close => f.write_str("close()"),
            Self::Query => f.write_str("query()"),
        }
    }
}

fn exact_args<'a, S: AsRef<str>, const N: usize>(
    function: &str,
    args: &'a [S],
) -> Result<[&'a str; N]> {
    if args.len() != N {
        return Err(AuctionError::argument(format!(
            "{function} expects {N} arguments, got {}",
            args.len()
        )));
    }
    let mut out = [""; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg.as_ref();
    }
    Ok(out)
}

fn identifier(name: &str, value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(AuctionError::argument(format!("{name} cannot be empty")));
    }
    Ok(value.to_string())
}

fn integer(name: &str, value: &str) -> Result<i64> {
    value
        .parse::<i64>()
        .map_err(|e| AuctionError::argument(format!("{name} '{value}' is not an integer: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_decode_create() {
        let tx = Transaction::decode("create", &["CUSIP123", "100000"]).unwrap();
        assert_eq!(
            tx,
            Transaction::Create {
                asset: Asset::new("CUSIP123", 100_000)
            }
        );
        assert_eq!(tx.function(), "create");
        assert_eq!(tx.to_string(), "create(CUSIP123, 100000)");
    }

    #[test]
    fn test_decode_bid_accepts_signed_prices() {
        let tx = Transaction::decode("bid", &["alice", "-5"]).unwrap();
        assert_eq!(
            tx,
            Transaction::Bid {
                offer: Offer::new("alice", -5)
            }
        );
        let tx = Transaction::decode("bid", &["alice", "0"]).unwrap();
        assert_matches!(tx, Transaction::Bid { offer } if offer.price == 0);
    }

    #[test]
    fn test_wrong_argument_count() {
        assert_matches!(
            Transaction::decode("create", &["CUSIP123"]),
            Err(AuctionError::Argument { .. })
        );
        assert_matches!(
            Transaction::decode("bid", &["a", "1", "extra"]),
            Err(AuctionError::Argument { .. })
        );
        let none: [&str; 0] = [];
        assert_matches!(
            Transaction::decode("bid", &none),
            Err(AuctionError::Argument { .. })
        );
    }

    #[test]
    fn test_unparseable_integers() {
        for bad in ["", "ten", "1.5", " 7", "99999999999999999999"] {
            assert_matches!(
                Transaction::decode("bid", &["alice", bad]),
                Err(AuctionError::Argument { .. }),
                "price {bad:?} should be rejected"
            );
        }
        assert_matches!(
            Transaction::decode("create", &["A", "lots"]),
            Err(AuctionError::Argument { .. })
        );
    }

    #[test]
    fn test_empty_identifiers() {
        assert_matches!(
            Transaction::decode("create", &["", "1"]),
            Err(AuctionError::Argument { .. })
        );
        assert_matches!(
            Transaction::decode("bid", &["", "1"]),
            Err(AuctionError::Argument { .. })
        );
    }

    #[test]
    fn test_close_and_query_ignore_arguments() {
        assert_eq!(Transaction::decode("close", &["x"]).unwrap(), Transaction::Close);
        assert_eq!(Transaction::decode::<&str>("query", &[]).unwrap(), Transaction::Query);
        assert!(!Transaction::Query.is_mutation());
        assert!(Transaction::Close.is_mutation());
    }

    #[test]
    fn test_unknown_function() {
        let err = Transaction::decode("withdraw", &["a"]).unwrap_err();
        assert_eq!(err, AuctionError::dispatch("withdraw"));
        assert_eq!(err.to_string(), "Invalid function: withdraw");
        // Names are case-sensitive
        assert_matches!(
            Transaction::decode::<&str>("Close", &[]),
            Err(AuctionError::Dispatch { .. })
        );
    }
}
