//! JSON codec for persisted records
//!
//! Records are stored as compact JSON: self-describing, field-tagged and
//! readable with ordinary tooling. Decoding is all-or-nothing; malformed input
//! yields a [`SerializationError`] and never a partially populated value.
//! Both directions check [`AuctionRecord::validate`], so a record that breaks
//! the auction invariants is neither written nor accepted on read.

use crate::errors::InvariantViolation;
use crate::types::AuctionRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Serialization operation result type
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Error type for serialization operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    JsonError(String),

    /// Input was empty where a document was expected
    #[error("Empty input")]
    Empty,

    /// Well-formed document that breaks the record invariants
    #[error("Invalid record: {0}")]
    Invalid(#[from] InvariantViolation),
}

impl From<serde_json::Error> for SerializationError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

/// Serialize a value to JSON bytes (compact format)
pub fn to_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(SerializationError::from)
}

/// Serialize a value to a pretty-printed JSON string
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(SerializationError::from)
}

/// Deserialize a value from a JSON byte slice
pub fn from_json_slice<'a, T: Deserialize<'a>>(json: &'a [u8]) -> Result<T> {
    serde_json::from_slice(json).map_err(SerializationError::from)
}

/// Encode a record for storage
pub fn encode_record(record: &AuctionRecord) -> Result<Vec<u8>> {
    record.validate()?;
    to_json_bytes(record)
}

/// Decode a stored record
pub fn decode_record(bytes: &[u8]) -> Result<AuctionRecord> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(SerializationError::Empty);
    }
    let record: AuctionRecord = from_json_slice(bytes)?;
    record.validate()?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Asset, Offer};
    use assert_matches::assert_matches;

    fn sample() -> AuctionRecord {
        let mut record = AuctionRecord::open(Asset::new("CUSIP123", 100_000));
        record.place_offer(Offer::new("alice", 10)).unwrap();
        record.place_offer(Offer::new("bob", 20)).unwrap();
        record
    }

    #[test]
    fn test_record_wire_shape() -> Result<()> {
        let bytes = encode_record(&AuctionRecord::open(Asset::new("CUSIP123", 100)))?;
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"asset":{"id":"CUSIP123","quantity":100},"offers":[],"closed":false,"winner":""}"#
        );
        Ok(())
    }

    #[test]
    fn test_record_roundtrip_keeps_offer_order() -> Result<()> {
        let record = sample();
        let decoded = decode_record(&encode_record(&record)?)?;
        assert_eq!(decoded, record);
        assert_eq!(decoded.offers[0].bidder, "alice");
        assert_eq!(decoded.offers[1].bidder, "bob");
        Ok(())
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert_matches!(decode_record(b""), Err(SerializationError::Empty));
        assert_matches!(decode_record(b"  \n"), Err(SerializationError::Empty));
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        assert_matches!(decode_record(b"{not json"), Err(SerializationError::JsonError(_)));
        // Missing `winner`
        assert_matches!(
            decode_record(br#"{"asset":{"id":"A","quantity":1},"offers":[],"closed":false}"#),
            Err(SerializationError::JsonError(_))
        );
        // Price is not an integer
        assert_matches!(
            decode_record(
                br#"{"asset":{"id":"A","quantity":1},"offers":[{"bidder":"b","price":"ten"}],"closed":false,"winner":""}"#
            ),
            Err(SerializationError::JsonError(_))
        );
    }

    #[test]
    fn test_invariant_violations_are_rejected() {
        let closed_without_winner =
            br#"{"asset":{"id":"A","quantity":1},"offers":[],"closed":true,"winner":""}"#;
        assert_matches!(
            decode_record(closed_without_winner),
            Err(SerializationError::Invalid(InvariantViolation::WrongWinner { .. }))
        );

        let empty_bidder = br#"{"asset":{"id":"A","quantity":1},"offers":[{"bidder":"","price":5}],"closed":false,"winner":""}"#;
        assert_matches!(
            decode_record(empty_bidder),
            Err(SerializationError::Invalid(InvariantViolation::EmptyBidder { index: 0 }))
        );

        let mut record = AuctionRecord::open(Asset::new("A", 1));
        record.winner = "ghost".to_string();
        assert_matches!(
            encode_record(&record),
            Err(SerializationError::Invalid(InvariantViolation::WinnerWhileOpen { .. }))
        );
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let doc = br#"{"asset":{"id":"A","quantity":1},"offers":[],"closed":false,"winner":"","extra":1}"#;
        assert_matches!(decode_record(doc), Err(SerializationError::JsonError(_)));
    }
}
