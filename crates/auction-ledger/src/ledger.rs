//! Transaction execution
//!
//! [`AuctionLedger`] runs decoded transactions against a [`LedgerEffects`]
//! store. Mutating transactions follow one shape: read the record and its
//! version, validate and apply the transition in memory, then commit with a
//! version check. Nothing is written unless every check passed, and a commit
//! that loses a race fails with a retryable conflict instead of overwriting.

use auction_core::{
    decode_record, encode_record, Asset, AuctionError, AuctionId, AuctionRecord, LedgerEffects,
    Offer, Result, Transaction, Version,
};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Successful transaction outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// A mutation was committed at `version`
    Committed {
        /// Version written by the commit
        version: Version,
    },
    /// Raw record bytes returned by a query
    Payload(Vec<u8>),
}

impl Response {
    /// Payload bytes, if this response carries any
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Self::Committed { .. } => None,
            Self::Payload(bytes) => Some(bytes),
        }
    }
}

/// One auction bound to a ledger store
#[derive(Debug, Clone)]
pub struct AuctionLedger<L> {
    ledger: L,
    auction: AuctionId,
}

impl<L: LedgerEffects> AuctionLedger<L> {
    /// Bind `auction` to `ledger`
    pub fn new(ledger: L, auction: AuctionId) -> Self {
        Self { ledger, auction }
    }

    /// Bind the well-known default auction to `ledger`
    pub fn with_default_auction(ledger: L) -> Self {
        Self::new(ledger, AuctionId::default())
    }

    /// Auction this ledger addresses
    pub fn auction(&self) -> &AuctionId {
        &self.auction
    }

    /// Underlying store
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Decode and execute a named transaction
    pub async fn invoke<S: AsRef<str>>(&self, function: &str, args: &[S]) -> Result<Response> {
        let tx = Transaction::decode(function, args).map_err(|e| {
            warn!(auction = %self.auction, function, error = %e, "Transaction refused at dispatch");
            e
        })?;
        self.execute(tx).await
    }

    /// Execute a decoded transaction
    pub async fn execute(&self, tx: Transaction) -> Result<Response> {
        let span = info_span!(
            "transaction",
            tx_id = %Uuid::new_v4(),
            auction = %self.auction,
            function = tx.function(),
        );

        async move {
            debug!(%tx, "Executing");
            let result = match tx {
                Transaction::Create { asset } => self
                    .create(asset)
                    .await
                    .map(|version| Response::Committed { version }),
                Transaction::Bid { offer } => self
                    .bid(offer)
                    .await
                    .map(|version| Response::Committed { version }),
                Transaction::Close => self
                    .close()
                    .await
                    .map(|version| Response::Committed { version }),
                Transaction::Query => self.query().await.map(Response::Payload),
            };
            if let Err(e) = &result {
                warn!(error = %e, retryable = e.is_retryable(), "Transaction failed");
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Start a fresh auction for `asset`, replacing any existing record
    pub async fn create(&self, asset: Asset) -> Result<Version> {
        let key = self.auction.as_str();

        // Create never fails on the read; it is only used to flag a reset.
        match self.ledger.retrieve(key).await {
            Ok(Some(previous)) => warn!(
                previous_version = %previous.version,
                "Replacing existing auction record"
            ),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Could not inspect previous record"),
        }

        let record = AuctionRecord::open(asset);
        let bytes = Self::encode(&record)?;
        let version = self.ledger.store(key, bytes).await?;

        info!(
            asset = %record.asset.id,
            quantity = record.asset.quantity,
            %version,
            "Auction created"
        );
        Ok(version)
    }

    /// Append `offer` to the open auction
    pub async fn bid(&self, offer: Offer) -> Result<Version> {
        let (mut record, read_version) = self.load().await?;
        record.place_offer(offer.clone())?;
        let version = self.commit(&record, read_version).await?;

        info!(
            bidder = %offer.bidder,
            price = offer.price,
            offers = record.offers.len(),
            %version,
            "Offer recorded"
        );
        Ok(version)
    }

    /// Seal the auction and record the winning bidder
    pub async fn close(&self) -> Result<Version> {
        let (mut record, read_version) = self.load().await?;
        let winner = record.close()?.clone();
        let version = self.commit(&record, read_version).await?;

        info!(
            winner = %winner.bidder,
            price = winner.price,
            offers = record.offers.len(),
            %version,
            "Auction closed"
        );
        Ok(version)
    }

    /// Stored record bytes, unmodified
    pub async fn query(&self) -> Result<Vec<u8>> {
        let stored = self
            .ledger
            .retrieve(self.auction.as_str())
            .await?
            .ok_or_else(|| AuctionError::not_found(&self.auction))?;
        debug!(version = %stored.version, bytes = stored.value.len(), "Record read");
        Ok(stored.value)
    }

    /// Stored record, decoded
    pub async fn record(&self) -> Result<AuctionRecord> {
        self.load().await.map(|(record, _)| record)
    }

    async fn load(&self) -> Result<(AuctionRecord, Version)> {
        let stored = self
            .ledger
            .retrieve(self.auction.as_str())
            .await?
            .ok_or_else(|| AuctionError::not_found(&self.auction))?;
        let record = decode_record(&stored.value)
            .map_err(|e| AuctionError::corrupt(&self.auction, e.to_string()))?;
        Ok((record, stored.version))
    }

    // Encoding fails only on invariant violations, which come from caller input.
    fn encode(record: &AuctionRecord) -> Result<Vec<u8>> {
        encode_record(record).map_err(|e| AuctionError::argument(e.to_string()))
    }

    async fn commit(&self, record: &AuctionRecord, read_version: Version) -> Result<Version> {
        let bytes = Self::encode(record)?;
        let version = self
            .ledger
            .store_if(self.auction.as_str(), bytes, read_version)
            .await?;
        Ok(version)
    }
}
