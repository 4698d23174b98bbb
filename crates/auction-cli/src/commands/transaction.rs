// Single transaction commands

use anyhow::Context;
use auction_core::serialization::{from_json_slice, to_json_pretty};
use auction_core::LedgerEffects;
use auction_ledger::{AuctionLedger, Response};

/// Human-readable outcome of a successful transaction
pub fn render(function: &str, response: &Response) -> String {
    match response {
        Response::Committed { version } => format!("{function}: committed at {version}"),
        Response::Payload(bytes) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Run one named transaction and print its outcome
pub async fn invoke<L, S>(
    ledger: &AuctionLedger<L>,
    function: &str,
    args: &[S],
) -> anyhow::Result<()>
where
    L: LedgerEffects,
    S: AsRef<str>,
{
    let response = ledger
        .invoke(function, args)
        .await
        .with_context(|| {
            format!("Transaction '{function}' on auction '{}' failed", ledger.auction())
        })?;
    println!("{}", render(function, &response));
    Ok(())
}

/// Print the stored record, optionally reformatted
pub async fn query<L: LedgerEffects>(
    ledger: &AuctionLedger<L>,
    pretty: bool,
) -> anyhow::Result<()> {
    let bytes = ledger
        .query()
        .await
        .with_context(|| format!("Failed to query auction '{}'", ledger.auction()))?;

    if pretty {
        let value: serde_json::Value =
            from_json_slice(&bytes).context("Stored record is not valid JSON")?;
        println!("{}", to_json_pretty(&value)?);
    } else {
        println!("{}", String::from_utf8_lossy(&bytes));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use auction_core::Version;

    #[test]
    fn test_render_commit() {
        let response = Response::Committed {
            version: Version::new(3),
        };
        assert_eq!(render("bid", &response), "bid: committed at v3");
    }

    #[test]
    fn test_render_payload_verbatim() {
        let response = Response::Payload(b"{\"closed\":false}".to_vec());
        assert_eq!(render("query", &response), "{\"closed\":false}");
    }
}
