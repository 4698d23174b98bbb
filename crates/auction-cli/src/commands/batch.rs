// Transaction file runner
//
// One transaction per line: a function name followed by whitespace-separated
// arguments. Blank lines and lines starting with `#` are skipped.

use crate::commands::transaction::render;
use anyhow::Context;
use auction_core::LedgerEffects;
use auction_ledger::AuctionLedger;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// One parsed transaction line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    /// 1-based line number in the source file
    pub line: usize,
    /// Function name
    pub function: String,
    /// Positional arguments
    pub args: Vec<String>,
}

/// Counts from a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Transactions attempted
    pub executed: usize,
    /// Transactions that failed
    pub failed: usize,
}

/// Parse a single line; `None` for blank lines and comments
pub fn parse_line(line: usize, text: &str) -> Option<BatchEntry> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return None;
    }
    let mut words = text.split_whitespace();
    let function = words.next()?.to_string();
    Some(BatchEntry {
        line,
        function,
        args: words.map(str::to_string).collect(),
    })
}

/// Parse every transaction line in `text`
pub fn parse(text: &str) -> Vec<BatchEntry> {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| parse_line(index + 1, line))
        .collect()
}

/// Execute entries in order, writing one outcome line each to `out`
///
/// Stops after the first failure unless `keep_going` is set.
pub async fn run<L, W>(
    ledger: &AuctionLedger<L>,
    entries: &[BatchEntry],
    keep_going: bool,
    out: &mut W,
) -> std::io::Result<BatchSummary>
where
    L: LedgerEffects,
    W: Write,
{
    let mut summary = BatchSummary::default();

    for entry in entries {
        summary.executed += 1;
        match ledger.invoke(&entry.function, &entry.args).await {
            Ok(response) => {
                writeln!(out, "line {}: {}", entry.line, render(&entry.function, &response))?;
            }
            Err(e) => {
                summary.failed += 1;
                writeln!(out, "line {}: {}: error: {e}", entry.line, entry.function)?;
                if !keep_going {
                    warn!(line = entry.line, "Stopping batch after failed transaction");
                    break;
                }
            }
        }
    }

    Ok(summary)
}

/// Run the transaction file at `path` and print outcomes to stdout
pub async fn run_file<L: LedgerEffects>(
    ledger: &AuctionLedger<L>,
    path: &Path,
    keep_going: bool,
) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read batch file {}", path.display()))?;
    let entries = parse(&text);
    info!(path = %path.display(), transactions = entries.len(), "Running batch");

    // `Stdout` locks per write, so no lock is held across a transaction.
    let mut stdout = std::io::stdout();
    let summary = run(ledger, &entries, keep_going, &mut stdout).await?;
    stdout.flush()?;

    info!(
        executed = summary.executed,
        failed = summary.failed,
        "Batch finished"
    );
    if summary.failed > 0 {
        anyhow::bail!(
            "{} of {} transactions failed",
            summary.failed,
            summary.executed
        );
    }
    Ok(())
}
