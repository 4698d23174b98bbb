// Command modules for CLI

/// Transaction file runner
pub mod batch;

/// Single transaction commands
pub mod transaction;
