//! Error types for the verification pipelines.

use thiserror::Error;

/// Everything a pipeline tick can fail with.
///
/// Ticks never escalate: the watcher logs the error, backs off briefly and
/// retries on the next tick, so this type only ever feeds log lines.
#[derive(Debug, Error)]
pub enum TrackerErr {
    /// A gateway read or write failed.
    #[error(transparent)]
    Gateway(#[from] bridge_operator_evm::errors::Error),

    /// Bitcoin-side verification or signing failed.
    #[error(transparent)]
    Btc(#[from] bridge_operator_btc::errors::Error),
}
