//! Error types for the gateway adapter.

use std::time::Duration;

use alloy::primitives::TxHash;
use thiserror::Error;

/// Everything a gateway read or write can fail with.
///
/// A revert and a network failure get the same treatment from the pipelines
/// (log and retry next tick); the variants exist for the log lines.
#[derive(Debug, Error)]
pub enum Error {
    /// Construction-time configuration problems. Fatal.
    #[error("invalid gateway configuration: {0}")]
    Config(String),

    /// A contract call failed: the node was unreachable or the gateway
    /// rejected the call outright.
    #[error("gateway call failed: {0}")]
    Contract(#[from] alloy::contract::Error),

    /// A raw RPC request outside a contract call failed.
    #[error("evm rpc failed: {0}")]
    Transport(#[from] alloy::transports::TransportError),

    /// The submitted transaction could not be tracked to a receipt.
    #[error("could not confirm submitted transaction: {0}")]
    Receipt(#[from] alloy::providers::PendingTransactionError),

    /// The vote was mined but the gateway reverted it, e.g. a stale cursor
    /// or a duplicate vote.
    #[error("transaction {0} reverted on chain")]
    Reverted(TxHash),

    /// The vote was submitted but not mined within the call timeout.
    #[error("transaction not mined within {0:?}")]
    ConfirmationTimeout(Duration),

    /// The gateway produced data outside its documented domain. Points at a
    /// contract bug or an ABI drift, never at user input.
    #[error("gateway returned malformed data: {0}")]
    Malformed(String),
}
