//! Error types for the bitcoin adapter.

use bitcoin::Txid;
use bitcoind_async_client::error::ClientError;
use thiserror::Error;

/// Everything a bitcoin-side check or signature can fail with.
///
/// A verification that merely disagrees with the chain is not an error; it
/// is a `false` verdict. Errors mean the question could not be answered.
#[derive(Debug, Error)]
pub enum Error {
    /// Construction-time configuration problems. Fatal.
    #[error("invalid bitcoin configuration: {0}")]
    Config(String),

    /// The node could not be reached or rejected the request.
    #[error("bitcoin rpc failed: {0}")]
    Unavailable(#[from] ClientError),

    /// The referenced transaction is not observable on the chain yet.
    #[error("transaction {0} not observable on bitcoin yet")]
    NotFound(Txid),

    /// A reference or script that should have been well-formed was not.
    #[error("malformed bitcoin data: {0}")]
    Malformed(String),

    /// Signing the proposed transaction failed.
    #[error("could not sign transaction: {0}")]
    Sign(String),
}
