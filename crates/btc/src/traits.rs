//! Capability trait the verification pipelines consume.

use async_trait::async_trait;
use bitcoin::{Script, Transaction};

use crate::errors::Error;

/// Bitcoin-side capabilities required by the verification pipelines.
#[async_trait]
pub trait BtcVerifier {
    /// The configured multisig wallet address, verbatim.
    fn multisig_address(&self) -> &str;

    /// Checks a claimed deposit against the bitcoin chain.
    ///
    /// Returns `Ok(false)` whenever the chain disagrees with the claim:
    /// wrong amount, wrong recipient, or not enough confirmations. Errors
    /// are reserved for the node being unreachable, the referenced
    /// transaction being unknown, or the reference not parsing at all.
    async fn verify_btc_deposit(
        &self,
        utxo: &str,
        amount: u64,
        recipient: &str,
    ) -> Result<bool, Error>;

    /// Canonical address encoding of an output script on the configured
    /// network.
    fn convert_to_address(&self, script: &Script) -> Result<String, Error>;

    /// Signs input 0 of `tx` with the operator's key share and the multisig
    /// redeem script, SIGHASH_ALL. Returns the DER signature with the
    /// sighash byte appended.
    fn sign(&self, tx: &Transaction) -> Result<Vec<u8>, Error>;
}
