//! Capability traits the verification pipelines consume.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::{
    errors::Error,
    types::{IncomingInvoice, OutgoingInvoice, OutgoingTx},
};

/// Read-side view of the gateway.
#[async_trait]
pub trait GatewayReader {
    /// The operator's own EVM address, derived from its signing key.
    fn address(&self) -> Address;

    /// The full validator set, for audit logging only.
    async fn operators(&self) -> Result<Vec<Address>, Error>;

    /// Total number of incoming invoices ever created.
    async fn incoming_invoice_count(&self) -> Result<u64, Error>;

    /// Total number of outgoing invoices ever created.
    async fn outgoing_invoice_count(&self) -> Result<u64, Error>;

    /// Total number of withdrawal batches ever created.
    async fn outgoing_tx_count(&self) -> Result<u64, Error>;

    /// The contract-side incoming cursor for `operator`. Never cached:
    /// only the gateway knows where a vote actually landed.
    async fn next_incoming_invoice_id(&self, operator: Address) -> Result<u64, Error>;

    /// The contract-side outgoing cursor for `operator`.
    async fn next_outgoing_invoice_id(&self, operator: Address) -> Result<u64, Error>;

    /// Fetches one incoming invoice.
    async fn incoming_invoice(&self, id: u64) -> Result<IncomingInvoice, Error>;

    /// Fetches one outgoing invoice.
    async fn outgoing_invoice(&self, id: u64) -> Result<OutgoingInvoice, Error>;

    /// Fetches one withdrawal batch.
    async fn outgoing_tx(&self, id: u64) -> Result<OutgoingTx, Error>;
}

/// Write-side of the gateway: signed votes, submitted and mined before the
/// call returns.
#[async_trait]
pub trait GatewaySender {
    /// Submits the operator's verdict on an incoming invoice.
    async fn verify_incoming_invoice(
        &self,
        id: u64,
        utxo: &str,
        amount: U256,
        recipient: Address,
        is_valid: bool,
    ) -> Result<(), Error>;

    /// Submits the operator's verdict on a withdrawal batch, with the
    /// hex-encoded partial BTC signature when voting yes and an empty
    /// string otherwise.
    async fn verify_outgoing_tx(
        &self,
        id: u64,
        is_valid: bool,
        signature_hex: &str,
    ) -> Result<(), Error>;
}
