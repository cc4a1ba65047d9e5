use std::time::Duration;

use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::{Address, U256},
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
    signers::{local::PrivateKeySigner, Signer},
};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
    config::EvmConfig,
    contract::Gateway::{self, GatewayInstance},
    errors::Error,
    traits::{GatewayReader, GatewaySender},
    types::{to_u64, IncomingInvoice, OutgoingInvoice, OutgoingTx},
};

/// Headroom multiplier applied to the node's gas price suggestion before
/// every write.
const GAS_PRICE_FACTOR: u128 = 2;

/// Gateway client bound to the operator's EVM key.
///
/// Reads go straight to the node. Writes serialize behind a lock so the gas
/// price sampled for a vote is the one the vote is submitted with, and so
/// the two pipelines never race on the account nonce.
pub struct GatewayClient {
    address: Address,
    call_timeout: Duration,
    provider: DynProvider,
    gateway: GatewayInstance<DynProvider>,
    submit_lock: Mutex<()>,
}

impl GatewayClient {
    /// Connects to the EVM node and binds the gateway contract.
    pub fn new(config: &EvmConfig) -> Result<Self, Error> {
        let key_bytes = hex::decode(&config.private_key)
            .map_err(|e| Error::Config(format!("bad private key hex: {e}")))?;
        let signer = PrivateKeySigner::from_slice(&key_bytes)
            .map_err(|e| Error::Config(format!("bad private key: {e}")))?
            .with_chain_id(Some(config.chain_id as u64));
        let address = signer.address();

        let url = config
            .url
            .parse()
            .map_err(|e| Error::Config(format!("bad rpc url {}: {e}", config.url)))?;
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::new(signer))
            .connect_http(url)
            .erased();

        let gateway_addr = config
            .contracts
            .gateway_addr
            .parse::<Address>()
            .map_err(|e| Error::Config(format!("bad gateway address: {e}")))?;
        let gateway = Gateway::new(gateway_addr, provider.clone());

        Ok(Self {
            address,
            call_timeout: Duration::from_secs(config.call_timeout),
            provider,
            gateway,
            submit_lock: Mutex::new(()),
        })
    }

    /// Samples the node's suggested gas price with headroom applied.
    ///
    /// Must be called with the submit lock held so the sample cannot
    /// interleave with another pipeline's submission.
    async fn refreshed_gas_price(&self) -> Result<u128, Error> {
        let suggested = self.provider.get_gas_price().await?;
        let bumped = bump_gas_price(suggested);
        debug!(%suggested, %bumped, "refreshed gas price");
        Ok(bumped)
    }

    /// Waits for the submitted vote to be mined within the call timeout and
    /// rejects reverted receipts.
    async fn wait_mined(&self, pending: PendingTransactionBuilder<Ethereum>) -> Result<(), Error> {
        let receipt = tokio::time::timeout(self.call_timeout, pending.get_receipt())
            .await
            .map_err(|_| Error::ConfirmationTimeout(self.call_timeout))??;
        if !receipt.status() {
            return Err(Error::Reverted(receipt.transaction_hash));
        }
        info!(tx_hash = %receipt.transaction_hash, "vote mined");
        Ok(())
    }
}

fn bump_gas_price(suggested: u128) -> u128 {
    suggested.saturating_mul(GAS_PRICE_FACTOR)
}

#[async_trait]
impl GatewayReader for GatewayClient {
    fn address(&self) -> Address {
        self.address
    }

    async fn operators(&self) -> Result<Vec<Address>, Error> {
        Ok(self.gateway.allValidators().call().await?)
    }

    async fn incoming_invoice_count(&self) -> Result<u64, Error> {
        let count = self.gateway.incomingInvoicesCount().call().await?;
        to_u64(count, "incoming invoice count")
    }

    async fn outgoing_invoice_count(&self) -> Result<u64, Error> {
        let count = self.gateway.outgoingInvoicesCount().call().await?;
        to_u64(count, "outgoing invoice count")
    }

    async fn outgoing_tx_count(&self) -> Result<u64, Error> {
        let count = self.gateway.outgoingTxCount().call().await?;
        to_u64(count, "outgoing tx count")
    }

    async fn next_incoming_invoice_id(&self, operator: Address) -> Result<u64, Error> {
        let info = self.gateway.validator(operator).call().await?;
        to_u64(info.nextIncomingInvoice, "incoming cursor")
    }

    async fn next_outgoing_invoice_id(&self, operator: Address) -> Result<u64, Error> {
        let info = self.gateway.validator(operator).call().await?;
        to_u64(info.nextOutgoingInvoice, "outgoing cursor")
    }

    async fn incoming_invoice(&self, id: u64) -> Result<IncomingInvoice, Error> {
        // The gateway keys incoming invoices by decimal string id.
        let raw = self.gateway.incomingInvoice(id.to_string()).call().await?;
        raw.try_into()
    }

    async fn outgoing_invoice(&self, id: u64) -> Result<OutgoingInvoice, Error> {
        let raw = self.gateway.outgoingInvoice(U256::from(id)).call().await?;
        raw.try_into()
    }

    async fn outgoing_tx(&self, id: u64) -> Result<OutgoingTx, Error> {
        let raw = self.gateway.outgoingTx(U256::from(id)).call().await?;
        raw.try_into()
    }
}

#[async_trait]
impl GatewaySender for GatewayClient {
    async fn verify_incoming_invoice(
        &self,
        id: u64,
        utxo: &str,
        amount: U256,
        recipient: Address,
        is_valid: bool,
    ) -> Result<(), Error> {
        let _guard = self.submit_lock.lock().await;
        let gas_price = self.refreshed_gas_price().await?;

        debug!(%id, %is_valid, "submitting incoming invoice vote");
        let pending = self
            .gateway
            .verifyIncomingInvoice(U256::from(id), utxo.to_owned(), amount, recipient, is_valid)
            .gas_price(gas_price)
            .send()
            .await?;
        self.wait_mined(pending).await
    }

    async fn verify_outgoing_tx(
        &self,
        id: u64,
        is_valid: bool,
        signature_hex: &str,
    ) -> Result<(), Error> {
        let _guard = self.submit_lock.lock().await;
        let gas_price = self.refreshed_gas_price().await?;

        debug!(%id, %is_valid, "submitting outgoing tx vote");
        let pending = self
            .gateway
            .verifyOutgoingTx(U256::from(id), is_valid, signature_hex.to_owned())
            .gas_price(gas_price)
            .send()
            .await?;
        self.wait_mined(pending).await
    }
}
