//! In-memory adapter doubles for pipeline tests.

use std::sync::Mutex;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use bitcoin::{Network, Script, Transaction};
use bridge_operator_btc::{errors::Error as BtcError, traits::BtcVerifier};
use bridge_operator_evm::{
    errors::Error as EvmError,
    traits::{GatewayReader, GatewaySender},
    types::{IncomingInvoice, OutgoingInvoice, OutgoingTx},
};

/// The address the mock gateway reports as our own.
pub(crate) const OPERATOR: Address = Address::repeat_byte(0xa1);

/// A vote recorded by the mock gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Vote {
    Incoming {
        id: u64,
        is_valid: bool,
    },
    Outgoing {
        id: u64,
        is_valid: bool,
        signature: String,
    },
}

/// Mutable world state behind the mock gateway.
#[derive(Debug, Default)]
pub(crate) struct GatewayState {
    /// Contract-side incoming cursor for [`OPERATOR`].
    pub(crate) next_incoming: u64,

    /// Incoming invoices; id `n` lives at index `n - 1`.
    pub(crate) incoming: Vec<IncomingInvoice>,

    /// Outgoing invoices, looked up by their `id` field.
    pub(crate) outgoing_invoices: Vec<OutgoingInvoice>,

    /// Withdrawal batches; id `n` lives at index `n - 1`.
    pub(crate) outgoing_txs: Vec<OutgoingTx>,

    /// When set, every outgoing invoice fetch fails.
    pub(crate) broken_outgoing_invoices: bool,

    /// Votes received so far.
    pub(crate) votes: Vec<Vote>,
}

/// Gateway double that mimics contract-side cursor advancement: a recorded
/// incoming vote marks our confirmation and bumps the cursor past the id.
#[derive(Debug)]
pub(crate) struct MockGateway {
    state: Mutex<GatewayState>,
}

impl MockGateway {
    pub(crate) fn with_state(state: GatewayState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    pub(crate) fn votes(&self) -> Vec<Vote> {
        self.state.lock().unwrap().votes.clone()
    }
}

#[async_trait]
impl GatewayReader for MockGateway {
    fn address(&self) -> Address {
        OPERATOR
    }

    async fn operators(&self) -> Result<Vec<Address>, EvmError> {
        Ok(vec![OPERATOR])
    }

    async fn incoming_invoice_count(&self) -> Result<u64, EvmError> {
        Ok(self.state.lock().unwrap().incoming.len() as u64)
    }

    async fn outgoing_invoice_count(&self) -> Result<u64, EvmError> {
        Ok(self.state.lock().unwrap().outgoing_invoices.len() as u64)
    }

    async fn outgoing_tx_count(&self) -> Result<u64, EvmError> {
        Ok(self.state.lock().unwrap().outgoing_txs.len() as u64)
    }

    async fn next_incoming_invoice_id(&self, _operator: Address) -> Result<u64, EvmError> {
        Ok(self.state.lock().unwrap().next_incoming)
    }

    async fn next_outgoing_invoice_id(&self, _operator: Address) -> Result<u64, EvmError> {
        Ok(0)
    }

    async fn incoming_invoice(&self, id: u64) -> Result<IncomingInvoice, EvmError> {
        self.state
            .lock()
            .unwrap()
            .incoming
            .get(id.saturating_sub(1) as usize)
            .cloned()
            .ok_or_else(|| EvmError::Malformed(format!("no incoming invoice {id}")))
    }

    async fn outgoing_invoice(&self, id: u64) -> Result<OutgoingInvoice, EvmError> {
        let state = self.state.lock().unwrap();
        if state.broken_outgoing_invoices {
            return Err(EvmError::Malformed(format!(
                "outgoing invoice {id} unavailable"
            )));
        }
        state
            .outgoing_invoices
            .iter()
            .find(|invoice| invoice.id == id)
            .cloned()
            .ok_or_else(|| EvmError::Malformed(format!("no outgoing invoice {id}")))
    }

    async fn outgoing_tx(&self, id: u64) -> Result<OutgoingTx, EvmError> {
        self.state
            .lock()
            .unwrap()
            .outgoing_txs
            .get(id.saturating_sub(1) as usize)
            .cloned()
            .ok_or_else(|| EvmError::Malformed(format!("no outgoing tx {id}")))
    }
}

#[async_trait]
impl GatewaySender for MockGateway {
    async fn verify_incoming_invoice(
        &self,
        id: u64,
        _utxo: &str,
        _amount: U256,
        _recipient: Address,
        is_valid: bool,
    ) -> Result<(), EvmError> {
        let mut state = self.state.lock().unwrap();
        state.votes.push(Vote::Incoming { id, is_valid });

        // What the real contract does once our vote lands.
        if let Some(invoice) = state.incoming.get_mut(id.saturating_sub(1) as usize) {
            if let Some(index) = invoice.validator_index(OPERATOR) {
                invoice.confirmations[index] = true;
            }
        }
        state.next_incoming = id + 1;
        Ok(())
    }

    async fn verify_outgoing_tx(
        &self,
        id: u64,
        is_valid: bool,
        signature_hex: &str,
    ) -> Result<(), EvmError> {
        self.state.lock().unwrap().votes.push(Vote::Outgoing {
            id,
            is_valid,
            signature: signature_hex.to_owned(),
        });
        Ok(())
    }
}

/// Bitcoin double with a fixed verdict and a canned signature.
#[derive(Debug)]
pub(crate) struct MockBtc {
    /// Verdict returned by deposit verification.
    pub(crate) deposit_valid: bool,

    /// When set, deposit verification fails instead of answering.
    pub(crate) deposit_error: bool,

    pub(crate) sign_calls: Mutex<usize>,
}

impl MockBtc {
    pub(crate) const SIGNATURE: [u8; 4] = [0xde, 0xad, 0xbe, 0xef];

    pub(crate) fn sign_count(&self) -> usize {
        *self.sign_calls.lock().unwrap()
    }
}

impl Default for MockBtc {
    fn default() -> Self {
        Self {
            deposit_valid: true,
            deposit_error: false,
            sign_calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl BtcVerifier for MockBtc {
    fn multisig_address(&self) -> &str {
        "2N3oefVeg6stiTb5Kh3ozCSkaqmx91FDbsm"
    }

    async fn verify_btc_deposit(
        &self,
        _utxo: &str,
        _amount: u64,
        _recipient: &str,
    ) -> Result<bool, BtcError> {
        if self.deposit_error {
            return Err(BtcError::Malformed("verifier offline".to_owned()));
        }
        Ok(self.deposit_valid)
    }

    fn convert_to_address(&self, script: &Script) -> Result<String, BtcError> {
        bitcoin::Address::from_script(script, Network::Testnet)
            .map(|addr| addr.to_string())
            .map_err(|e| BtcError::Malformed(e.to_string()))
    }

    fn sign(&self, _tx: &Transaction) -> Result<Vec<u8>, BtcError> {
        *self.sign_calls.lock().unwrap() += 1;
        Ok(Self::SIGNATURE.to_vec())
    }
}
