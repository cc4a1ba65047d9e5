//! Pipeline verifying and co-signing proposed withdrawal batches.

use std::{sync::Arc, time::Duration};

use bitcoin::{consensus, Transaction};
use bridge_operator_btc::traits::BtcVerifier;
use bridge_operator_evm::{
    traits::{GatewayReader, GatewaySender},
    types::InvoiceStatus,
};
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{constants::ERROR_BACKOFF, errors::TrackerErr};

/// A `(destination address, satoshis)` pair the batch must pay out.
type ExpectedOutput = (String, i64);

/// Watches the newest withdrawal batch, reconstructs the payouts it must
/// make from the referenced invoices and co-signs the proposed transaction
/// once everything lines up.
///
/// Only the highest batch id is ever considered; earlier batches are
/// expected to have been retired by the committee already.
pub struct OutgoingWatcher<E, B> {
    poll_interval: Duration,
    evm: Arc<E>,
    btc: Arc<B>,
}

impl<E, B> OutgoingWatcher<E, B>
where
    E: GatewayReader + GatewaySender + Send + Sync + 'static,
    B: BtcVerifier + Send + Sync + 'static,
{
    /// Creates a watcher polling at `poll_interval`.
    pub const fn new(poll_interval: Duration, evm: Arc<E>, btc: Arc<B>) -> Self {
        Self {
            poll_interval,
            evm,
            btc,
        }
    }

    /// Runs until `cancel` fires. Failures never escape a tick.
    pub async fn run(self, cancel: CancellationToken) {
        info!("starting outgoing tx watcher");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("outgoing watcher shutting down");
                    return;
                }
                _ = time::sleep(self.poll_interval) => {}
            }

            if let Err(err) = self.tick().await {
                warn!(%err, "outgoing tick failed");
                time::sleep(ERROR_BACKOFF).await;
            }
        }
    }

    /// One poll over the newest batch.
    async fn tick(&self) -> Result<(), TrackerErr> {
        let last = self.evm.outgoing_tx_count().await?;
        if last == 0 {
            debug!("no outgoing transactions");
            return Ok(());
        }

        let batch = self.evm.outgoing_tx(last).await?;
        if batch.status != InvoiceStatus::Pending {
            debug!(id = %last, status = ?batch.status, "latest batch already settled");
            return Ok(());
        }
        info!(id = %last, invoices = batch.invoice_ids.len(), "verifying outgoing batch");

        let (expected, complete) = self.expected_outputs(&batch.invoice_ids).await;
        if !complete {
            info!(id = %last, "could not resolve all referenced invoices, voting against batch");
            self.evm.verify_outgoing_tx(last, false, "").await?;
            return Ok(());
        }

        let tx: Transaction = match consensus::encode::deserialize_hex(&batch.tx_content) {
            Ok(tx) => tx,
            Err(err) => {
                // The batch builder produced garbage; nothing to vote on
                // until the contract state changes.
                error!(id = %last, %err, "proposed transaction does not deserialize");
                return Ok(());
            }
        };

        if let Some((recipient, amount)) = self.first_unpaid(&tx, &expected) {
            warn!(id = %last, %recipient, %amount, "proposed transaction misses an expected output");
            return Ok(());
        }

        let signature = self.btc.sign(&tx)?;
        self.evm
            .verify_outgoing_tx(last, true, &hex::encode(signature))
            .await?;
        info!(id = %last, "submitted batch signature");
        Ok(())
    }

    /// Collects `(recipient, amount)` from every referenced invoice that is
    /// still pending.
    ///
    /// A fetch failure poisons the whole batch, but the scan keeps going so
    /// every failure gets its own log line. Settled invoices are simply not
    /// required to appear in the payout set.
    async fn expected_outputs(&self, invoice_ids: &[u64]) -> (Vec<ExpectedOutput>, bool) {
        let mut expected = Vec::with_capacity(invoice_ids.len());
        let mut complete = true;
        for id in invoice_ids {
            match self.evm.outgoing_invoice(*id).await {
                Ok(invoice) if invoice.status != InvoiceStatus::Pending => {
                    debug!(%id, status = ?invoice.status, "referenced invoice already settled, skipping");
                }
                Ok(invoice) => expected.push((invoice.recipient, invoice.amount)),
                Err(err) => {
                    error!(%id, %err, "could not fetch referenced invoice");
                    complete = false;
                }
            }
        }
        (expected, complete)
    }

    /// First expected payout the transaction does not make, if any.
    ///
    /// Matching is per-entry existence: one output can satisfy several equal
    /// entries. Outputs without an address form never match.
    fn first_unpaid<'a>(
        &self,
        tx: &Transaction,
        expected: &'a [ExpectedOutput],
    ) -> Option<&'a ExpectedOutput> {
        expected.iter().find(|(recipient, amount)| {
            !tx.output.iter().any(|out| {
                i64::try_from(out.value.to_sat()) == Ok(*amount)
                    && self
                        .btc
                        .convert_to_address(&out.script_pubkey)
                        .map(|addr| addr == *recipient)
                        .unwrap_or(false)
            })
        })
    }
}
