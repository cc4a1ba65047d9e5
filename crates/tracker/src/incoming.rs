//! Pipeline walking the gateway's pending mint invoices.

use std::{sync::Arc, time::Duration};

use bridge_operator_btc::traits::BtcVerifier;
use bridge_operator_evm::{
    traits::{GatewayReader, GatewaySender},
    types::InvoiceStatus,
};
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{constants::ERROR_BACKOFF, errors::TrackerErr};

/// Walks the operator's incoming cursor, verifying at most one invoice per
/// tick.
///
/// The cursor itself lives in the gateway and is re-read every tick; caching
/// it locally would desynchronize the moment a vote fails while the contract
/// still advanced.
pub struct IncomingWatcher<E, B> {
    poll_interval: Duration,
    evm: Arc<E>,
    btc: Arc<B>,
}

impl<E, B> IncomingWatcher<E, B>
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
        info!(multisig = %self.btc.multisig_address(), "starting incoming invoice watcher");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("incoming watcher shutting down");
                    return;
                }
                _ = time::sleep(self.poll_interval) => {}
            }

            if let Err(err) = self.tick().await {
                warn!(%err, "incoming tick failed");
                time::sleep(ERROR_BACKOFF).await;
            }
        }
    }

    /// One poll: locate the next invoice owing our vote, check the claimed
    /// deposit against bitcoin and submit the verdict.
    async fn tick(&self) -> Result<(), TrackerErr> {
        let Some(id) = self.find_next().await? else {
            return Ok(());
        };
        info!(%id, "verifying incoming invoice");

        let invoice = self.evm.incoming_invoice(id).await?;
        let verdict = match u64::try_from(invoice.amount) {
            Ok(sats) => {
                self.btc
                    .verify_btc_deposit(&invoice.utxo, sats, &invoice.recipient.to_string())
                    .await?
            }
            // No bitcoin output can carry this much; vote no instead of
            // truncating the amount.
            Err(_) => {
                warn!(%id, amount = %invoice.amount, "invoice amount exceeds any possible deposit");
                false
            }
        };

        if verdict {
            info!(%id, "btc deposit valid");
        } else {
            info!(%id, "btc deposit invalid");
        }
        self.evm
            .verify_incoming_invoice(id, &invoice.utxo, invoice.amount, invoice.recipient, verdict)
            .await?;
        Ok(())
    }

    /// Smallest id at or past our gateway cursor whose invoice is pending
    /// and does not carry our confirmation yet.
    ///
    /// The client-side `id + 1` advance is an in-tick retry over invoices
    /// whose state moved on while the contract cursor has not; the real
    /// advancement happens contract-side when our vote lands.
    async fn find_next(&self) -> Result<Option<u64>, TrackerErr> {
        let operator = self.evm.address();
        let mut id = self.evm.next_incoming_invoice_id(operator).await?;
        loop {
            let count = self.evm.incoming_invoice_count().await?;
            if id > count {
                debug!("no incoming invoice needs verification");
                return Ok(None);
            }

            let invoice = self.evm.incoming_invoice(id).await?;
            if invoice.status != InvoiceStatus::Pending {
                debug!(%id, status = ?invoice.status, "invoice already settled, advancing");
                id += 1;
                continue;
            }
            // Not being in the invoice's validator set counts as settled
            // for us.
            if !invoice.needs_vote_from(operator) {
                debug!(%id, "invoice already carries our confirmation, advancing");
                id += 1;
                continue;
            }
            return Ok(Some(id));
        }
    }
}
