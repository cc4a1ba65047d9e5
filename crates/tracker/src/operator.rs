//! Supervisor wiring the adapters and the long-running tasks together.

use std::{sync::Arc, time::Duration};

use bridge_operator_btc::traits::BtcVerifier;
use bridge_operator_evm::traits::{GatewayReader, GatewaySender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{incoming::IncomingWatcher, outgoing::OutgoingWatcher, server};

/// Runtime knobs for the supervisor, distilled from the config file.
#[derive(Debug, Clone)]
pub struct OperatorConfig {
    /// Interval between gateway polls, shared by both pipelines.
    pub poll_interval: Duration,

    /// TCP port for the health endpoint.
    pub http_port: u16,
}

/// Owns the two verification pipelines and the health server.
pub struct Operator<E, B> {
    config: OperatorConfig,
    evm: Arc<E>,
    btc: Arc<B>,
}

impl<E, B> Operator<E, B>
where
    E: GatewayReader + GatewaySender + Send + Sync + 'static,
    B: BtcVerifier + Send + Sync + 'static,
{
    /// Creates a supervisor over the two shared adapters.
    pub const fn new(config: OperatorConfig, evm: Arc<E>, btc: Arc<B>) -> Self {
        Self { config, evm, btc }
    }

    /// Runs all three services until `cancel` fires and each one has wound
    /// down.
    ///
    /// The tasks are isolated: a panic in one is logged while the others
    /// keep running.
    pub async fn run(self, cancel: CancellationToken) {
        self.audit().await;

        let mut tasks = JoinSet::new();
        tasks.spawn(
            IncomingWatcher::new(self.config.poll_interval, self.evm.clone(), self.btc.clone())
                .run(cancel.clone()),
        );
        tasks.spawn(
            OutgoingWatcher::new(self.config.poll_interval, self.evm.clone(), self.btc.clone())
                .run(cancel.clone()),
        );
        tasks.spawn(server::serve(self.config.http_port, cancel.clone()));

        while let Some(result) = tasks.join_next().await {
            if let Err(err) = result {
                if err.is_panic() {
                    error!(%err, "operator task panicked");
                } else {
                    warn!(%err, "operator task aborted");
                }
            }
        }
        info!("operator shut down");
    }

    /// Startup audit: log our identity and sanity-check the validator set.
    async fn audit(&self) {
        let address = self.evm.address();
        info!(%address, multisig = %self.btc.multisig_address(), "starting operator");

        match self.evm.operators().await {
            Ok(validators) => {
                if !validators.contains(&address) {
                    warn!(%address, "operator address not in the gateway validator set");
                }
                info!(validators = validators.len(), "fetched gateway validator set");
            }
            Err(err) => warn!(%err, "could not fetch gateway validator set"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use tokio_util::sync::CancellationToken;

    use super::{Operator, OperatorConfig};
    use crate::test_utils::{GatewayState, MockBtc, MockGateway};

    #[tokio::test]
    async fn winds_down_on_cancellation() {
        let gateway = Arc::new(MockGateway::with_state(GatewayState::default()));
        let btc = Arc::new(MockBtc::default());
        let operator = Operator::new(
            OperatorConfig {
                poll_interval: Duration::from_millis(10),
                // Port 0 binds an ephemeral port.
                http_port: 0,
            },
            gateway,
            btc,
        );

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(operator.run(cancel.clone()));

        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("operator must observe cancellation")
            .unwrap();
    }
}
