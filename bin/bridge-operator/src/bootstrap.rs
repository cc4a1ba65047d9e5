//! Hooks up the adapters, the shutdown signal and the supervisor.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use bridge_operator_btc::BtcClient;
use bridge_operator_evm::GatewayClient;
use bridge_operator_tracker::operator::{Operator, OperatorConfig};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Config;

/// Builds both chain adapters from the config and runs the supervisor until
/// the process receives a shutdown signal.
pub(crate) async fn bootstrap(config: Config) -> anyhow::Result<()> {
    let evm = GatewayClient::new(&config.evm).context("init gateway client")?;
    let btc = BtcClient::new(&config.bitcoin).context("init bitcoin client")?;

    let http_port = config
        .server
        .http_port
        .parse::<u16>()
        .context("bad health endpoint port")?;
    let operator_config = OperatorConfig {
        poll_interval: Duration::from_secs(config.evm.query_interval.max(1) as u64),
        http_port,
    };

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("received shutdown signal"),
            Err(err) => warn!(%err, "could not listen for shutdown signal"),
        }
        signal_cancel.cancel();
    });

    Operator::new(operator_config, Arc::new(evm), Arc::new(btc))
        .run(cancel)
        .await;

    Ok(())
}
