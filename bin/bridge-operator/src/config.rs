//! Operator configuration, one TOML file.

use bridge_operator_btc::config::BtcConfig;
use bridge_operator_evm::config::EvmConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration for the operator daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Config {
    /// Health endpoint settings.
    pub server: ServerConfig,

    /// EVM node, keys and gateway contract.
    pub evm: EvmConfig,

    /// Bitcoin node, keys and multisig wallet.
    pub bitcoin: BtcConfig,
}

/// The `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct ServerConfig {
    /// TCP port for `GET /health`, kept as a string in the file.
    pub http_port: String,
}
