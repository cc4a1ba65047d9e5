use serde::{Deserialize, Serialize};

/// The `[evm]` section of the operator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EvmConfig {
    /// JSON-RPC endpoint of the EVM node.
    pub url: String,

    /// Chain id the operator's votes are signed for.
    pub chain_id: i64,

    /// Seconds between gateway polls.
    pub query_interval: i64,

    /// Finality depth on the EVM side.
    pub min_confirmations: i64,

    /// The operator's EVM private key, raw hex without a `0x` prefix.
    pub private_key: String,

    /// Seconds to wait for a submitted vote to be mined before giving up on
    /// the current tick.
    pub call_timeout: u64,

    /// Deployed contract addresses.
    pub contracts: ContractsConfig,
}

/// The `[evm.contracts]` subsection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ContractsConfig {
    /// The wrapped-BTC token contract.
    pub wrapped_btc_addr: String,

    /// The gateway contract the operator votes on.
    pub gateway_addr: String,
}
