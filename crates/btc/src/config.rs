use serde::{Deserialize, Serialize};

/// The `[bitcoin]` section of the operator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BtcConfig {
    /// Address network, `mainnet` or `testnet`.
    pub network: String,

    /// bitcoind JSON-RPC endpoint, plain HTTP with basic auth.
    pub host: String,

    /// RPC username.
    pub user: String,

    /// RPC password.
    pub pass: String,

    /// Seconds between node polls.
    pub query_interval: i64,

    /// Blocks a deposit must be buried under before it verifies.
    pub min_confirmations: i64,

    /// The bridge multisig wallet address.
    pub multisig_address: String,

    /// The operator's multisig key share, WIF encoded.
    pub private_key: String,

    /// The multisig redeem script, hex encoded.
    pub redeem_script: String,
}
