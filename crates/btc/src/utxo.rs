//! The JSON envelope the gateway uses to reference a specific BTC deposit.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Deposit reference carried in an incoming invoice's `utxo` field.
///
/// The EVM side treats this as an opaque string; only this adapter ever
/// looks inside.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoDef {
    /// Block height the deposit was first observed at.
    pub height: u64,

    /// Funding transaction id, conventional hex.
    pub tx_hash: String,

    /// Deposit value in satoshis.
    pub amount: u64,

    /// EVM address the minted funds are destined for.
    pub receiver: String,

    /// Free-form tag attached by the depositor.
    pub memo: String,
}

impl fmt::Display for UtxoDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl FromStr for UtxoDef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        serde_json::from_str(s).map_err(|e| Error::Malformed(format!("bad deposit reference: {e}")))
    }
}
