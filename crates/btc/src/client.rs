use std::str::FromStr;

use async_trait::async_trait;
use bitcoin::{
    ecdsa, hashes::Hash, sighash::SighashCache, Address, EcdsaSighashType, Network, PrivateKey,
    Script, ScriptBuf, Transaction, Txid,
};
use bitcoind_async_client::{error::ClientError, traits::Reader, Client};
use secp256k1::{Message, SECP256K1};
use tracing::debug;

use crate::{config::BtcConfig, errors::Error, traits::BtcVerifier, utxo::UtxoDef};

/// Error fragment bitcoind returns (RPC code -5) for transactions it does
/// not know about.
const TX_NOT_FOUND_MSG: &str = "No such mempool or blockchain transaction";

/// Withdrawal batches spend a single multisig UTXO, so the operator only
/// ever signs the first input.
const SIGNED_INPUT_INDEX: usize = 0;

/// Bitcoin adapter over a bitcoind JSON-RPC connection.
///
/// The operator's key share and redeem script are decoded once at
/// construction and held in memory for the process lifetime.
pub struct BtcClient {
    network: Network,
    multisig_address: String,
    min_confirmations: u64,
    private_key: PrivateKey,
    redeem_script: ScriptBuf,
    rpc: Client,
}

impl BtcClient {
    /// Builds the RPC client and decodes the operator's signing material.
    pub fn new(config: &BtcConfig) -> Result<Self, Error> {
        let network = match config.network.as_str() {
            "mainnet" => Network::Bitcoin,
            "testnet" => Network::Testnet,
            other => return Err(Error::Config(format!("unknown bitcoin network {other:?}"))),
        };
        let private_key = PrivateKey::from_wif(&config.private_key)
            .map_err(|e| Error::Config(format!("bad operator key: {e}")))?;
        let redeem_script = ScriptBuf::from_hex(&config.redeem_script)
            .map_err(|e| Error::Config(format!("bad redeem script: {e}")))?;

        let rpc = Client::new(
            config.host.clone(),
            config.user.clone(),
            config.pass.clone(),
            None, // retry count
            None, // retry interval
            None, // timeout
        )
        .map_err(|e| Error::Config(format!("could not build bitcoind client: {e}")))?;

        Ok(Self {
            network,
            multisig_address: config.multisig_address.clone(),
            min_confirmations: config.min_confirmations.max(0) as u64,
            private_key,
            redeem_script,
            rpc,
        })
    }

    fn map_lookup_err(txid: Txid, err: ClientError) -> Error {
        // bitcoind reports unknown transactions through a regular RPC
        // error; match on the message so the mapping survives client
        // upgrades.
        if err.to_string().contains(TX_NOT_FOUND_MSG) {
            Error::NotFound(txid)
        } else {
            Error::Unavailable(err)
        }
    }

    fn buried_deep_enough(&self, confirmations: u64) -> bool {
        confirmations >= self.min_confirmations
    }

    /// Whether exactly one output of `tx` pays `amount` to the bridge
    /// wallet. Outputs without an address form can never match.
    fn pays_multisig_exactly_once(&self, tx: &Transaction, amount: u64) -> bool {
        let paying_outputs = tx
            .output
            .iter()
            .filter(|out| {
                out.value.to_sat() == amount
                    && self
                        .convert_to_address(&out.script_pubkey)
                        .map(|addr| addr == self.multisig_address)
                        .unwrap_or(false)
            })
            .count();
        paying_outputs == 1
    }
}

#[async_trait]
impl BtcVerifier for BtcClient {
    fn multisig_address(&self) -> &str {
        &self.multisig_address
    }

    async fn verify_btc_deposit(
        &self,
        utxo: &str,
        amount: u64,
        recipient: &str,
    ) -> Result<bool, Error> {
        let reference: UtxoDef = utxo.parse()?;
        let txid = Txid::from_str(&reference.tx_hash)
            .map_err(|e| Error::Malformed(format!("bad deposit txid {}: {e}", reference.tx_hash)))?;

        let status = self
            .rpc
            .get_raw_transaction_verbosity_one(&txid)
            .await
            .map_err(|e| Self::map_lookup_err(txid, e))?;
        let confirmations = status.confirmations.unwrap_or(0);
        if !self.buried_deep_enough(confirmations) {
            debug!(%txid, %confirmations, required = %self.min_confirmations, "deposit not buried deep enough");
            return Ok(false);
        }

        if reference.amount != amount {
            debug!(%txid, claimed = %amount, referenced = %reference.amount, "deposit amount mismatch");
            return Ok(false);
        }
        if !reference.receiver.eq_ignore_ascii_case(recipient) {
            debug!(%txid, claimed = %recipient, referenced = %reference.receiver, "deposit recipient mismatch");
            return Ok(false);
        }

        let tx = self
            .rpc
            .get_raw_transaction_verbosity_zero(&txid)
            .await
            .map_err(|e| Self::map_lookup_err(txid, e))?
            .0;
        if !self.pays_multisig_exactly_once(&tx, amount) {
            debug!(%txid, "deposit does not pay the multisig exactly once");
            return Ok(false);
        }

        Ok(true)
    }

    fn convert_to_address(&self, script: &Script) -> Result<String, Error> {
        Address::from_script(script, self.network)
            .map(|addr| addr.to_string())
            .map_err(|e| Error::Malformed(format!("no address form for output script: {e}")))
    }

    fn sign(&self, tx: &Transaction) -> Result<Vec<u8>, Error> {
        let sighash = SighashCache::new(tx)
            .legacy_signature_hash(
                SIGNED_INPUT_INDEX,
                &self.redeem_script,
                EcdsaSighashType::All.to_u32(),
            )
            .map_err(|e| Error::Sign(format!("could not compute sighash: {e}")))?;
        let message = Message::from_digest(sighash.to_byte_array());
        let signature = ecdsa::Signature {
            signature: SECP256K1.sign_ecdsa(&message, &self.private_key.inner),
            sighash_type: EcdsaSighashType::All,
        };
        Ok(signature.to_vec())
    }
}
