//! Operator daemon for the BTC/EVM bridge gateway.
//!
//! One instance of this binary is one member of the bridge committee: it
//! holds a BTC key share and an EVM key, watches the gateway contract for
//! pending deposits and withdrawals, verifies each against the bitcoin
//! chain and votes on chain.

use std::{fs, path::Path};

use bridge_operator_common::logging::{self, LoggerConfig};
use serde::de::DeserializeOwned;
use tokio::runtime;
use tracing::{debug, error, info};

mod bootstrap;
mod config;

use config::Config;

/// The daemon reads its configuration from the working directory; there are
/// no flags.
const DEFAULT_CONFIG_PATH: &str = "./operator.toml";

fn main() {
    logging::init(LoggerConfig::with_base_name("bridge-operator"));

    let config = parse_toml::<Config>(DEFAULT_CONFIG_PATH);
    info!(path = %DEFAULT_CONFIG_PATH, "loaded configuration");

    let runtime = runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("must be able to create runtime");

    if let Err(err) = runtime.block_on(bootstrap::bootstrap(config)) {
        error!(?err, "operator failed");
        std::process::exit(1);
    }

    info!("operator shutdown complete");
}

/// Reads and parses a TOML file from the given path into the given type `T`.
///
/// # Panics
///
/// 1. If the file is not readable.
/// 2. If the contents of the file cannot be deserialized into the given type `T`.
fn parse_toml<T>(path: impl AsRef<Path>) -> T
where
    T: DeserializeOwned,
{
    let raw = fs::read_to_string(path).unwrap_or_else(|err| {
        panic!("failed to read TOML file: {err:?}");
    });
    debug!(bytes = raw.len(), "read config file");

    toml::from_str::<T>(&raw).unwrap_or_else(|err| {
        panic!("failed to parse TOML file: {err:?}");
    })
}
