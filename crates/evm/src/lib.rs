//! EVM adapter for the bridge gateway contract.
//!
//! The gateway is the authoritative ledger of pending deposits and
//! withdrawals and the aggregation point for operator votes. This crate
//! wraps its RPC surface with exactly the reads and writes the verification
//! pipelines need: strongly typed record fetches, per-operator cursors, and
//! vote submissions that only return once the transaction is mined.

pub mod config;
pub mod contract;
pub mod errors;
pub mod traits;
pub mod types;

mod client;

pub use client::GatewayClient;
