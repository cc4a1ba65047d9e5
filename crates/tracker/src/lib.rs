//! The verification-voting core of the bridge operator.
//!
//! Two independent pipelines poll the gateway, cross-check its pending
//! records against bitcoin, and write votes back: [`incoming`] walks the
//! operator's mint-invoice cursor, [`outgoing`] watches the newest
//! withdrawal batch and co-signs its redemption transaction. The
//! [`operator`] supervisor runs both plus the [`server`] health endpoint as
//! isolated long-running tasks sharing one cancellation token.
//!
//! The gateway is the single source of truth; nothing here persists state
//! across ticks, so a crashed operator restarts cleanly from chain state.

pub mod errors;
pub mod incoming;
pub mod operator;
pub mod outgoing;
pub mod server;

mod constants;

#[cfg(test)]
mod test_utils;
