//! Domain views of the gateway's records.
//!
//! The ABI structs in [`crate::contract`] are converted into these types at
//! the adapter boundary so the pipelines never see raw wire encodings. The
//! conversions validate everything the contract is supposed to guarantee and
//! surface violations as [`Error::Malformed`].

use alloy::primitives::{Address, U256};

use crate::{contract::Gateway, errors::Error};

/// Invoice lifecycle states, discriminants fixed by the gateway ABI.
///
/// Only [`InvoiceStatus::Pending`] items are in scope for verification;
/// everything else advances the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InvoiceStatus {
    /// Created, not yet open for verification.
    Waiting = 0,
    /// Open for operator votes.
    Pending = 1,
    /// Deposit attested and minted.
    Minted = 2,
    /// Being returned to the sender.
    Refunding = 3,
    /// Returned to the sender.
    Refunded = 4,
    /// Pulled out for manual intervention.
    Manual = 5,
    /// Withdrawal paid out on bitcoin.
    Paid = 6,
}

impl TryFrom<u8> for InvoiceStatus {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self, Error> {
        Ok(match raw {
            0 => Self::Waiting,
            1 => Self::Pending,
            2 => Self::Minted,
            3 => Self::Refunding,
            4 => Self::Refunded,
            5 => Self::Manual,
            6 => Self::Paid,
            other => return Err(Error::Malformed(format!("unknown invoice status {other}"))),
        })
    }
}

/// A BTC-to-EVM mint as recorded by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingInvoice {
    /// Invoice id, unique and dense starting at 1.
    pub id: u64,

    /// Opaque JSON reference to the funding BTC deposit.
    pub utxo: String,

    /// Declared deposit value in satoshis.
    pub amount: U256,

    /// Address the minted funds are destined for.
    pub recipient: Address,

    /// Lifecycle state.
    pub status: InvoiceStatus,

    /// The operator set at invoice creation time.
    pub validators: Vec<Address>,

    /// Per-validator yes votes, parallel to `validators`.
    pub confirmations: Vec<bool>,
}

impl IncomingInvoice {
    /// Position of `operator` in the invoice's validator set.
    pub fn validator_index(&self, operator: Address) -> Option<usize> {
        self.validators.iter().position(|v| *v == operator)
    }

    /// Whether this operator still owes a vote on the invoice.
    ///
    /// An operator outside the validator set owes nothing and treats the
    /// invoice as settled.
    pub fn needs_vote_from(&self, operator: Address) -> bool {
        match self.validator_index(operator) {
            Some(index) => !self.confirmations.get(index).copied().unwrap_or(true),
            None => false,
        }
    }
}

impl TryFrom<Gateway::IncomingInvoiceResponse> for IncomingInvoice {
    type Error = Error;

    fn try_from(raw: Gateway::IncomingInvoiceResponse) -> Result<Self, Error> {
        if raw.validators.len() != raw.confirmations.len() {
            return Err(Error::Malformed(format!(
                "invoice {}: {} validators but {} confirmations",
                raw.invoiceId,
                raw.validators.len(),
                raw.confirmations.len()
            )));
        }

        Ok(Self {
            id: to_u64(raw.invoiceId, "invoice id")?,
            utxo: raw.utxo,
            amount: raw.amount,
            recipient: raw.recipient,
            status: InvoiceStatus::try_from(raw.status)?,
            validators: raw.validators,
            confirmations: raw.confirmations,
        })
    }
}

/// An EVM-to-BTC payout destination bundled into a withdrawal batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingInvoice {
    /// Invoice id.
    pub id: u64,

    /// Destination BTC address, verbatim from the withdrawal request.
    pub recipient: String,

    /// Payout value in satoshis.
    pub amount: i64,

    /// Lifecycle state.
    pub status: InvoiceStatus,
}

impl TryFrom<Gateway::OutgoingInvoiceResponse> for OutgoingInvoice {
    type Error = Error;

    fn try_from(raw: Gateway::OutgoingInvoiceResponse) -> Result<Self, Error> {
        Ok(Self {
            id: to_u64(raw.invoiceId, "outgoing invoice id")?,
            recipient: raw.recipient,
            amount: to_i64(raw.amount, "outgoing invoice amount")?,
            status: InvoiceStatus::try_from(raw.status)?,
        })
    }
}

/// A withdrawal batch with its proposed BTC redemption transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingTx {
    /// Batch id.
    pub id: u64,

    /// The outgoing invoices bundled into this batch.
    pub invoice_ids: Vec<u64>,

    /// Hex-serialized BTC transaction proposed by the batch builder.
    pub tx_content: String,

    /// Lifecycle state.
    pub status: InvoiceStatus,
}

impl TryFrom<Gateway::OutgoingTxResponse> for OutgoingTx {
    type Error = Error;

    fn try_from(raw: Gateway::OutgoingTxResponse) -> Result<Self, Error> {
        Ok(Self {
            id: to_u64(raw.id, "outgoing tx id")?,
            invoice_ids: raw
                .invoiceIds
                .into_iter()
                .map(|id| to_u64(id, "bundled invoice id"))
                .collect::<Result<_, _>>()?,
            tx_content: raw.txContent,
            status: InvoiceStatus::try_from(raw.status)?,
        })
    }
}

pub(crate) fn to_u64(value: U256, what: &str) -> Result<u64, Error> {
    u64::try_from(value).map_err(|_| Error::Malformed(format!("{what} {value} exceeds u64")))
}

fn to_i64(value: U256, what: &str) -> Result<i64, Error> {
    i64::try_from(value).map_err(|_| Error::Malformed(format!("{what} {value} exceeds i64")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(validators: usize, confirmations: usize) -> Gateway::IncomingInvoiceResponse {
        Gateway::IncomingInvoiceResponse {
            invoiceId: U256::from(7u64),
            utxo: String::new(),
            amount: U256::from(100u64),
            recipient: Address::repeat_byte(0x22),
            status: 1,
            validators: vec![Address::repeat_byte(0xa1); validators],
            confirmations: vec![false; confirmations],
        }
    }

    #[test]
    fn status_decodes_all_wire_values() {
        let expected = [
            InvoiceStatus::Waiting,
            InvoiceStatus::Pending,
            InvoiceStatus::Minted,
            InvoiceStatus::Refunding,
            InvoiceStatus::Refunded,
            InvoiceStatus::Manual,
            InvoiceStatus::Paid,
        ];
        for (raw, status) in expected.into_iter().enumerate() {
            assert_eq!(InvoiceStatus::try_from(raw as u8).unwrap(), status);
        }
    }

    #[test]
    fn status_rejects_unknown_discriminant() {
        assert!(matches!(
            InvoiceStatus::try_from(7),
            Err(Error::Malformed(_))
        ));
    }

    #[test]
    fn incoming_invoice_converts() {
        let invoice = IncomingInvoice::try_from(response(2, 2)).unwrap();
        assert_eq!(invoice.id, 7);
        assert_eq!(invoice.status, InvoiceStatus::Pending);
        assert_eq!(invoice.validators.len(), invoice.confirmations.len());
    }

    #[test]
    fn incoming_invoice_rejects_skewed_vote_lists() {
        assert!(matches!(
            IncomingInvoice::try_from(response(2, 1)),
            Err(Error::Malformed(_))
        ));
    }

    #[test]
    fn vote_needed_only_while_unconfirmed() {
        let me = Address::repeat_byte(0xa1);
        let other = Address::repeat_byte(0xb2);
        let mut invoice = IncomingInvoice::try_from(response(1, 1)).unwrap();

        assert_eq!(invoice.validator_index(me), Some(0));
        assert!(invoice.needs_vote_from(me));

        invoice.confirmations[0] = true;
        assert!(!invoice.needs_vote_from(me));

        // Outsiders never owe a vote.
        assert_eq!(invoice.validator_index(other), None);
        assert!(!invoice.needs_vote_from(other));
    }

    #[test]
    fn outgoing_invoice_rejects_oversized_amount() {
        let raw = Gateway::OutgoingInvoiceResponse {
            invoiceId: U256::from(1u64),
            recipient: "tb1q000".to_owned(),
            amount: U256::from(u64::MAX),
            status: 1,
        };
        assert!(matches!(
            OutgoingInvoice::try_from(raw),
            Err(Error::Malformed(_))
        ));
    }
}
