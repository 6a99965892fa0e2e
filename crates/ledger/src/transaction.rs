//! Ledger records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fairshare_core::{ParticipantId, TransactionId};

/// How a transaction allocates its amount across its users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Equal split of the amount across the recorded users; the payer's own
    /// share nets out.
    Expense,
    /// Direct payment between the two recorded users, reducing an existing
    /// debt by the full amount.
    Settlement,
}

/// One ledger record (immutable once appended).
///
/// The log of these records is the sole source of truth for reversal: the
/// balance matrix is always the cumulative sum of the allocations of the
/// records currently in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub recorded_at: DateTime<Utc>,
    pub kind: TransactionKind,
    pub payer: ParticipantId,
    /// Total amount paid, strictly positive.
    pub amount: Decimal,
    /// Ordered beneficiary set; `[payer, payee]` for settlements.
    pub users: Vec<ParticipantId>,
}

/// Beneficiary selection for an expense.
///
/// An explicit sentinel for "everyone", so callers never encode the default
/// group through an empty or magic value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Beneficiaries {
    /// Every participant registered at recording time.
    Everyone,
    /// An explicit selection. Duplicates collapse; first occurrence wins.
    Listed(Vec<ParticipantId>),
}

impl Beneficiaries {
    /// Convenience constructor for an explicit selection.
    pub fn listed<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ParticipantId>,
    {
        Self::Listed(ids.into_iter().map(Into::into).collect())
    }
}
