//! Pairwise allocation of a transaction's amount.
//!
//! Recording and reversal both derive the deltas from the record itself, so
//! a reversal is the exact algebraic inverse of whichever operation produced
//! the transaction.

use rust_decimal::Decimal;

use fairshare_core::ParticipantId;

use crate::balance::BalanceMatrix;
use crate::transaction::{Transaction, TransactionKind};

/// Shares are kept at minor-unit (cent) precision. Bounding the scale keeps
/// every matrix addition exactly representable, so applying a share and then
/// its negation always cancels to the bit.
const SHARE_SCALE: u32 = 2;

/// The balance deltas one transaction induces.
///
/// Each entry raises the creditor's claim on the debtor by `amount`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Allocation {
    entries: Vec<AllocationEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AllocationEntry {
    pub creditor: ParticipantId,
    pub debtor: ParticipantId,
    pub amount: Decimal,
}

impl Allocation {
    /// Derive the allocation a transaction applies when recorded.
    ///
    /// Expenses split the amount equally across `users`, crediting the payer
    /// against every other user (the payer's own share nets out).
    /// Settlements credit the payer against the payee for the full amount.
    pub fn for_transaction(txn: &Transaction) -> Self {
        let entries = match txn.kind {
            TransactionKind::Expense => {
                let share =
                    (txn.amount / Decimal::from(txn.users.len() as u64)).round_dp(SHARE_SCALE);
                txn.users
                    .iter()
                    .filter(|user| **user != txn.payer)
                    .map(|user| AllocationEntry {
                        creditor: txn.payer.clone(),
                        debtor: user.clone(),
                        amount: share,
                    })
                    .collect()
            }
            TransactionKind::Settlement => txn
                .users
                .iter()
                .find(|user| **user != txn.payer)
                .map(|payee| AllocationEntry {
                    creditor: txn.payer.clone(),
                    debtor: payee.clone(),
                    amount: txn.amount,
                })
                .into_iter()
                .collect(),
        };

        Self { entries }
    }

    /// The exact algebraic inverse of this allocation.
    pub fn inverted(mut self) -> Self {
        for entry in &mut self.entries {
            entry.amount = -entry.amount;
        }
        self
    }

    pub fn apply_to(&self, balances: &mut BalanceMatrix) {
        for entry in &self.entries {
            balances.adjust(&entry.creditor, &entry.debtor, entry.amount);
        }
    }

    /// Every participant the allocation touches.
    pub fn parties(&self) -> impl Iterator<Item = &ParticipantId> {
        self.entries
            .iter()
            .flat_map(|entry| [&entry.creditor, &entry.debtor])
    }
}
