//! Concurrent handle over one ledger.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rust_decimal::Decimal;

use fairshare_core::{LedgerResult, ParticipantId, TransactionId};

use crate::balance::BalanceReport;
use crate::ledger::Ledger;
use crate::transaction::{Beneficiaries, Transaction};

/// Shared, lock-protected ledger handle.
///
/// One `RwLock` guards the whole ledger, and every mutating operation holds
/// the write lock across its full validate-apply-append sequence, so
/// concurrent readers always observe a consistent log/matrix pair. Nothing
/// inside the critical section does IO.
#[derive(Debug, Clone, Default)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Ledger> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Ledger> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn register(&self, id: ParticipantId) -> LedgerResult<()> {
        self.write().register(id.clone())?;
        tracing::info!(participant = %id, "participant registered");
        Ok(())
    }

    pub fn remove(&self, id: &ParticipantId) -> LedgerResult<()> {
        self.write().remove(id)?;
        tracing::info!(participant = %id, "participant removed");
        Ok(())
    }

    pub fn record_expense(
        &self,
        payer: ParticipantId,
        amount: Decimal,
        beneficiaries: Beneficiaries,
    ) -> LedgerResult<Transaction> {
        let txn = self.write().record_expense(payer, amount, beneficiaries)?;
        tracing::info!(id = %txn.id, payer = %txn.payer, amount = %txn.amount, "expense recorded");
        Ok(txn)
    }

    pub fn record_expense_for(
        &self,
        beneficiary: ParticipantId,
        amount: Decimal,
    ) -> LedgerResult<Transaction> {
        let txn = self.write().record_expense_for(beneficiary, amount)?;
        tracing::info!(id = %txn.id, payer = %txn.payer, amount = %txn.amount, "group expense recorded");
        Ok(txn)
    }

    pub fn pay(
        &self,
        payer: ParticipantId,
        payee: ParticipantId,
        amount: Decimal,
    ) -> LedgerResult<Transaction> {
        let txn = self.write().pay(payer, payee, amount)?;
        tracing::info!(id = %txn.id, payer = %txn.payer, amount = %txn.amount, "settlement recorded");
        Ok(txn)
    }

    pub fn revert(&self, id: TransactionId) -> LedgerResult<Transaction> {
        let txn = self.write().revert(id)?;
        tracing::info!(id = %txn.id, "transaction reverted");
        Ok(txn)
    }

    pub fn balance_of(&self, id: &ParticipantId) -> LedgerResult<BalanceReport> {
        self.read().balance_of(id)
    }

    pub fn all_transactions(&self) -> Vec<Transaction> {
        self.read().all_transactions().to_vec()
    }

    pub fn transactions_by_payer(&self, payer: &ParticipantId) -> Vec<Transaction> {
        self.read().transactions_by_payer(payer)
    }

    pub fn participants(&self) -> Vec<ParticipantId> {
        self.read().participants()
    }
}
