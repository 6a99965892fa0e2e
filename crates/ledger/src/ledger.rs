//! The ledger facade: registry, balance matrix and transaction log behind
//! one validate-then-mutate API.

use chrono::Utc;
use rust_decimal::Decimal;

use fairshare_core::{LedgerError, LedgerResult, ParticipantId, TransactionId};
use fairshare_participants::Roster;

use crate::allocation::Allocation;
use crate::balance::{BalanceMatrix, BalanceReport};
use crate::transaction::{Beneficiaries, Transaction, TransactionKind};

/// One group's shared-expense ledger.
///
/// Owns the roster, the pairwise balance matrix, the append-only transaction
/// log and the id counter. The matrix is always the cumulative sum of the
/// allocations of the transactions currently in the log: recording applies a
/// transaction's allocation and appends it; reversal applies the exact
/// inverse and removes it.
///
/// Every operation validates before mutating, so a failed call leaves the
/// ledger untouched. Constructed per group and passed by handle; see
/// [`crate::SharedLedger`] for the concurrent wrapper.
#[derive(Debug, Clone)]
pub struct Ledger {
    roster: Roster,
    balances: BalanceMatrix,
    log: Vec<Transaction>,
    next_id: TransactionId,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            roster: Roster::new(),
            balances: BalanceMatrix::new(),
            log: Vec::new(),
            next_id: TransactionId::new(1),
        }
    }

    /// Register a participant and materialize zero balances against every
    /// existing member, in both directions.
    pub fn register(&mut self, id: ParticipantId) -> LedgerResult<()> {
        self.roster.register(id.clone())?;
        let others: Vec<ParticipantId> = self
            .roster
            .iter()
            .filter(|member| **member != id)
            .cloned()
            .collect();
        self.balances.add_participant(&id, &others);
        Ok(())
    }

    /// Remove a participant and purge every balance entry referencing it.
    ///
    /// Transactions already in the log that reference the participant are
    /// left unchanged; the log deliberately keeps history the matrix no
    /// longer reflects. Reverting such a transaction is rejected until the
    /// participant is registered again.
    pub fn remove(&mut self, id: &ParticipantId) -> LedgerResult<()> {
        self.roster.remove(id)?;
        self.balances.purge(id);
        Ok(())
    }

    /// Record an equal-split expense paid by `payer`.
    ///
    /// The share is `amount / |beneficiaries|`; every beneficiary other than
    /// the payer ends up owing the payer one share. The payer may or may not
    /// be part of the beneficiary set; its own share nets out either way.
    pub fn record_expense(
        &mut self,
        payer: ParticipantId,
        amount: Decimal,
        beneficiaries: Beneficiaries,
    ) -> LedgerResult<Transaction> {
        Self::ensure_positive(amount)?;
        let users = self.resolve_beneficiaries(&payer, beneficiaries)?;
        Ok(self.append(TransactionKind::Expense, payer, amount, users))
    }

    /// Record "X paid for the whole group": an equal split across every
    /// registered participant, with `beneficiary` as the payer.
    ///
    /// The named payer nets `amount - share`; everyone else owes one share.
    pub fn record_expense_for(
        &mut self,
        beneficiary: ParticipantId,
        amount: Decimal,
    ) -> LedgerResult<Transaction> {
        self.record_expense(beneficiary, amount, Beneficiaries::Everyone)
    }

    /// Record a direct settlement: `payer` pays `payee` `amount` against an
    /// existing debt.
    ///
    /// The payer must currently owe the payee at least `amount`.
    pub fn pay(
        &mut self,
        payer: ParticipantId,
        payee: ParticipantId,
        amount: Decimal,
    ) -> LedgerResult<Transaction> {
        Self::ensure_positive(amount)?;
        self.roster.ensure_member(&payer)?;
        self.roster.ensure_member(&payee)?;

        // balance[payer][payee] <= -amount, phrased as the debt owed.
        let owed = -self.balances.get(&payer, &payee);
        if owed < amount {
            return Err(LedgerError::InsufficientDebt {
                payer,
                payee,
                requested: amount,
                owed,
            });
        }

        let users = vec![payer.clone(), payee];
        Ok(self.append(TransactionKind::Settlement, payer, amount, users))
    }

    /// Revert a transaction: apply the exact inverse of its allocation and
    /// remove it from the log. Returns the removed record.
    ///
    /// The freed id is never reallocated. Fails if any party the inverse
    /// would touch has since been removed from the roster.
    pub fn revert(&mut self, id: TransactionId) -> LedgerResult<Transaction> {
        let position = self
            .log
            .iter()
            .position(|txn| txn.id == id)
            .ok_or(LedgerError::TransactionNotFound(id))?;

        let allocation = Allocation::for_transaction(&self.log[position]);
        for party in allocation.parties() {
            self.roster.ensure_member(party)?;
        }

        allocation.inverted().apply_to(&mut self.balances);
        Ok(self.log.remove(position))
    }

    /// Balance summary for one participant.
    pub fn balance_of(&self, id: &ParticipantId) -> LedgerResult<BalanceReport> {
        self.roster.ensure_member(id)?;
        Ok(self.balances.report_for(id))
    }

    /// The transaction log, chronological.
    pub fn all_transactions(&self) -> &[Transaction] {
        &self.log
    }

    /// Transactions with `payer` as the payer, chronological.
    pub fn transactions_by_payer(&self, payer: &ParticipantId) -> Vec<Transaction> {
        self.log
            .iter()
            .filter(|txn| txn.payer == *payer)
            .cloned()
            .collect()
    }

    /// Sorted snapshot of the registered participants.
    pub fn participants(&self) -> Vec<ParticipantId> {
        self.roster.members()
    }

    pub fn balances(&self) -> &BalanceMatrix {
        &self.balances
    }

    fn ensure_positive(amount: Decimal) -> LedgerResult<()> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount);
        }
        Ok(())
    }

    /// Resolve the beneficiary selection into the recorded user list.
    ///
    /// `Everyone` is the full roster at recording time. Explicit lists are
    /// checked for membership and deduplicated (first occurrence wins).
    fn resolve_beneficiaries(
        &self,
        payer: &ParticipantId,
        beneficiaries: Beneficiaries,
    ) -> LedgerResult<Vec<ParticipantId>> {
        match beneficiaries {
            Beneficiaries::Listed(list) if list.is_empty() => Err(LedgerError::EmptyBeneficiaries),
            Beneficiaries::Listed(list) => {
                self.roster.ensure_member(payer)?;
                let mut users: Vec<ParticipantId> = Vec::with_capacity(list.len());
                for user in list {
                    self.roster.ensure_member(&user)?;
                    if !users.contains(&user) {
                        users.push(user);
                    }
                }
                Ok(users)
            }
            Beneficiaries::Everyone => {
                self.roster.ensure_member(payer)?;
                Ok(self.roster.members())
            }
        }
    }

    fn append(
        &mut self,
        kind: TransactionKind,
        payer: ParticipantId,
        amount: Decimal,
        users: Vec<ParticipantId>,
    ) -> Transaction {
        let txn = Transaction {
            id: self.next_id,
            recorded_at: Utc::now(),
            kind,
            payer,
            amount,
            users,
        };

        Allocation::for_transaction(&txn).apply_to(&mut self.balances);
        self.next_id = self.next_id.next();
        self.log.push(txn.clone());
        txn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(handle: &str) -> ParticipantId {
        ParticipantId::from(handle)
    }

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    /// Ledger with alice, bob and carol registered.
    fn trio() -> Ledger {
        let mut ledger = Ledger::new();
        for handle in ["alice", "bob", "carol"] {
            ledger.register(id(handle)).unwrap();
        }
        ledger
    }

    /// Trio after alice paid 30 split across all three.
    fn trio_after_dinner() -> Ledger {
        let mut ledger = trio();
        ledger
            .record_expense(
                id("alice"),
                dec(30),
                Beneficiaries::listed(["alice", "bob", "carol"]),
            )
            .unwrap();
        ledger
    }

    #[test]
    fn equal_split_expense_updates_all_pairs() {
        let ledger = trio_after_dinner();

        assert_eq!(ledger.balances().get(&id("alice"), &id("bob")), dec(10));
        assert_eq!(ledger.balances().get(&id("alice"), &id("carol")), dec(10));
        assert_eq!(ledger.balances().get(&id("bob"), &id("alice")), dec(-10));
        assert_eq!(ledger.balances().get(&id("carol"), &id("alice")), dec(-10));
        assert_eq!(ledger.balances().get(&id("bob"), &id("carol")), dec(0));
    }

    #[test]
    fn settlement_clears_the_debt() {
        let mut ledger = trio_after_dinner();

        ledger.pay(id("bob"), id("alice"), dec(10)).unwrap();

        assert_eq!(ledger.balances().get(&id("bob"), &id("alice")), dec(0));
        assert_eq!(ledger.balances().get(&id("alice"), &id("bob")), dec(0));
        assert_eq!(ledger.all_transactions().len(), 2);
    }

    #[test]
    fn overpaying_a_debt_is_rejected_and_changes_nothing() {
        let mut ledger = trio_after_dinner();

        let err = ledger.pay(id("bob"), id("alice"), dec(15)).unwrap_err();
        match err {
            LedgerError::InsufficientDebt {
                requested, owed, ..
            } => {
                assert_eq!(requested, dec(15));
                assert_eq!(owed, dec(10));
            }
            other => panic!("expected InsufficientDebt, got {other:?}"),
        }

        assert_eq!(ledger.balances().get(&id("bob"), &id("alice")), dec(-10));
        assert_eq!(ledger.all_transactions().len(), 1);
    }

    #[test]
    fn paying_without_any_debt_is_rejected() {
        let mut ledger = trio();

        let err = ledger.pay(id("bob"), id("alice"), dec(5)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientDebt { .. }));
    }

    #[test]
    fn revert_restores_all_balances_and_empties_the_log() {
        let mut ledger = trio_after_dinner();
        let txn_id = ledger.all_transactions()[0].id;

        let removed = ledger.revert(txn_id).unwrap();

        assert_eq!(removed.id, txn_id);
        assert!(ledger.all_transactions().is_empty());
        for a in ["alice", "bob", "carol"] {
            for b in ["alice", "bob", "carol"] {
                assert_eq!(ledger.balances().get(&id(a), &id(b)), dec(0));
            }
        }
    }

    #[test]
    fn empty_beneficiary_list_is_rejected_before_anything_else() {
        let mut ledger = trio();

        // "dave" is not registered; the empty selection must win anyway.
        let err = ledger
            .record_expense(id("dave"), dec(10), Beneficiaries::Listed(vec![]))
            .unwrap_err();
        assert_eq!(err, LedgerError::EmptyBeneficiaries);
        assert!(ledger.all_transactions().is_empty());
    }

    #[test]
    fn removal_purges_balances_but_keeps_history() {
        let mut ledger = trio_after_dinner();

        ledger.remove(&id("carol")).unwrap();

        assert_eq!(ledger.participants(), vec![id("alice"), id("bob")]);
        assert!(!ledger.balances().references(&id("carol")));
        // The historical record still names carol.
        assert!(ledger.all_transactions()[0].users.contains(&id("carol")));
    }

    #[test]
    fn reverting_a_transaction_of_a_removed_participant_is_rejected() {
        let mut ledger = trio_after_dinner();
        let txn_id = ledger.all_transactions()[0].id;
        ledger.remove(&id("carol")).unwrap();

        let err = ledger.revert(txn_id).unwrap_err();
        assert_eq!(err, LedgerError::NotRegistered(id("carol")));
        // Nothing changed: record still present, matrix untouched.
        assert_eq!(ledger.all_transactions().len(), 1);
        assert_eq!(ledger.balances().get(&id("alice"), &id("bob")), dec(10));
    }

    #[test]
    fn duplicate_registration_leaves_balances_untouched() {
        let mut ledger = trio_after_dinner();
        let before = ledger.balances().clone();

        let err = ledger.register(id("alice")).unwrap_err();
        assert_eq!(err, LedgerError::AlreadyRegistered(id("alice")));
        assert_eq!(ledger.balances(), &before);
    }

    #[test]
    fn transaction_ids_are_never_reused_after_a_revert() {
        let mut ledger = trio();

        let first = ledger
            .record_expense(id("alice"), dec(30), Beneficiaries::Everyone)
            .unwrap();
        ledger.revert(first.id).unwrap();
        let second = ledger
            .record_expense(id("bob"), dec(12), Beneficiaries::Everyone)
            .unwrap();

        assert_eq!(first.id, TransactionId::new(1));
        assert_eq!(second.id, TransactionId::new(2));
    }

    #[test]
    fn expense_for_splits_across_the_whole_group() {
        let mut ledger = trio();

        let txn = ledger.record_expense_for(id("bob"), dec(30)).unwrap();

        assert_eq!(txn.payer, id("bob"));
        assert_eq!(txn.users.len(), 3);
        assert_eq!(ledger.balances().get(&id("bob"), &id("alice")), dec(10));
        assert_eq!(ledger.balances().get(&id("bob"), &id("carol")), dec(10));
        // bob paid 30 and consumed his own 10 share.
        assert_eq!(ledger.balances().net_position(&id("bob")), dec(20));
    }

    #[test]
    fn expense_with_unregistered_payer_is_rejected() {
        let mut ledger = trio();

        let err = ledger
            .record_expense(id("dave"), dec(10), Beneficiaries::Everyone)
            .unwrap_err();
        assert_eq!(err, LedgerError::NotRegistered(id("dave")));
        assert!(ledger.all_transactions().is_empty());
    }

    #[test]
    fn expense_with_unregistered_beneficiary_is_rejected() {
        let mut ledger = trio();

        let err = ledger
            .record_expense(id("alice"), dec(10), Beneficiaries::listed(["bob", "dave"]))
            .unwrap_err();
        assert_eq!(err, LedgerError::NotRegistered(id("dave")));
        assert!(ledger.all_transactions().is_empty());
        assert_eq!(ledger.balances().get(&id("alice"), &id("bob")), dec(0));
    }

    #[test]
    fn duplicate_beneficiaries_collapse_before_the_split() {
        let mut ledger = trio();

        let txn = ledger
            .record_expense(
                id("alice"),
                dec(30),
                Beneficiaries::listed(["bob", "bob", "carol"]),
            )
            .unwrap();

        assert_eq!(txn.users, vec![id("bob"), id("carol")]);
        assert_eq!(ledger.balances().get(&id("alice"), &id("bob")), dec(15));
    }

    #[test]
    fn zero_or_negative_amounts_are_rejected() {
        let mut ledger = trio();

        for amount in [dec(0), dec(-5)] {
            let err = ledger
                .record_expense(id("alice"), amount, Beneficiaries::Everyone)
                .unwrap_err();
            assert_eq!(err, LedgerError::InvalidAmount);
            let err = ledger.pay(id("bob"), id("alice"), amount).unwrap_err();
            assert_eq!(err, LedgerError::InvalidAmount);
        }
        assert!(ledger.all_transactions().is_empty());
    }

    #[test]
    fn revert_of_unknown_id_is_rejected() {
        let mut ledger = trio_after_dinner();

        let err = ledger.revert(TransactionId::new(42)).unwrap_err();
        assert_eq!(err, LedgerError::TransactionNotFound(TransactionId::new(42)));
        assert_eq!(ledger.all_transactions().len(), 1);
    }

    #[test]
    fn settlement_round_trip_restores_both_cells() {
        let mut ledger = trio_after_dinner();

        let payment = ledger.pay(id("bob"), id("alice"), dec(10)).unwrap();
        ledger.revert(payment.id).unwrap();

        assert_eq!(ledger.balances().get(&id("bob"), &id("alice")), dec(-10));
        assert_eq!(ledger.balances().get(&id("alice"), &id("bob")), dec(10));
    }

    #[test]
    fn balance_report_summarizes_both_sides() {
        let mut ledger = trio_after_dinner();
        ledger
            .record_expense(id("bob"), dec(9), Beneficiaries::listed(["alice", "bob", "carol"]))
            .unwrap();

        // Pairwise netting: bob's 3 claim on alice offsets part of alice's
        // 10 claim on bob, leaving bob owing 7 and owed 3 by carol.
        let report = ledger.balance_of(&id("bob")).unwrap();
        assert_eq!(report.to_pay.len(), 1);
        assert_eq!(report.to_pay[0].counterpart, id("alice"));
        assert_eq!(report.to_pay[0].amount, dec(7));
        assert_eq!(report.to_receive.len(), 1);
        assert_eq!(report.to_receive[0].counterpart, id("carol"));
        assert_eq!(report.to_receive[0].amount, dec(3));
        assert_eq!(report.net(), dec(-4));

        let err = ledger.balance_of(&id("dave")).unwrap_err();
        assert_eq!(err, LedgerError::NotRegistered(id("dave")));
    }

    #[test]
    fn transactions_by_payer_filters_the_log() {
        let mut ledger = trio_after_dinner();
        ledger
            .record_expense(id("bob"), dec(9), Beneficiaries::Everyone)
            .unwrap();
        ledger.pay(id("carol"), id("alice"), dec(10)).unwrap();

        let by_alice = ledger.transactions_by_payer(&id("alice"));
        assert_eq!(by_alice.len(), 1);
        assert_eq!(by_alice[0].payer, id("alice"));

        let by_bob = ledger.transactions_by_payer(&id("bob"));
        assert_eq!(by_bob.len(), 1);
        assert_eq!(by_bob[0].amount, dec(9));

        assert!(ledger.transactions_by_payer(&id("dave")).is_empty());
    }

    const POOL: [&str; 5] = ["alice", "bob", "carol", "dave", "erin"];

    #[derive(Debug, Clone)]
    enum Op {
        Expense {
            payer: usize,
            cents: i64,
            users: Vec<usize>,
        },
        ExpenseForEveryone {
            payer: usize,
            cents: i64,
        },
        Pay {
            payer: usize,
            payee: usize,
            cents: i64,
        },
        Revert {
            pick: usize,
        },
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..POOL.len(), 1i64..100_000, prop::collection::vec(0..POOL.len(), 1..6))
                .prop_map(|(payer, cents, users)| Op::Expense { payer, cents, users }),
            (0..POOL.len(), 1i64..100_000)
                .prop_map(|(payer, cents)| Op::ExpenseForEveryone { payer, cents }),
            (0..POOL.len(), 0..POOL.len(), 1i64..100_000)
                .prop_map(|(payer, payee, cents)| Op::Pay { payer, payee, cents }),
            (0usize..64).prop_map(|pick| Op::Revert { pick }),
        ]
    }

    fn pool_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        for handle in POOL {
            ledger.register(id(handle)).unwrap();
        }
        ledger
    }

    fn apply_op(ledger: &mut Ledger, op: &Op) {
        // Domain rejections (insufficient debt etc.) are expected; the
        // properties below only care that accepted operations preserve the
        // invariants.
        let _ = match op {
            Op::Expense { payer, cents, users } => ledger
                .record_expense(
                    id(POOL[*payer]),
                    Decimal::new(*cents, 2),
                    Beneficiaries::listed(users.iter().map(|u| POOL[*u])),
                )
                .map(|_| ()),
            Op::ExpenseForEveryone { payer, cents } => ledger
                .record_expense_for(id(POOL[*payer]), Decimal::new(*cents, 2))
                .map(|_| ()),
            Op::Pay { payer, payee, cents } => ledger
                .pay(id(POOL[*payer]), id(POOL[*payee]), Decimal::new(*cents, 2))
                .map(|_| ()),
            Op::Revert { pick } => {
                if ledger.all_transactions().is_empty() {
                    Ok(())
                } else {
                    let target = ledger.all_transactions()[pick % ledger.all_transactions().len()].id;
                    ledger.revert(target).map(|_| ())
                }
            }
        };
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: after any operation sequence the matrix stays
        /// skew-symmetric and the net positions sum to zero.
        #[test]
        fn invariants_hold_across_random_operation_sequences(
            ops in prop::collection::vec(op_strategy(), 1..40)
        ) {
            let mut ledger = pool_ledger();
            for op in &ops {
                apply_op(&mut ledger, op);
            }

            prop_assert!(ledger.balances().is_skew_symmetric());

            let total: Decimal = POOL
                .iter()
                .map(|handle| ledger.balances().net_position(&id(handle)))
                .sum();
            prop_assert_eq!(total, Decimal::ZERO);
        }

        /// Property: recording an expense and immediately reverting it
        /// restores the matrix exactly, whatever came before.
        #[test]
        fn record_then_revert_restores_the_matrix(
            prelude in prop::collection::vec(op_strategy(), 0..20),
            payer in 0..POOL.len(),
            cents in 1i64..1_000_000,
            users in prop::collection::vec(0..POOL.len(), 1..6),
        ) {
            let mut ledger = pool_ledger();
            for op in &prelude {
                apply_op(&mut ledger, op);
            }

            let before = ledger.balances().clone();
            let log_len = ledger.all_transactions().len();

            let txn = ledger
                .record_expense(
                    id(POOL[payer]),
                    Decimal::new(cents, 2),
                    Beneficiaries::listed(users.iter().map(|u| POOL[*u])),
                )
                .unwrap();
            ledger.revert(txn.id).unwrap();

            prop_assert_eq!(ledger.balances(), &before);
            prop_assert_eq!(ledger.all_transactions().len(), log_len);
        }

        /// Property: transaction ids strictly increase across the log, no
        /// matter how many reverts happened in between.
        #[test]
        fn transaction_ids_strictly_increase(
            ops in prop::collection::vec(op_strategy(), 1..40)
        ) {
            let mut ledger = pool_ledger();
            for op in &ops {
                apply_op(&mut ledger, op);
            }

            let ids: Vec<u64> = ledger
                .all_transactions()
                .iter()
                .map(|txn| txn.id.value())
                .collect();
            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
