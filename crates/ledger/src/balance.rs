//! Pairwise balance matrix and per-participant balance reports.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fairshare_core::ParticipantId;

/// Pairwise net balances.
///
/// `get(a, b)` is the amount `a` is owed by `b`; negative means `a` owes
/// `b`. Every adjustment writes both directions, so skew-symmetry
/// (`balance[a][b] == -balance[b][a]`) holds by construction. Missing cells
/// read as zero, and a participant never holds a balance against itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceMatrix {
    cells: BTreeMap<ParticipantId, BTreeMap<ParticipantId, Decimal>>,
}

impl BalanceMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize zero entries between `id` and every one of `others`, in
    /// both directions.
    pub fn add_participant(&mut self, id: &ParticipantId, others: &[ParticipantId]) {
        let row = self.cells.entry(id.clone()).or_default();
        for other in others {
            if other != id {
                row.entry(other.clone()).or_insert(Decimal::ZERO);
            }
        }
        for other in others {
            if other == id {
                continue;
            }
            self.cells
                .entry(other.clone())
                .or_default()
                .entry(id.clone())
                .or_insert(Decimal::ZERO);
        }
    }

    /// Delete every entry referencing `id`, as either party.
    pub fn purge(&mut self, id: &ParticipantId) {
        self.cells.remove(id);
        for row in self.cells.values_mut() {
            row.remove(id);
        }
    }

    /// The amount `a` is owed by `b` (zero when no entry exists).
    pub fn get(&self, a: &ParticipantId, b: &ParticipantId) -> Decimal {
        self.cells
            .get(a)
            .and_then(|row| row.get(b))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Raise `creditor`'s claim on `debtor` by `delta` (negative lowers it).
    ///
    /// Both cells are written in one step. Adjusting a participant against
    /// itself is a no-op.
    pub fn adjust(&mut self, creditor: &ParticipantId, debtor: &ParticipantId, delta: Decimal) {
        if creditor == debtor {
            return;
        }
        *self
            .cells
            .entry(creditor.clone())
            .or_default()
            .entry(debtor.clone())
            .or_insert(Decimal::ZERO) += delta;
        *self
            .cells
            .entry(debtor.clone())
            .or_default()
            .entry(creditor.clone())
            .or_insert(Decimal::ZERO) -= delta;
    }

    /// Sum of `id`'s claims across all counterparts.
    pub fn net_position(&self, id: &ParticipantId) -> Decimal {
        self.cells
            .get(id)
            .map(|row| row.values().copied().sum())
            .unwrap_or(Decimal::ZERO)
    }

    /// Participants that currently hold at least one matrix entry.
    pub fn participants(&self) -> impl Iterator<Item = &ParticipantId> {
        self.cells.keys()
    }

    /// Whether any entry references `id`.
    pub fn references(&self, id: &ParticipantId) -> bool {
        self.cells.contains_key(id) || self.cells.values().any(|row| row.contains_key(id))
    }

    /// Verify `balance[a][b] == -balance[b][a]` for every stored pair.
    pub fn is_skew_symmetric(&self) -> bool {
        self.cells
            .iter()
            .all(|(a, row)| row.iter().all(|(b, v)| self.get(b, a) == -*v))
    }

    /// Build the balance summary for one participant.
    ///
    /// Counterparts come out in sorted order; zero balances are omitted.
    pub fn report_for(&self, id: &ParticipantId) -> BalanceReport {
        let mut report = BalanceReport::empty(id.clone());

        if let Some(row) = self.cells.get(id) {
            for (counterpart, amount) in row {
                if amount.is_zero() {
                    continue;
                }
                if *amount > Decimal::ZERO {
                    report.total_receivable += *amount;
                    report.to_receive.push(BalanceEntry {
                        counterpart: counterpart.clone(),
                        amount: *amount,
                    });
                } else {
                    report.total_payable += -*amount;
                    report.to_pay.push(BalanceEntry {
                        counterpart: counterpart.clone(),
                        amount: -*amount,
                    });
                }
            }
        }

        report
    }
}

/// One side of a balance report: a counterpart and a positive magnitude.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub counterpart: ParticipantId,
    pub amount: Decimal,
}

/// Balance summary for one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub participant: ParticipantId,
    /// Counterparts that owe this participant, with the owed amounts.
    pub to_receive: Vec<BalanceEntry>,
    /// Counterparts this participant owes, with the owed amounts.
    pub to_pay: Vec<BalanceEntry>,
    pub total_receivable: Decimal,
    pub total_payable: Decimal,
}

impl BalanceReport {
    fn empty(participant: ParticipantId) -> Self {
        Self {
            participant,
            to_receive: Vec::new(),
            to_pay: Vec::new(),
            total_receivable: Decimal::ZERO,
            total_payable: Decimal::ZERO,
        }
    }

    /// Net position: receivable minus payable.
    pub fn net(&self) -> Decimal {
        self.total_receivable - self.total_payable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(handle: &str) -> ParticipantId {
        ParticipantId::from(handle)
    }

    #[test]
    fn adjust_writes_both_directions() {
        let mut matrix = BalanceMatrix::new();
        matrix.adjust(&id("alice"), &id("bob"), Decimal::from(10));

        assert_eq!(matrix.get(&id("alice"), &id("bob")), Decimal::from(10));
        assert_eq!(matrix.get(&id("bob"), &id("alice")), Decimal::from(-10));
        assert!(matrix.is_skew_symmetric());
    }

    #[test]
    fn self_adjustment_is_a_no_op() {
        let mut matrix = BalanceMatrix::new();
        matrix.adjust(&id("alice"), &id("alice"), Decimal::from(10));

        assert_eq!(matrix.get(&id("alice"), &id("alice")), Decimal::ZERO);
        assert!(!matrix.references(&id("alice")));
    }

    #[test]
    fn missing_cells_read_as_zero() {
        let matrix = BalanceMatrix::new();
        assert_eq!(matrix.get(&id("alice"), &id("bob")), Decimal::ZERO);
    }

    #[test]
    fn add_participant_materializes_zero_rows_both_ways() {
        let mut matrix = BalanceMatrix::new();
        matrix.add_participant(&id("alice"), &[]);
        matrix.add_participant(&id("bob"), &[id("alice")]);

        assert!(matrix.references(&id("alice")));
        assert!(matrix.references(&id("bob")));
        assert_eq!(matrix.get(&id("alice"), &id("bob")), Decimal::ZERO);
        assert_eq!(matrix.get(&id("bob"), &id("alice")), Decimal::ZERO);
    }

    #[test]
    fn purge_removes_both_sides() {
        let mut matrix = BalanceMatrix::new();
        matrix.adjust(&id("alice"), &id("bob"), Decimal::from(10));
        matrix.adjust(&id("carol"), &id("alice"), Decimal::from(5));

        matrix.purge(&id("alice"));

        assert!(!matrix.references(&id("alice")));
        assert_eq!(matrix.get(&id("carol"), &id("alice")), Decimal::ZERO);
        assert!(matrix.is_skew_symmetric());
    }

    #[test]
    fn report_classifies_receivable_and_payable() {
        let mut matrix = BalanceMatrix::new();
        matrix.adjust(&id("alice"), &id("bob"), Decimal::from(10));
        matrix.adjust(&id("carol"), &id("alice"), Decimal::from(4));
        matrix.add_participant(&id("dave"), &[id("alice")]);

        let report = matrix.report_for(&id("alice"));

        assert_eq!(report.to_receive.len(), 1);
        assert_eq!(report.to_receive[0].counterpart, id("bob"));
        assert_eq!(report.to_receive[0].amount, Decimal::from(10));
        assert_eq!(report.to_pay.len(), 1);
        assert_eq!(report.to_pay[0].counterpart, id("carol"));
        assert_eq!(report.to_pay[0].amount, Decimal::from(4));
        assert_eq!(report.total_receivable, Decimal::from(10));
        assert_eq!(report.total_payable, Decimal::from(4));
        assert_eq!(report.net(), Decimal::from(6));
    }
}
