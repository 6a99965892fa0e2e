//! The set of participants known to one ledger.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use fairshare_core::{LedgerError, LedgerResult, ParticipantId};

/// Registered participants of a single ledger.
///
/// Membership gates every ledger operation: only registered participants can
/// appear in balances or new transactions. The set is ordered so listings
/// and "everyone" beneficiary resolution are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    members: BTreeSet<ParticipantId>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant.
    ///
    /// Rejects duplicates; a second registration of the same handle leaves
    /// the roster unchanged.
    pub fn register(&mut self, id: ParticipantId) -> LedgerResult<()> {
        if self.members.contains(&id) {
            return Err(LedgerError::AlreadyRegistered(id));
        }
        self.members.insert(id);
        Ok(())
    }

    /// Remove a participant.
    pub fn remove(&mut self, id: &ParticipantId) -> LedgerResult<()> {
        if !self.members.remove(id) {
            return Err(LedgerError::not_registered(id));
        }
        Ok(())
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.members.contains(id)
    }

    /// Fail with `NotRegistered` unless `id` is a member.
    pub fn ensure_member(&self, id: &ParticipantId) -> LedgerResult<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(LedgerError::not_registered(id))
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterate members in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &ParticipantId> {
        self.members.iter()
    }

    /// Sorted snapshot of the membership.
    pub fn members(&self) -> Vec<ParticipantId> {
        self.members.iter().cloned().collect()
    }
}
