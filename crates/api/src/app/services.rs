//! Application services: the group directory.

use std::collections::HashMap;
use std::sync::RwLock;

use fairshare_core::GroupId;
use fairshare_ledger::SharedLedger;

/// All groups served by this process, each with its own independent ledger.
///
/// Groups are fully isolated: nothing is shared between two ledgers, so a
/// handler always resolves the group first and then operates on that
/// ledger's own lock.
#[derive(Debug, Default)]
pub struct AppServices {
    groups: RwLock<HashMap<GroupId, SharedLedger>>,
}

impl AppServices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new group with an empty ledger and return its id.
    pub fn create_group(&self) -> GroupId {
        let id = GroupId::new();
        self.groups_mut().insert(id, SharedLedger::new());
        id
    }

    /// Look up a group's ledger handle.
    pub fn group(&self, id: GroupId) -> Option<SharedLedger> {
        self.groups_ref().get(&id).cloned()
    }

    /// All known group ids, sorted for deterministic listings.
    pub fn list_groups(&self) -> Vec<GroupId> {
        let mut ids: Vec<GroupId> = self.groups_ref().keys().copied().collect();
        ids.sort_by_key(|id| *id.as_uuid().as_bytes());
        ids
    }

    fn groups_ref(&self) -> std::sync::RwLockReadGuard<'_, HashMap<GroupId, SharedLedger>> {
        self.groups
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn groups_mut(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<GroupId, SharedLedger>> {
        self.groups
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
