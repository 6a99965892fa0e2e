//! Balance-ledger engine: the append-only transaction log, the pairwise
//! balance matrix, and the operations that keep them consistent.
//!
//! Pure domain logic plus a single-lock concurrent handle; no IO, no HTTP,
//! no persistence concerns.

mod allocation;
pub mod balance;
pub mod ledger;
pub mod shared;
pub mod transaction;

pub use balance::{BalanceEntry, BalanceMatrix, BalanceReport};
pub use ledger::Ledger;
pub use shared::SharedLedger;
pub use transaction::{Beneficiaries, Transaction, TransactionKind};
