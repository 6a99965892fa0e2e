//! Domain error model.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::id::{ParticipantId, TransactionId};

/// Result type used across the domain layer.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures; every variant is
/// recoverable by the caller retrying with corrected input. Infrastructure
/// concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Amount was zero or negative.
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// Registration of a handle that is already in the roster.
    #[error("participant `{0}` is already registered")]
    AlreadyRegistered(ParticipantId),

    /// An operation referenced a participant that is not in the roster.
    #[error("participant `{0}` is not registered")]
    NotRegistered(ParticipantId),

    /// A reversal referenced a transaction id that is not in the log.
    #[error("no transaction with id {0}")]
    TransactionNotFound(TransactionId),

    /// A settlement larger than the debt currently owed.
    #[error("`{payer}` owes `{payee}` {owed}, cannot settle {requested}")]
    InsufficientDebt {
        payer: ParticipantId,
        payee: ParticipantId,
        requested: Decimal,
        owed: Decimal,
    },

    /// An expense whose beneficiary set resolved to nothing.
    #[error("an expense needs at least one beneficiary")]
    EmptyBeneficiaries,
}

impl LedgerError {
    pub fn not_registered(id: &ParticipantId) -> Self {
        Self::NotRegistered(id.clone())
    }

    pub fn already_registered(id: &ParticipantId) -> Self {
        Self::AlreadyRegistered(id.clone())
    }
}
