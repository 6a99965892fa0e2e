use rust_decimal::Decimal;
use serde::Deserialize;

use fairshare_core::ParticipantId;
use fairshare_ledger::Beneficiaries;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterParticipantRequest {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordExpenseRequest {
    pub payer: String,
    pub amount: Decimal,
    /// Omitted means "split across everyone registered right now".
    pub beneficiaries: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct RecordExpenseForRequest {
    pub beneficiary: String,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub payer: String,
    pub payee: String,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    pub payer: Option<String>,
}

// -------------------------
// Mapping helpers
// -------------------------

/// Map the optional wire-level list onto the explicit beneficiary selection.
///
/// An omitted field is the whole group; a present-but-empty list is passed
/// through so the core can reject it.
pub fn to_beneficiaries(list: Option<Vec<String>>) -> Beneficiaries {
    match list {
        None => Beneficiaries::Everyone,
        Some(ids) => Beneficiaries::Listed(ids.into_iter().map(ParticipantId::from).collect()),
    }
}
