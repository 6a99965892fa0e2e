//! Participant registry.
//!
//! This crate contains the roster of registered participants, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod roster;

pub use roster::Roster;
