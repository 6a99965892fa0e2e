//! `fairshare-api` — HTTP front end over the shared-expense ledger core.

pub mod app;
