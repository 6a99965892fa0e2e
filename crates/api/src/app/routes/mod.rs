use axum::{
    routing::{get, post},
    Router,
};

pub mod balances;
pub mod expenses;
pub mod groups;
pub mod participants;
pub mod payments;
pub mod system;
pub mod transactions;

/// Router for all endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/groups", post(groups::create_group).get(groups::list_groups))
        .nest("/groups/:group_id", group_router())
}

/// Everything scoped to one group's ledger.
fn group_router() -> Router {
    Router::new()
        .nest("/participants", participants::router())
        .nest("/expenses", expenses::router())
        .nest("/payments", payments::router())
        .nest("/transactions", transactions::router())
        .nest("/balances", balances::router())
}
