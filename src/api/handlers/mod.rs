//! REST endpoint handlers organized by resource.

pub mod email;
pub mod payment;
pub mod scanner;
pub mod system;
pub mod tickets;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(scanner::routes())
        .merge(tickets::routes())
        .merge(payment::routes())
        .merge(email::routes())
}
