pub mod customer;
pub mod health;
pub mod project;
pub mod unit;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects            list, create
/// /projects/{id}       get, put, patch, delete
///
/// /units               list, create (single or batch)
/// /units/{id}          get, put, patch, delete
///
/// /customers           list, create
/// /customers/{id}      get, put, patch, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Project routes (deleting a project cascades to its units).
        .nest("/projects", project::router())
        // Unit routes (batch creation supported on POST).
        .nest("/units", unit::router())
        // Customer routes (deleting a customer releases its units).
        .nest("/customers", customer::router())
}
