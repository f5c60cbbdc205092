//! Record services: one per entity, orchestrating validation, reference
//! checks, and persistence.
//!
//! Every service call is a stateless unit of work over the pool. Validation
//! failures are returned before anything touches storage; driver-level
//! unique violations are caught here and re-shaped into the same
//! field-keyed error contract, so callers never need to distinguish error
//! origin.

pub mod customer_service;
pub mod project_service;
pub mod unit_service;

pub use customer_service::CustomerService;
pub use project_service::ProjectService;
pub use unit_service::UnitService;

use ladrillo_core::error::{CoreError, ValidationErrors};
use ladrillo_core::types::Id;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A domain-level error (not found, validation).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(errors: ValidationErrors) -> Self {
        CoreError::Validation(errors).into()
    }

    pub fn not_found(entity: &'static str, id: Id) -> Self {
        CoreError::NotFound { entity, id }.into()
    }
}

/// Map a driver unique-violation on the `customers` table back to the
/// conflicting field name. SQLite reports the violated column, not the
/// index name, in the error message ("UNIQUE constraint failed:
/// customers.rut"), and the sqlite driver exposes no `constraint()`
/// accessor, so the column-qualified message is the only signal.
fn customer_unique_violation(error: &sqlx::Error) -> Option<&'static str> {
    let db_err = match error {
        sqlx::Error::Database(db_err) => db_err,
        _ => return None,
    };
    if !db_err.is_unique_violation() {
        return None;
    }
    let message = db_err.message();
    if message.contains("customers.rut") {
        Some("rut")
    } else if message.contains("customers.email") {
        Some("email")
    } else {
        None
    }
}

/// Translate a unique violation into the validation error contract, or
/// pass the error through untouched.
fn map_customer_constraint(error: sqlx::Error) -> ServiceError {
    match customer_unique_violation(&error) {
        Some(field) => ServiceError::validation(ValidationErrors::single(
            field,
            format!("a customer with this {field} already exists"),
        )),
        None => ServiceError::Database(error),
    }
}
