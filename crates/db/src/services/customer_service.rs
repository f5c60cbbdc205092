//! Record service for customers.

use chrono::Utc;
use ladrillo_core::customer::{CreateCustomer, Customer, CustomerDraft, UpdateCustomer};
use ladrillo_core::error::CoreError;
use ladrillo_core::types::Id;
use uuid::Uuid;

use super::{map_customer_constraint, ServiceError, ServiceResult};
use crate::ordering::Ordering;
use crate::pagination::Page;
use crate::repositories::customer_repo::{CustomerFilter, CustomerOrder};
use crate::repositories::{CustomerRepo, UnitRepo};
use crate::DbPool;

pub struct CustomerService;

impl CustomerService {
    /// Validate and persist a new customer. rut/email uniqueness is
    /// enforced by the storage constraints and surfaced as a validation
    /// error on the conflicting field.
    pub async fn create(pool: &DbPool, input: CreateCustomer) -> ServiceResult<Customer> {
        let draft = CustomerDraft::from(input)
            .validated()
            .map_err(CoreError::Validation)?;
        let customer = draft.into_customer(Uuid::new_v4(), Utc::now());
        CustomerRepo::insert(pool, &customer)
            .await
            .map_err(map_customer_constraint)?;
        tracing::debug!(id = %customer.id, "customer created");
        Ok(customer)
    }

    pub async fn get(pool: &DbPool, id: Id) -> ServiceResult<Option<Customer>> {
        Ok(CustomerRepo::find_by_id(pool, id).await?)
    }

    /// Full replace: the payload is re-validated as a complete field set.
    pub async fn update(pool: &DbPool, id: Id, input: CreateCustomer) -> ServiceResult<Customer> {
        let existing = CustomerRepo::find_by_id(pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Customer", id))?;
        let draft = CustomerDraft::from(input)
            .validated()
            .map_err(CoreError::Validation)?;
        let customer = draft.into_customer(existing.id, existing.created_at);
        let matched = CustomerRepo::update(pool, &customer)
            .await
            .map_err(map_customer_constraint)?;
        if !matched {
            return Err(ServiceError::not_found("Customer", id));
        }
        Ok(customer)
    }

    /// Merge supplied keys over the existing record, then re-run full
    /// validation against the merged result.
    pub async fn partial_update(
        pool: &DbPool,
        id: Id,
        patch: UpdateCustomer,
    ) -> ServiceResult<Customer> {
        let existing = CustomerRepo::find_by_id(pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Customer", id))?;
        let draft = existing
            .draft()
            .apply(patch)
            .validated()
            .map_err(CoreError::Validation)?;
        let customer = draft.into_customer(existing.id, existing.created_at);
        let matched = CustomerRepo::update(pool, &customer)
            .await
            .map_err(map_customer_constraint)?;
        if !matched {
            return Err(ServiceError::not_found("Customer", id));
        }
        Ok(customer)
    }

    /// Delete the customer, detaching any units that reference it in the
    /// same transaction. Detached units revert to Available so the
    /// customer/status invariant keeps holding.
    pub async fn delete(pool: &DbPool, id: Id) -> ServiceResult<bool> {
        let mut tx = pool.begin().await?;
        let detached_units = UnitRepo::detach_customer(&mut *tx, id).await?;
        let deleted = CustomerRepo::delete(&mut *tx, id).await?;
        tx.commit().await?;
        if deleted {
            tracing::info!(%id, detached_units, "customer deleted");
        }
        Ok(deleted)
    }

    /// Pure pass-through to the repository; no validation involved.
    pub async fn list(
        pool: &DbPool,
        filter: &CustomerFilter,
        order: Ordering<CustomerOrder>,
        page: Page,
    ) -> ServiceResult<Vec<Customer>> {
        Ok(CustomerRepo::list(pool, filter, order, page).await?)
    }
}
