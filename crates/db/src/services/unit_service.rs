//! Record service for units, including all-or-nothing batch creation.

use chrono::Utc;
use ladrillo_core::error::{CoreError, ValidationErrors};
use ladrillo_core::types::Id;
use ladrillo_core::unit::{CreateUnit, Unit, UnitDraft, UpdateUnit};
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::ordering::Ordering;
use crate::pagination::Page;
use crate::repositories::unit_repo::{UnitFilter, UnitOrder};
use crate::repositories::{CustomerRepo, ProjectRepo, UnitRepo};
use crate::DbPool;

pub struct UnitService;

impl UnitService {
    /// Validate and persist a new unit.
    pub async fn create(pool: &DbPool, input: CreateUnit) -> ServiceResult<Unit> {
        let draft = UnitDraft::from(input)
            .validated()
            .map_err(CoreError::Validation)?;
        Self::check_references(pool, &draft)
            .await?
            .into_result()
            .map_err(CoreError::Validation)?;
        let unit = draft.into_unit(Uuid::new_v4(), Utc::now());
        UnitRepo::insert(pool, &unit).await?;
        tracing::debug!(id = %unit.id, project_id = %unit.project_id, "unit created");
        Ok(unit)
    }

    /// All-or-nothing batch creation. Every element is validated
    /// independently; any failure rejects the whole batch with errors
    /// keyed `{index}.{field}`. Inserts run in a single transaction, so
    /// nothing is persisted unless everything is.
    pub async fn create_many(pool: &DbPool, inputs: Vec<CreateUnit>) -> ServiceResult<Vec<Unit>> {
        let mut drafts = Vec::with_capacity(inputs.len());
        let mut batch_errors = ValidationErrors::new();

        for (index, input) in inputs.into_iter().enumerate() {
            match UnitDraft::from(input).validated() {
                Ok(draft) => {
                    let reference_errors = Self::check_references(pool, &draft).await?;
                    match reference_errors.into_result() {
                        Ok(()) => drafts.push(draft),
                        Err(errors) => batch_errors.merge_indexed(index, errors),
                    }
                }
                Err(errors) => batch_errors.merge_indexed(index, errors),
            }
        }
        batch_errors.into_result().map_err(CoreError::Validation)?;

        let now = Utc::now();
        let mut tx = pool.begin().await?;
        let mut units = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let unit = draft.into_unit(Uuid::new_v4(), now);
            UnitRepo::insert(&mut *tx, &unit).await?;
            units.push(unit);
        }
        tx.commit().await?;

        tracing::debug!(count = units.len(), "unit batch created");
        Ok(units)
    }

    pub async fn get(pool: &DbPool, id: Id) -> ServiceResult<Option<Unit>> {
        Ok(UnitRepo::find_by_id(pool, id).await?)
    }

    /// Full replace: the payload is re-validated as a complete field set.
    pub async fn update(pool: &DbPool, id: Id, input: CreateUnit) -> ServiceResult<Unit> {
        let existing = UnitRepo::find_by_id(pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Unit", id))?;
        let draft = UnitDraft::from(input)
            .validated()
            .map_err(CoreError::Validation)?;
        Self::check_references(pool, &draft)
            .await?
            .into_result()
            .map_err(CoreError::Validation)?;
        let unit = draft.into_unit(existing.id, existing.created_at);
        if !UnitRepo::update(pool, &unit).await? {
            return Err(ServiceError::not_found("Unit", id));
        }
        Ok(unit)
    }

    /// Merge supplied keys over the existing record, then re-run full
    /// validation against the merged result. Changing only one side of
    /// the customer/status pair re-checks the whole pair.
    pub async fn partial_update(pool: &DbPool, id: Id, patch: UpdateUnit) -> ServiceResult<Unit> {
        let existing = UnitRepo::find_by_id(pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Unit", id))?;
        let draft = existing
            .draft()
            .apply(patch)
            .validated()
            .map_err(CoreError::Validation)?;
        Self::check_references(pool, &draft)
            .await?
            .into_result()
            .map_err(CoreError::Validation)?;
        let unit = draft.into_unit(existing.id, existing.created_at);
        if !UnitRepo::update(pool, &unit).await? {
            return Err(ServiceError::not_found("Unit", id));
        }
        Ok(unit)
    }

    /// Returns `false` if the unit does not exist.
    pub async fn delete(pool: &DbPool, id: Id) -> ServiceResult<bool> {
        Ok(UnitRepo::delete(pool, id).await?)
    }

    /// Pure pass-through to the repository; no validation involved.
    pub async fn list(
        pool: &DbPool,
        filter: &UnitFilter,
        order: Ordering<UnitOrder>,
        page: Page,
    ) -> ServiceResult<Vec<Unit>> {
        Ok(UnitRepo::list(pool, filter, order, page).await?)
    }

    /// Referenced rows must exist before an insert or update is attempted;
    /// failures land on the reference field, matching the validation
    /// contract.
    async fn check_references(pool: &DbPool, draft: &UnitDraft) -> ServiceResult<ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !ProjectRepo::exists(pool, draft.project_id).await? {
            errors.add("project_id", "referenced project does not exist");
        }
        if let Some(customer_id) = draft.customer_id {
            if !CustomerRepo::exists(pool, customer_id).await? {
                errors.add("customer_id", "referenced customer does not exist");
            }
        }
        Ok(errors)
    }
}
