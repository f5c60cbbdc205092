//! Record service for projects.

use chrono::Utc;
use ladrillo_core::error::CoreError;
use ladrillo_core::project::{CreateProject, Project, ProjectDraft, UpdateProject};
use ladrillo_core::types::Id;
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::ordering::Ordering;
use crate::pagination::Page;
use crate::repositories::project_repo::{ProjectFilter, ProjectOrder};
use crate::repositories::{ProjectRepo, UnitRepo};
use crate::DbPool;

pub struct ProjectService;

impl ProjectService {
    /// Validate and persist a new project.
    pub async fn create(pool: &DbPool, input: CreateProject) -> ServiceResult<Project> {
        let draft = ProjectDraft::from(input)
            .validated()
            .map_err(CoreError::Validation)?;
        let project = draft.into_project(Uuid::new_v4(), Utc::now());
        ProjectRepo::insert(pool, &project).await?;
        tracing::debug!(id = %project.id, "project created");
        Ok(project)
    }

    /// Absence is a value here; callers decide how to surface it.
    pub async fn get(pool: &DbPool, id: Id) -> ServiceResult<Option<Project>> {
        Ok(ProjectRepo::find_by_id(pool, id).await?)
    }

    /// Full replace: the payload is re-validated as a complete field set.
    pub async fn update(pool: &DbPool, id: Id, input: CreateProject) -> ServiceResult<Project> {
        let existing = ProjectRepo::find_by_id(pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project", id))?;
        let draft = ProjectDraft::from(input)
            .validated()
            .map_err(CoreError::Validation)?;
        let project = draft.into_project(existing.id, existing.created_at);
        if !ProjectRepo::update(pool, &project).await? {
            return Err(ServiceError::not_found("Project", id));
        }
        Ok(project)
    }

    /// Merge supplied keys over the existing record, then re-run full
    /// validation against the merged result.
    pub async fn partial_update(
        pool: &DbPool,
        id: Id,
        patch: UpdateProject,
    ) -> ServiceResult<Project> {
        let existing = ProjectRepo::find_by_id(pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project", id))?;
        let draft = existing
            .draft()
            .apply(patch)
            .validated()
            .map_err(CoreError::Validation)?;
        let project = draft.into_project(existing.id, existing.created_at);
        if !ProjectRepo::update(pool, &project).await? {
            return Err(ServiceError::not_found("Project", id));
        }
        Ok(project)
    }

    /// Delete the project and all of its units in one transaction.
    /// Returns `false` if the project does not exist.
    pub async fn delete(pool: &DbPool, id: Id) -> ServiceResult<bool> {
        let mut tx = pool.begin().await?;
        let removed_units = UnitRepo::delete_by_project(&mut *tx, id).await?;
        let deleted = ProjectRepo::delete(&mut *tx, id).await?;
        tx.commit().await?;
        if deleted {
            tracing::info!(%id, removed_units, "project deleted");
        }
        Ok(deleted)
    }

    /// Pure pass-through to the repository; no validation involved.
    pub async fn list(
        pool: &DbPool,
        filter: &ProjectFilter,
        order: Ordering<ProjectOrder>,
        page: Page,
    ) -> ServiceResult<Vec<Project>> {
        Ok(ProjectRepo::list(pool, filter, order, page).await?)
    }
}
