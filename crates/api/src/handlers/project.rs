//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use ladrillo_core::error::CoreError;
use ladrillo_core::project::{CreateProject, Project, ProjectStatus, UpdateProject};
use ladrillo_core::types::Id;
use ladrillo_db::ordering::{parse_ordering, Ordering};
use ladrillo_db::pagination::Page;
use ladrillo_db::repositories::project_repo::{ProjectFilter, ProjectOrder};
use ladrillo_db::services::ProjectService;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters accepted by `GET /projects`.
///
/// `name` and `address` are substring matches; `started_after` /
/// `started_before` bound the start date; `ordering` follows the
/// `field` / `-field` convention.
#[derive(Debug, Deserialize)]
pub struct ProjectListParams {
    pub name: Option<String>,
    pub address: Option<String>,
    pub status: Option<ProjectStatus>,
    pub started_after: Option<NaiveDate>,
    pub started_before: Option<NaiveDate>,
    pub ordering: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ProjectListParams>,
) -> AppResult<Json<Vec<Project>>> {
    let order = match params.ordering.as_deref() {
        Some(raw) => parse_ordering::<ProjectOrder>(raw)
            .ok_or_else(|| AppError::BadRequest(format!("unsupported ordering '{raw}'")))?,
        None => Ordering::default(),
    };
    let filter = ProjectFilter {
        name: params.name,
        address: params.address,
        status: params.status,
        started_after: params.started_after,
        started_before: params.started_before,
    };
    let page = Page {
        limit: params.limit,
        offset: params.offset,
    };

    let projects = ProjectService::list(&state.pool, &filter, order, page).await?;
    Ok(Json(projects))
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let project = ProjectService::create(&state.pool, input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> AppResult<Json<Project>> {
    let project = ProjectService::get(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// PUT /api/v1/projects/{id} -- full replace.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(input): Json<CreateProject>,
) -> AppResult<Json<Project>> {
    let project = ProjectService::update(&state.pool, id, input).await?;
    Ok(Json(project))
}

/// PATCH /api/v1/projects/{id} -- only supplied keys overwrite.
pub async fn partial_update(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(patch): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    let project = ProjectService::partial_update(&state.pool, id, patch).await?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id} -- cascades to the project's units.
pub async fn delete(State(state): State<AppState>, Path(id): Path<Id>) -> AppResult<StatusCode> {
    let deleted = ProjectService::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}
