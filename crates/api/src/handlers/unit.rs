//! Handlers for the `/units` resource.
//!
//! `POST /units` accepts either a single unit object or an array of
//! them; the array form is created atomically.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use ladrillo_core::error::CoreError;
use ladrillo_core::types::Id;
use ladrillo_core::unit::{CreateUnit, Unit, UnitStatus, UnitType, UpdateUnit};
use ladrillo_db::ordering::{parse_ordering, Ordering};
use ladrillo_db::pagination::Page;
use ladrillo_db::repositories::unit_repo::{UnitFilter, UnitOrder};
use ladrillo_db::services::UnitService;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters accepted by `GET /units`.
#[derive(Debug, Deserialize)]
pub struct UnitListParams {
    pub project_id: Option<Id>,
    pub unit_status: Option<UnitStatus>,
    pub unit_type: Option<UnitType>,
    pub ordering: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Body for `POST /units`: one unit or a batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CreateUnitPayload {
    Batch(Vec<CreateUnit>),
    Single(Box<CreateUnit>),
}

/// GET /api/v1/units
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<UnitListParams>,
) -> AppResult<Json<Vec<Unit>>> {
    let order = match params.ordering.as_deref() {
        Some(raw) => parse_ordering::<UnitOrder>(raw)
            .ok_or_else(|| AppError::BadRequest(format!("unsupported ordering '{raw}'")))?,
        None => Ordering::default(),
    };
    let filter = UnitFilter {
        project_id: params.project_id,
        unit_status: params.unit_status,
        unit_type: params.unit_type,
    };
    let page = Page {
        limit: params.limit,
        offset: params.offset,
    };

    let units = UnitService::list(&state.pool, &filter, order, page).await?;
    Ok(Json(units))
}

/// POST /api/v1/units
///
/// Responds 201 with the created unit, or with the full array when the
/// request body was an array. A batch either persists completely or not
/// at all.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateUnitPayload>,
) -> AppResult<Response> {
    match payload {
        CreateUnitPayload::Single(input) => {
            let unit = UnitService::create(&state.pool, *input).await?;
            Ok((StatusCode::CREATED, Json(unit)).into_response())
        }
        CreateUnitPayload::Batch(inputs) => {
            let units = UnitService::create_many(&state.pool, inputs).await?;
            Ok((StatusCode::CREATED, Json(units)).into_response())
        }
    }
}

/// GET /api/v1/units/{id}
pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<Id>) -> AppResult<Json<Unit>> {
    let unit = UnitService::get(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Unit", id }))?;
    Ok(Json(unit))
}

/// PUT /api/v1/units/{id} -- full replace.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(input): Json<CreateUnit>,
) -> AppResult<Json<Unit>> {
    let unit = UnitService::update(&state.pool, id, input).await?;
    Ok(Json(unit))
}

/// PATCH /api/v1/units/{id} -- only supplied keys overwrite.
pub async fn partial_update(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(patch): Json<UpdateUnit>,
) -> AppResult<Json<Unit>> {
    let unit = UnitService::partial_update(&state.pool, id, patch).await?;
    Ok(Json(unit))
}

/// DELETE /api/v1/units/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<Id>) -> AppResult<StatusCode> {
    let deleted = UnitService::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Unit", id }))
    }
}
