//! Handlers for the `/customers` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use ladrillo_core::customer::{CreateCustomer, Customer, UpdateCustomer};
use ladrillo_core::error::CoreError;
use ladrillo_core::types::Id;
use ladrillo_db::ordering::{parse_ordering, Ordering};
use ladrillo_db::pagination::Page;
use ladrillo_db::repositories::customer_repo::{CustomerFilter, CustomerOrder};
use ladrillo_db::services::CustomerService;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters accepted by `GET /customers`.
///
/// `rut`, `email` and `phone` are exact matches; `name` and `lastname`
/// are substring matches.
#[derive(Debug, Deserialize)]
pub struct CustomerListParams {
    pub rut: Option<String>,
    pub name: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub ordering: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/customers
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<CustomerListParams>,
) -> AppResult<Json<Vec<Customer>>> {
    let order = match params.ordering.as_deref() {
        Some(raw) => parse_ordering::<CustomerOrder>(raw)
            .ok_or_else(|| AppError::BadRequest(format!("unsupported ordering '{raw}'")))?,
        None => Ordering::default(),
    };
    let filter = CustomerFilter {
        rut: params.rut,
        name: params.name,
        lastname: params.lastname,
        email: params.email,
        phone: params.phone,
    };
    let page = Page {
        limit: params.limit,
        offset: params.offset,
    };

    let customers = CustomerService::list(&state.pool, &filter, order, page).await?;
    Ok(Json(customers))
}

/// POST /api/v1/customers
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCustomer>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let customer = CustomerService::create(&state.pool, input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /api/v1/customers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> AppResult<Json<Customer>> {
    let customer = CustomerService::get(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id,
        }))?;
    Ok(Json(customer))
}

/// PUT /api/v1/customers/{id} -- full replace.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(input): Json<CreateCustomer>,
) -> AppResult<Json<Customer>> {
    let customer = CustomerService::update(&state.pool, id, input).await?;
    Ok(Json(customer))
}

/// PATCH /api/v1/customers/{id} -- only supplied keys overwrite.
pub async fn partial_update(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(patch): Json<UpdateCustomer>,
) -> AppResult<Json<Customer>> {
    let customer = CustomerService::partial_update(&state.pool, id, patch).await?;
    Ok(Json(customer))
}

/// DELETE /api/v1/customers/{id} -- detaches the customer's units first.
pub async fn delete(State(state): State<AppState>, Path(id): Path<Id>) -> AppResult<StatusCode> {
    let deleted = CustomerService::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id,
        }))
    }
}
