//! Repository for the `units` table.

use std::str::FromStr;

use ladrillo_core::types::Id;
use ladrillo_core::unit::{Unit, UnitStatus, UnitType};
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};

use crate::ordering::Ordering;
use crate::pagination::{clamp_limit, clamp_offset, Page};

const COLUMNS: &str = "id, project_id, customer_id, unit_number, unit_type, square_meters, \
                       price, reservation_deposit, unit_status, created_at";

/// Optional filters for unit listings.
#[derive(Debug, Clone, Default)]
pub struct UnitFilter {
    pub unit_status: Option<UnitStatus>,
    pub unit_type: Option<UnitType>,
    pub project_id: Option<Id>,
}

/// Sortable columns for unit listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnitOrder {
    #[default]
    CreatedAt,
    Price,
}

impl UnitOrder {
    fn column(self) -> &'static str {
        match self {
            UnitOrder::CreatedAt => "created_at",
            UnitOrder::Price => "price",
        }
    }
}

impl FromStr for UnitOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(UnitOrder::CreatedAt),
            "price" => Ok(UnitOrder::Price),
            _ => Err(()),
        }
    }
}

/// CRUD operations for units, plus the relationship maintenance the
/// services run when a parent record goes away.
pub struct UnitRepo;

impl UnitRepo {
    /// Insert a fully-materialized unit row.
    pub async fn insert(executor: impl SqliteExecutor<'_>, unit: &Unit) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO units (id, project_id, customer_id, unit_number, unit_type, square_meters, \
                                price, reservation_deposit, unit_status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(unit.id)
        .bind(unit.project_id)
        .bind(unit.customer_id)
        .bind(&unit.unit_number)
        .bind(unit.unit_type)
        .bind(unit.square_meters)
        .bind(unit.price)
        .bind(unit.reservation_deposit)
        .bind(unit.unit_status)
        .bind(unit.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn find_by_id(
        executor: impl SqliteExecutor<'_>,
        id: Id,
    ) -> Result<Option<Unit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM units WHERE id = ?");
        sqlx::query_as::<_, Unit>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Replace every mutable column. Returns `false` if no row matched.
    pub async fn update(executor: impl SqliteExecutor<'_>, unit: &Unit) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE units
             SET project_id = ?, customer_id = ?, unit_number = ?, unit_type = ?, \
                 square_meters = ?, price = ?, reservation_deposit = ?, unit_status = ?
             WHERE id = ?",
        )
        .bind(unit.project_id)
        .bind(unit.customer_id)
        .bind(&unit.unit_number)
        .bind(unit.unit_type)
        .bind(unit.square_meters)
        .bind(unit.price)
        .bind(unit.reservation_deposit)
        .bind(unit.unit_status)
        .bind(unit.id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a unit by ID. Returns `true` if a row was removed.
    pub async fn delete(executor: impl SqliteExecutor<'_>, id: Id) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM units WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Cascade step of project deletion. Returns the number of units
    /// removed.
    pub async fn delete_by_project(
        executor: impl SqliteExecutor<'_>,
        project_id: Id,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM units WHERE project_id = ?")
            .bind(project_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Detach step of customer deletion: clears the reference and reverts
    /// the sale status to Available so the customer/status invariant keeps
    /// holding. Returns the number of units detached.
    pub async fn detach_customer(
        executor: impl SqliteExecutor<'_>,
        customer_id: Id,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE units SET customer_id = NULL, unit_status = ? WHERE customer_id = ?",
        )
        .bind(UnitStatus::Available)
        .bind(customer_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// List units matching `filter`, sorted per `order`, paginated.
    pub async fn list(
        executor: impl SqliteExecutor<'_>,
        filter: &UnitFilter,
        order: Ordering<UnitOrder>,
        page: Page,
    ) -> Result<Vec<Unit>, sqlx::Error> {
        let mut query =
            QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM units WHERE 1 = 1"));

        if let Some(unit_status) = filter.unit_status {
            query.push(" AND unit_status = ");
            query.push_bind(unit_status);
        }
        if let Some(unit_type) = filter.unit_type {
            query.push(" AND unit_type = ");
            query.push_bind(unit_type);
        }
        if let Some(project_id) = filter.project_id {
            query.push(" AND project_id = ");
            query.push_bind(project_id);
        }

        query.push(format!(
            " ORDER BY {} {}",
            order.field.column(),
            order.direction.sql()
        ));
        query.push(" LIMIT ");
        query.push_bind(clamp_limit(page.limit));
        query.push(" OFFSET ");
        query.push_bind(clamp_offset(page.offset));

        query.build_query_as::<Unit>().fetch_all(executor).await
    }
}
