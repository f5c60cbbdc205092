//! Repository for the `customers` table.
//!
//! rut and email carry UNIQUE indexes (`uq_customers_rut`,
//! `uq_customers_email`); insert and update surface violations as driver
//! errors which the service layer maps back to field names.

use std::str::FromStr;

use ladrillo_core::customer::Customer;
use ladrillo_core::types::Id;
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};

use crate::ordering::Ordering;
use crate::pagination::{clamp_limit, clamp_offset, Page};

const COLUMNS: &str = "id, rut, name, lastname, email, phone, created_at";

/// Optional filters for customer listings.
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    /// Exact match.
    pub rut: Option<String>,
    /// Exact match.
    pub email: Option<String>,
    /// Exact match.
    pub phone: Option<String>,
    /// Case-insensitive substring match.
    pub name: Option<String>,
    /// Case-insensitive substring match.
    pub lastname: Option<String>,
}

/// Sortable columns for customer listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CustomerOrder {
    #[default]
    CreatedAt,
}

impl CustomerOrder {
    fn column(self) -> &'static str {
        match self {
            CustomerOrder::CreatedAt => "created_at",
        }
    }
}

impl FromStr for CustomerOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(CustomerOrder::CreatedAt),
            _ => Err(()),
        }
    }
}

/// CRUD operations for customers.
pub struct CustomerRepo;

impl CustomerRepo {
    /// Insert a fully-materialized customer row.
    pub async fn insert(
        executor: impl SqliteExecutor<'_>,
        customer: &Customer,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO customers (id, rut, name, lastname, email, phone, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(customer.id)
        .bind(&customer.rut)
        .bind(&customer.name)
        .bind(&customer.lastname)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(customer.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn find_by_id(
        executor: impl SqliteExecutor<'_>,
        id: Id,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE id = ?");
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn exists(executor: impl SqliteExecutor<'_>, id: Id) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM customers WHERE id = ?)")
            .bind(id)
            .fetch_one(executor)
            .await
    }

    /// Replace every mutable column. Returns `false` if no row matched.
    pub async fn update(
        executor: impl SqliteExecutor<'_>,
        customer: &Customer,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE customers
             SET rut = ?, name = ?, lastname = ?, email = ?, phone = ?
             WHERE id = ?",
        )
        .bind(&customer.rut)
        .bind(&customer.name)
        .bind(&customer.lastname)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(customer.id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a customer by ID. Returns `true` if a row was removed.
    pub async fn delete(executor: impl SqliteExecutor<'_>, id: Id) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List customers matching `filter`, sorted per `order`, paginated.
    pub async fn list(
        executor: impl SqliteExecutor<'_>,
        filter: &CustomerFilter,
        order: Ordering<CustomerOrder>,
        page: Page,
    ) -> Result<Vec<Customer>, sqlx::Error> {
        let mut query =
            QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM customers WHERE 1 = 1"));

        if let Some(rut) = &filter.rut {
            query.push(" AND rut = ");
            query.push_bind(rut);
        }
        if let Some(email) = &filter.email {
            query.push(" AND email = ");
            query.push_bind(email);
        }
        if let Some(phone) = &filter.phone {
            query.push(" AND phone = ");
            query.push_bind(phone);
        }
        if let Some(name) = &filter.name {
            query.push(" AND instr(lower(name), lower(");
            query.push_bind(name);
            query.push(")) > 0");
        }
        if let Some(lastname) = &filter.lastname {
            query.push(" AND instr(lower(lastname), lower(");
            query.push_bind(lastname);
            query.push(")) > 0");
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

        query
            .build_query_as::<Customer>()
            .fetch_all(executor)
            .await
    }
}
