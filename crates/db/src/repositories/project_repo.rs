//! Repository for the `projects` table.

use std::str::FromStr;

use chrono::NaiveDate;
use ladrillo_core::project::{Project, ProjectStatus};
use ladrillo_core::types::Id;
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};

use crate::ordering::Ordering;
use crate::pagination::{clamp_limit, clamp_offset, Page};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, address, started_at, finished_at, status, created_at";

/// Optional filters for project listings.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// Case-insensitive substring match.
    pub name: Option<String>,
    /// Case-insensitive substring match.
    pub address: Option<String>,
    pub status: Option<ProjectStatus>,
    /// Inclusive lower bound on started_at.
    pub started_after: Option<NaiveDate>,
    /// Inclusive upper bound on started_at.
    pub started_before: Option<NaiveDate>,
}

/// Sortable columns for project listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectOrder {
    #[default]
    CreatedAt,
    StartedAt,
    FinishedAt,
}

impl ProjectOrder {
    fn column(self) -> &'static str {
        match self {
            ProjectOrder::CreatedAt => "created_at",
            ProjectOrder::StartedAt => "started_at",
            ProjectOrder::FinishedAt => "finished_at",
        }
    }
}

impl FromStr for ProjectOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(ProjectOrder::CreatedAt),
            "started_at" => Ok(ProjectOrder::StartedAt),
            "finished_at" => Ok(ProjectOrder::FinishedAt),
            _ => Err(()),
        }
    }
}

/// CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a fully-materialized project row.
    pub async fn insert(
        executor: impl SqliteExecutor<'_>,
        project: &Project,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO projects (id, name, description, address, started_at, finished_at, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.address)
        .bind(project.started_at)
        .bind(project.finished_at)
        .bind(project.status)
        .bind(project.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn find_by_id(
        executor: impl SqliteExecutor<'_>,
        id: Id,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = ?");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn exists(executor: impl SqliteExecutor<'_>, id: Id) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM projects WHERE id = ?)")
            .bind(id)
            .fetch_one(executor)
            .await
    }

    /// Replace every mutable column. Returns `false` if no row matched.
    pub async fn update(
        executor: impl SqliteExecutor<'_>,
        project: &Project,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects
             SET name = ?, description = ?, address = ?, started_at = ?, finished_at = ?, status = ?
             WHERE id = ?",
        )
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.address)
        .bind(project.started_at)
        .bind(project.finished_at)
        .bind(project.status)
        .bind(project.id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a project by ID. Returns `true` if a row was removed.
    pub async fn delete(executor: impl SqliteExecutor<'_>, id: Id) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List projects matching `filter`, sorted per `order`, paginated.
    pub async fn list(
        executor: impl SqliteExecutor<'_>,
        filter: &ProjectFilter,
        order: Ordering<ProjectOrder>,
        page: Page,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let mut query =
            QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM projects WHERE 1 = 1"));

        if let Some(name) = &filter.name {
            query.push(" AND instr(lower(name), lower(");
            query.push_bind(name);
            query.push(")) > 0");
        }
        if let Some(address) = &filter.address {
            query.push(" AND instr(lower(address), lower(");
            query.push_bind(address);
            query.push(")) > 0");
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ");
            query.push_bind(status);
        }
        if let Some(after) = filter.started_after {
            query.push(" AND started_at >= ");
            query.push_bind(after);
        }
        if let Some(before) = filter.started_before {
            query.push(" AND started_at <= ");
            query.push_bind(before);
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
            .build_query_as::<Project>()
            .fetch_all(executor)
            .await
    }
}
