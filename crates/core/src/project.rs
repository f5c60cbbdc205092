//! Project entity, lifecycle status, and its validation rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ValidationErrors;
use crate::types::{Id, Timestamp};

/// Lifecycle status of a construction project.
///
/// Wire and storage labels keep the original spellings ("Off Plan",
/// "Under Construction").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum ProjectStatus {
    #[default]
    #[serde(rename = "Off Plan")]
    #[sqlx(rename = "Off Plan")]
    OffPlan,
    #[serde(rename = "Under Construction")]
    #[sqlx(rename = "Under Construction")]
    UnderConstruction,
    Finished,
    Sold,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::OffPlan => "Off Plan",
            ProjectStatus::UnderConstruction => "Under Construction",
            ProjectStatus::Finished => "Finished",
            ProjectStatus::Sold => "Sold",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A project row from the `projects` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Project {
    pub id: Id,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub started_at: NaiveDate,
    pub finished_at: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub created_at: Timestamp,
}

impl Project {
    pub fn display_name(&self) -> &str {
        &self.name
    }

    /// Full proposed field set for this record, used as the base of a
    /// partial update.
    pub fn draft(&self) -> ProjectDraft {
        ProjectDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            address: self.address.clone(),
            started_at: self.started_at,
            finished_at: self.finished_at,
            status: Some(self.status),
        }
    }
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub started_at: NaiveDate,
    pub finished_at: Option<NaiveDate>,
    /// Defaults to "Off Plan" if omitted.
    pub status: Option<ProjectStatus>,
}

/// DTO for partially updating a project. Only supplied keys overwrite.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub started_at: Option<NaiveDate>,
    pub finished_at: Option<NaiveDate>,
    pub status: Option<ProjectStatus>,
}

/// Full proposed field set for a project, validated before any write.
#[derive(Debug, Clone, Validate)]
pub struct ProjectDraft {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub address: String,
    pub started_at: NaiveDate,
    pub finished_at: Option<NaiveDate>,
    pub status: Option<ProjectStatus>,
}

impl From<CreateProject> for ProjectDraft {
    fn from(input: CreateProject) -> Self {
        Self {
            name: input.name,
            description: input.description,
            address: input.address,
            started_at: input.started_at,
            finished_at: input.finished_at,
            status: input.status,
        }
    }
}

impl ProjectDraft {
    /// Overlay a partial update; fields absent from the patch keep their
    /// current value.
    pub fn apply(mut self, patch: UpdateProject) -> Self {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(started_at) = patch.started_at {
            self.started_at = started_at;
        }
        if let Some(finished_at) = patch.finished_at {
            self.finished_at = Some(finished_at);
        }
        if let Some(status) = patch.status {
            self.status = Some(status);
        }
        self
    }

    /// Run the project rules and return the normalized draft.
    ///
    /// Rule order is load-bearing: the finished_at coercion runs before
    /// the Finished check, so a payload carrying only finished_at is
    /// auto-promoted while status=Finished without a date is rejected.
    pub fn validated(mut self) -> Result<Self, ValidationErrors> {
        if self.finished_at.is_some() && self.status != Some(ProjectStatus::Finished) {
            self.status = Some(ProjectStatus::Finished);
        }

        let mut errors = match Validate::validate(&self) {
            Ok(()) => ValidationErrors::new(),
            Err(source) => source.into(),
        };

        if self.status == Some(ProjectStatus::Finished) && self.finished_at.is_none() {
            errors.add(
                "finished_at",
                "cannot be Finished without a finished_at date",
            );
        }

        errors.into_result()?;
        Ok(self)
    }

    /// Materialize the validated draft into a persistable record.
    pub fn into_project(self, id: Id, created_at: Timestamp) -> Project {
        Project {
            id,
            name: self.name,
            description: self.description,
            address: self.address,
            started_at: self.started_at,
            finished_at: self.finished_at,
            status: self.status.unwrap_or_default(),
            created_at,
        }
    }
}
