//! Unit entity, sale status, and the customer/status consistency rules.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ValidationErrors;
use crate::project::Project;
use crate::types::{Id, Timestamp};

/// Sale status of a sellable unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum UnitStatus {
    #[default]
    Available,
    Sold,
    Reserved,
}

impl UnitStatus {
    /// Whether this status requires a customer to be attached.
    pub fn requires_customer(self) -> bool {
        matches!(self, UnitStatus::Sold | UnitStatus::Reserved)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnitStatus::Available => "Available",
            UnitStatus::Sold => "Sold",
            UnitStatus::Reserved => "Reserved",
        }
    }
}

impl std::fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of sellable unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum UnitType {
    Apartment,
    House,
    Office,
    Commercial,
}

/// A unit row from the `units` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Unit {
    pub id: Id,
    /// Owning project; units are deleted with it.
    pub project_id: Id,
    /// Reserving or purchasing customer; cleared when the customer is
    /// deleted.
    pub customer_id: Option<Id>,
    pub unit_number: String,
    pub unit_type: UnitType,
    pub square_meters: f64,
    /// Whole number in the currency's minor-unit-free form.
    pub price: i64,
    pub reservation_deposit: i64,
    pub unit_status: UnitStatus,
    pub created_at: Timestamp,
}

impl Unit {
    /// Requires the owning project to be loaded.
    pub fn display_name(&self, project: &Project) -> String {
        format!("Unit {} - {}", self.unit_number, project.name)
    }

    pub fn draft(&self) -> UnitDraft {
        UnitDraft {
            project_id: self.project_id,
            customer_id: self.customer_id,
            unit_number: self.unit_number.clone(),
            unit_type: self.unit_type,
            square_meters: self.square_meters,
            price: self.price,
            reservation_deposit: Some(self.reservation_deposit),
            unit_status: Some(self.unit_status),
        }
    }
}

/// DTO for creating a new unit.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUnit {
    pub project_id: Id,
    pub customer_id: Option<Id>,
    pub unit_number: String,
    pub unit_type: UnitType,
    pub square_meters: f64,
    pub price: i64,
    /// Defaults to 0 if omitted.
    pub reservation_deposit: Option<i64>,
    /// Defaults to "Available" if omitted.
    pub unit_status: Option<UnitStatus>,
}

/// DTO for partially updating a unit. Only supplied keys overwrite.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUnit {
    pub project_id: Option<Id>,
    pub customer_id: Option<Id>,
    pub unit_number: Option<String>,
    pub unit_type: Option<UnitType>,
    pub square_meters: Option<f64>,
    pub price: Option<i64>,
    pub reservation_deposit: Option<i64>,
    pub unit_status: Option<UnitStatus>,
}

/// Full proposed field set for a unit, validated before any write.
#[derive(Debug, Clone, Validate)]
pub struct UnitDraft {
    pub project_id: Id,
    pub customer_id: Option<Id>,
    #[validate(length(min = 1, max = 10, message = "must be between 1 and 10 characters"))]
    pub unit_number: String,
    pub unit_type: UnitType,
    #[validate(range(min = 0.01, max = 999.99, message = "must be between 0.01 and 999.99"))]
    pub square_meters: f64,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub price: i64,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub reservation_deposit: Option<i64>,
    pub unit_status: Option<UnitStatus>,
}

impl From<CreateUnit> for UnitDraft {
    fn from(input: CreateUnit) -> Self {
        Self {
            project_id: input.project_id,
            customer_id: input.customer_id,
            unit_number: input.unit_number,
            unit_type: input.unit_type,
            square_meters: input.square_meters,
            price: input.price,
            reservation_deposit: input.reservation_deposit,
            unit_status: input.unit_status,
        }
    }
}

impl UnitDraft {
    /// Overlay a partial update; fields absent from the patch keep their
    /// current value.
    pub fn apply(mut self, patch: UpdateUnit) -> Self {
        if let Some(project_id) = patch.project_id {
            self.project_id = project_id;
        }
        if let Some(customer_id) = patch.customer_id {
            self.customer_id = Some(customer_id);
        }
        if let Some(unit_number) = patch.unit_number {
            self.unit_number = unit_number;
        }
        if let Some(unit_type) = patch.unit_type {
            self.unit_type = unit_type;
        }
        if let Some(square_meters) = patch.square_meters {
            self.square_meters = square_meters;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(reservation_deposit) = patch.reservation_deposit {
            self.reservation_deposit = Some(reservation_deposit);
        }
        if let Some(unit_status) = patch.unit_status {
            self.unit_status = Some(unit_status);
        }
        self
    }

    /// Run the unit rules and return the draft unchanged.
    ///
    /// The customer/status invariant is checked as two independently
    /// triggerable rules so the error points at whichever field the
    /// caller omitted or mis-set.
    pub fn validated(self) -> Result<Self, ValidationErrors> {
        let mut errors = match Validate::validate(&self) {
            Ok(()) => ValidationErrors::new(),
            Err(source) => source.into(),
        };

        if !has_two_decimal_places(self.square_meters) {
            errors.add("square_meters", "must have at most 2 decimal places");
        }

        let status = self.unit_status.unwrap_or_default();
        if status.requires_customer() && self.customer_id.is_none() {
            errors.add(
                "customer_id",
                "a unit with status 'Sold' or 'Reserved' must have a customer attached",
            );
        }
        if self.customer_id.is_some() && !status.requires_customer() {
            errors.add(
                "unit_status",
                "a unit with a customer attached can only have status 'Sold' or 'Reserved'",
            );
        }

        errors.into_result()?;
        Ok(self)
    }

    /// Materialize the validated draft into a persistable record.
    pub fn into_unit(self, id: Id, created_at: Timestamp) -> Unit {
        Unit {
            id,
            project_id: self.project_id,
            customer_id: self.customer_id,
            unit_number: self.unit_number,
            unit_type: self.unit_type,
            square_meters: self.square_meters,
            price: self.price,
            reservation_deposit: self.reservation_deposit.unwrap_or(0),
            unit_status: self.unit_status.unwrap_or_default(),
            created_at,
        }
    }
}

/// Scale check for square_meters; tolerates float representation noise.
fn has_two_decimal_places(value: f64) -> bool {
    let scaled = value * 100.0;
    (scaled - scaled.round()).abs() < 1e-6
}
