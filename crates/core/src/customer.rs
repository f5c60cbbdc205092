//! Customer entity and its validation rules.
//!
//! rut and email carry UNIQUE columns; the service layer translates
//! unique-violation errors from the driver into the same field-keyed
//! shape the rules here produce.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ValidationErrors;
use crate::types::{Id, Timestamp};

/// A customer row from the `customers` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Customer {
    pub id: Id,
    /// Chilean national ID, 8-9 characters, globally unique.
    pub rut: String,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: Timestamp,
}

impl Customer {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.lastname)
    }

    pub fn draft(&self) -> CustomerDraft {
        CustomerDraft {
            rut: self.rut.clone(),
            name: self.name.clone(),
            lastname: self.lastname.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// DTO for creating a new customer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomer {
    pub rut: String,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub phone: Option<String>,
}

/// DTO for partially updating a customer. Only supplied keys overwrite.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCustomer {
    pub rut: Option<String>,
    pub name: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Full proposed field set for a customer, validated before any write.
#[derive(Debug, Clone, Validate)]
pub struct CustomerDraft {
    #[validate(length(min = 8, max = 9, message = "must be between 8 and 9 characters"))]
    pub rut: String,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub lastname: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(equal = 12, message = "must be exactly 12 characters"))]
    pub phone: Option<String>,
}

impl From<CreateCustomer> for CustomerDraft {
    fn from(input: CreateCustomer) -> Self {
        Self {
            rut: input.rut,
            name: input.name,
            lastname: input.lastname,
            email: input.email,
            phone: input.phone,
        }
    }
}

impl CustomerDraft {
    /// Overlay a partial update; fields absent from the patch keep their
    /// current value.
    pub fn apply(mut self, patch: UpdateCustomer) -> Self {
        if let Some(rut) = patch.rut {
            self.rut = rut;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(lastname) = patch.lastname {
            self.lastname = lastname;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(phone);
        }
        self
    }

    /// Run the customer field rules and return the draft unchanged.
    pub fn validated(self) -> Result<Self, ValidationErrors> {
        match Validate::validate(&self) {
            Ok(()) => Ok(self),
            Err(source) => Err(source.into()),
        }
    }

    /// Materialize the validated draft into a persistable record.
    pub fn into_customer(self, id: Id, created_at: Timestamp) -> Customer {
        Customer {
            id,
            rut: self.rut,
            name: self.name,
            lastname: self.lastname,
            email: self.email,
            phone: self.phone,
            created_at,
        }
    }
}
