//! Domain entities and the validation engine for the ladrillo backend.
//!
//! Pure logic, no database access. The db crate persists these types and
//! runs the drafts defined here before every write.

pub mod customer;
pub mod error;
pub mod project;
pub mod types;
pub mod unit;
