//! Request handlers, one module per resource.

pub mod customer;
pub mod project;
pub mod unit;
