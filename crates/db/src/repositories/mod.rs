//! Per-entity repositories over the SQLite pool.
//!
//! Repository functions take any `SqliteExecutor` so services can run them
//! either directly against the pool or inside a transaction.

pub mod customer_repo;
pub mod project_repo;
pub mod unit_repo;

pub use customer_repo::CustomerRepo;
pub use project_repo::ProjectRepo;
pub use unit_repo::UnitRepo;
