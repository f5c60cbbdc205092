//! Explicit sort keys for list queries.
//!
//! Callers pass an `(filter, ordering)` pair into every list call; there is
//! no ambient query state. The wire convention follows the original API:
//! `field` sorts ascending, `-field` descending.

use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// A sortable column paired with a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering<F> {
    pub field: F,
    pub direction: Direction,
}

impl<F> Ordering<F> {
    pub const fn new(field: F, direction: Direction) -> Self {
        Self { field, direction }
    }
}

/// Default order is newest-created first.
impl<F: Default> Default for Ordering<F> {
    fn default() -> Self {
        Self::new(F::default(), Direction::Desc)
    }
}

/// Parse a `field` / `-field` ordering expression against a closed column
/// set. Returns `None` for columns the entity does not allow sorting on.
pub fn parse_ordering<F: FromStr>(raw: &str) -> Option<Ordering<F>> {
    let (direction, name) = match raw.strip_prefix('-') {
        Some(name) => (Direction::Desc, name),
        None => (Direction::Asc, raw),
    };
    F::from_str(name)
        .ok()
        .map(|field| Ordering::new(field, direction))
}
