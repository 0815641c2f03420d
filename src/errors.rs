use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for household domain and settlement operations.
///
/// Every mutating operation validates completely before touching state, so a
/// returned error always means nothing changed.
#[derive(Error, Debug)]
pub enum HouseholdError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Not allowed: {0}")]
    Permission(String),
    #[error("Invalid state: {0}")]
    State(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = StdResult<T, HouseholdError>;
