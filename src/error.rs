use thiserror::Error;

/// Rejections raised at the entry boundary before anything is written
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    #[error("a {entity} named '{name}' already exists")]
    DuplicateName { entity: &'static str, name: String },

    #[error("{0} is required")]
    MissingReference(&'static str),

    #[error("value must be a positive amount")]
    NonPositiveValue,

    #[error("planned quantity must be a positive integer")]
    NonPositiveQuantity,

    #[error("a lot needs at least one item")]
    EmptyLot,

    #[error("value {0} appears more than once in the lot")]
    DuplicateLotValue(String),
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
