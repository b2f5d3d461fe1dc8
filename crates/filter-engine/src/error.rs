//! Error types for filter-engine operations.
//!
//! Only two places in the crate can fail: registering a category schema and
//! parsing raw input at the UI boundary. Resolution, state transitions and
//! normalization are total.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Duplicate field '{field}' in category '{category}'")]
    DuplicateField { category: String, field: String },

    #[error("Field '{field}' in category '{category}' depends on undeclared field '{target}'")]
    UnknownDependency {
        category: String,
        field: String,
        target: String,
    },

    #[error("Field '{field}' in category '{category}' depends on '{target}', which is declared after it")]
    ForwardDependency {
        category: String,
        field: String,
        target: String,
    },

    #[error("Field '{field}' in category '{category}' depends on itself")]
    SelfDependency { category: String, field: String },

    #[error("Options for field '{field}' in category '{category}' read '{source_field}', which is not declared before it")]
    UnknownOptionsSource {
        category: String,
        field: String,
        source_field: String,
    },

    #[error("Category '{0}' is already registered")]
    DuplicateCategory(String),

    #[error("Field key '{field}' in category '{category}' collides with a global filter key")]
    ReservedKey { category: String, field: String },

    #[error("Field '{field}' in category '{category}' is {kind} and cannot declare options")]
    UnexpectedOptions {
        category: String,
        field: String,
        kind: &'static str,
    },

    #[error("Invalid input for {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("Minimum price {min} is greater than maximum price {max}")]
    InvertedPriceRange { min: f64, max: f64 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FilterError {
    /// True for errors raised while registering a schema.
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            FilterError::InvalidInput { .. }
                | FilterError::InvertedPriceRange { .. }
                | FilterError::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;
