//! # filter-engine
//!
//! Category-dependent filter composition for a listings catalog.
//!
//! Given a chosen category, the engine decides which filter fields exist,
//! which of them are currently visible (fields can depend on the answers to
//! earlier fields), keeps one canonical [`FilterState`], and flattens it into a
//! deterministic [`QueryDescriptor`] for the search backend.
//!
//! ## Quick start
//!
//! ```rust
//! use filter_engine::catalog::{builtin_registry, ELECTRONICS};
//! use filter_engine::{normalize, reducer, Category, FieldValue, FilterState};
//!
//! let registry = builtin_registry().unwrap();
//! let state = reducer::change_category(
//!     &registry,
//!     &FilterState::default(),
//!     Some(Category::new(7, ELECTRONICS)),
//! );
//! let state = reducer::set_category_field(
//!     &registry,
//!     &state,
//!     "deviceType",
//!     Some(FieldValue::text("smartphones")),
//! );
//! let state = reducer::set_category_field(&registry, &state, "screenSize", Some("6in".into()));
//!
//! // Switching to laptops hides screenSize, so its answer is dropped.
//! let state = reducer::set_category_field(&registry, &state, "deviceType", Some("laptops".into()));
//! assert!(state.category_value("screenSize").is_none());
//!
//! let query = normalize(&state);
//! assert_eq!(query.to_query_string(), "category=7&cf.deviceType=laptops");
//! ```
//!
//! ## Modules
//!
//! - [`schema`]: field and category schema declarations
//! - [`registry`]: category name → schema lookup, validated at registration
//! - [`resolver`]: visible fields, effective options, pruning
//! - [`state`]: `FilterState` and the global criteria
//! - [`reducer`]: pure state transitions
//! - [`normalize`]: `FilterState` → `QueryDescriptor`
//! - [`input`]: parsing raw UI input at the boundary
//! - [`catalog`]: built-in category schemas
//! - [`config`], [`engine`]: policy and the registry/config bundle
//! - [`error`]: error types

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod normalize;
pub mod reducer;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod state;
pub mod value;

pub use config::EngineConfig;
pub use engine::FilterEngine;
pub use error::FilterError;
pub use normalize::{normalize, QueryDescriptor, QueryValue};
pub use reducer::{ResetPolicy, Transition};
pub use registry::SchemaRegistry;
pub use resolver::{visible_fields, ResolvedField};
pub use schema::{CategoryFilterSchema, FieldKind, FieldOption, FilterFieldSchema, Predicate};
pub use state::{Category, FilterState, GlobalField};
pub use value::{FieldValue, FieldValues, NumericRange, Scalar};
