//! A registry and a config bundled together, for callers that hold one of each.
//!
//! Every view that edits filters should go through one `FilterEngine` so the
//! schemas, dependency rules and reset policy are shared rather than copied.

use crate::catalog;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::normalize::{self, QueryDescriptor};
use crate::reducer::{self, Transition};
use crate::registry::SchemaRegistry;
use crate::resolver::{self, ResolvedField};
use crate::state::FilterState;

#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    registry: SchemaRegistry,
    config: EngineConfig,
}

impl FilterEngine {
    pub fn new(registry: SchemaRegistry, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    /// Engine over the built-in categories with the default config.
    ///
    /// # Errors
    /// Only if a built-in schema breaks a registration rule.
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(catalog::builtin_registry()?, EngineConfig::default()))
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn apply(&self, state: &FilterState, transition: &Transition) -> FilterState {
        reducer::apply(&self.registry, state, transition, self.config.reset_policy)
    }

    pub fn apply_all<'t, I>(&self, state: &FilterState, transitions: I) -> FilterState
    where
        I: IntoIterator<Item = &'t Transition>,
    {
        reducer::apply_all(&self.registry, state, transitions, self.config.reset_policy)
    }

    /// Fields to render for `state`, with their current options.
    pub fn visible_fields<'a>(&'a self, state: &FilterState) -> Vec<ResolvedField<'a>> {
        let schema = self.registry.resolve(state.category_key());
        resolver::visible_fields(schema, &state.category_filters)
    }

    pub fn normalize(&self, state: &FilterState) -> QueryDescriptor {
        normalize::normalize(state)
    }
}
