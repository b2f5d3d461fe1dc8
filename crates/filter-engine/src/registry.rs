//! Category name → filter schema lookup.
//!
//! Schemas are validated once, when they are registered. A schema that
//! reaches the registry is guaranteed to have unique keys and backward-only
//! dependencies, which is what lets the resolver work in a single pass and
//! never fail.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{FilterError, Result};
use crate::schema::CategoryFilterSchema;
use crate::state::GLOBAL_KEYS;

/// Serialized form of a registry: the category schemas in any order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryDocument {
    pub categories: Vec<CategoryFilterSchema>,
}

/// Lookup table from category key (the category's name) to its schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, CategoryFilterSchema>,
    empty: CategoryFilterSchema,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of schemas, rejecting the first bad one.
    pub fn with_schemas<I>(schemas: I) -> Result<Self>
    where
        I: IntoIterator<Item = CategoryFilterSchema>,
    {
        let mut registry = Self::new();
        for schema in schemas {
            registry.register(schema)?;
        }
        Ok(registry)
    }

    /// Parse and validate a JSON [`RegistryDocument`].
    ///
    /// # Errors
    /// Returns `FilterError::Json` for malformed JSON and the matching
    /// configuration error for the first invalid schema.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: RegistryDocument = serde_json::from_str(json)?;
        Self::with_schemas(document.categories)
    }

    /// Validate and add a schema.
    ///
    /// # Errors
    /// Returns a configuration error if the schema is invalid (see
    /// [`validate_schema`]) or its category is already registered.
    pub fn register(&mut self, schema: CategoryFilterSchema) -> Result<()> {
        if let Err(err) = validate_schema(&schema) {
            tracing::warn!(category = %schema.category_key, error = %err, "rejected filter schema");
            return Err(err);
        }
        if self.schemas.contains_key(&schema.category_key) {
            tracing::warn!(category = %schema.category_key, "category registered twice");
            return Err(FilterError::DuplicateCategory(schema.category_key));
        }
        tracing::debug!(
            category = %schema.category_key,
            fields = schema.fields.len(),
            "registered filter schema"
        );
        self.schemas.insert(schema.category_key.clone(), schema);
        Ok(())
    }

    /// Schema for a category name, or the empty schema when no category is
    /// selected or the name has no registered schema. Matching is exact and
    /// case-sensitive.
    pub fn resolve(&self, category_key: Option<&str>) -> &CategoryFilterSchema {
        category_key
            .and_then(|key| self.schemas.get(key))
            .unwrap_or(&self.empty)
    }

    pub fn contains(&self, category_key: &str) -> bool {
        self.schemas.contains_key(category_key)
    }

    /// Registered category keys, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Registered schemas as a document, sorted by category key.
    pub fn to_document(&self) -> RegistryDocument {
        let mut categories: Vec<CategoryFilterSchema> = self.schemas.values().cloned().collect();
        categories.sort_by(|a, b| a.category_key.cmp(&b.category_key));
        RegistryDocument { categories }
    }
}

/// Check a schema's structural rules.
///
/// - field keys are unique and do not collide with global filter keys;
/// - only select, multi-select and radio fields declare options;
/// - `depends_on` names a field declared earlier (not itself, not later);
/// - an options provider only reads fields declared earlier.
///
/// # Errors
/// Returns the configuration error for the first violated rule.
pub fn validate_schema(schema: &CategoryFilterSchema) -> Result<()> {
    let category = &schema.category_key;
    let mut seen: HashSet<&str> = HashSet::new();

    for (index, field) in schema.fields.iter().enumerate() {
        if seen.contains(field.key.as_str()) {
            return Err(FilterError::DuplicateField {
                category: category.clone(),
                field: field.key.clone(),
            });
        }
        if GLOBAL_KEYS.contains(&field.key.as_str()) {
            return Err(FilterError::ReservedKey {
                category: category.clone(),
                field: field.key.clone(),
            });
        }
        if !field.kind.takes_options()
            && (!field.options.is_empty() || field.options_provider.is_some())
        {
            return Err(FilterError::UnexpectedOptions {
                category: category.clone(),
                field: field.key.clone(),
                kind: field.kind.as_str(),
            });
        }

        if let Some(dependency) = &field.depends_on {
            if dependency.field == field.key {
                return Err(FilterError::SelfDependency {
                    category: category.clone(),
                    field: field.key.clone(),
                });
            }
            match schema.position(&dependency.field) {
                None => {
                    return Err(FilterError::UnknownDependency {
                        category: category.clone(),
                        field: field.key.clone(),
                        target: dependency.field.clone(),
                    })
                }
                Some(target) if target > index => {
                    return Err(FilterError::ForwardDependency {
                        category: category.clone(),
                        field: field.key.clone(),
                        target: dependency.field.clone(),
                    })
                }
                Some(_) => {}
            }
        }

        if let Some(provider) = &field.options_provider {
            if let Some(source) = provider.sources().into_iter().find(|s| !seen.contains(s)) {
                return Err(FilterError::UnknownOptionsSource {
                    category: category.clone(),
                    field: field.key.clone(),
                    source_field: source.to_string(),
                });
            }
        }

        seen.insert(field.key.as_str());
    }

    Ok(())
}
