//! Declarative filter schemas.
//!
//! A [`FilterFieldSchema`] describes one filter control: its kind, its static
//! options, an optional visibility rule that looks at an earlier sibling, and
//! an optional options provider that derives the option list from earlier
//! siblings. A [`CategoryFilterSchema`] is the ordered field list for one
//! category. Per-category branching lives here as data, not as conditionals in
//! the views.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::value::{FieldValue, FieldValues, Scalar};

/// The kind of control a field renders as, which also fixes its value shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    SingleSelect,
    MultiSelect,
    NumericRange,
    Boolean,
    FreeText,
    Radio,
}

impl FieldKind {
    /// Whether the kind chooses from an option list.
    pub fn takes_options(self) -> bool {
        matches!(
            self,
            FieldKind::SingleSelect | FieldKind::MultiSelect | FieldKind::Radio
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::SingleSelect => "single-select",
            FieldKind::MultiSelect => "multi-select",
            FieldKind::NumericRange => "numeric-range",
            FieldKind::Boolean => "boolean",
            FieldKind::FreeText => "free-text",
            FieldKind::Radio => "radio",
        }
    }
}

/// One selectable option. `label_key` is an opaque translation token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOption {
    pub value: Scalar,
    pub label_key: String,
}

impl FieldOption {
    pub fn new(value: impl Into<Scalar>, label_key: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label_key: label_key.into(),
        }
    }
}

/// A visibility test applied to the current value of a sibling field.
///
/// Every predicate is false when the sibling is unset, so a dependent field
/// stays hidden until its parent has been answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Predicate {
    /// The sibling equals `value` (for lists: contains it).
    Equals { value: Scalar },
    /// The sibling is one of `values` (for lists: shares a member with them).
    OneOf { values: Vec<Scalar> },
    /// The sibling is set and none of its members is in `values`.
    NotOneOf { values: Vec<Scalar> },
    /// The sibling has any value.
    IsSet,
    /// The sibling is the boolean `true`.
    IsTrue,
}

impl Predicate {
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        Predicate::OneOf {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn equals(value: impl Into<Scalar>) -> Self {
        Predicate::Equals {
            value: value.into(),
        }
    }

    pub fn evaluate(&self, sibling: Option<&FieldValue>) -> bool {
        let Some(value) = sibling.filter(|v| !v.is_empty()) else {
            return false;
        };
        match self {
            Predicate::Equals { value: expected } => value.matches(expected),
            Predicate::OneOf { values } => values.iter().any(|v| value.matches(v)),
            Predicate::NotOneOf { values } => !values.iter().any(|v| value.matches(v)),
            Predicate::IsSet => true,
            Predicate::IsTrue => matches!(value, FieldValue::Scalar(Scalar::Bool(true))),
        }
    }
}

/// Visibility rule: the owning field is shown only while `predicate` holds
/// for the current value of the earlier sibling `field`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub field: String,
    pub predicate: Predicate,
}

type OptionsFn = dyn Fn(&FieldValues) -> Vec<FieldOption> + Send + Sync;

/// A programmatic options provider.
///
/// `sources` names the siblings the closure reads; registration checks that
/// they are declared before the owning field.
#[derive(Clone)]
pub struct CustomOptions {
    pub sources: Vec<String>,
    func: Arc<OptionsFn>,
}

impl CustomOptions {
    pub fn new<F>(sources: &[&str], func: F) -> Self
    where
        F: Fn(&FieldValues) -> Vec<FieldOption> + Send + Sync + 'static,
    {
        Self {
            sources: sources.iter().map(|s| s.to_string()).collect(),
            func: Arc::new(func),
        }
    }
}

impl fmt::Debug for CustomOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomOptions")
            .field("sources", &self.sources)
            .finish_non_exhaustive()
    }
}

/// Derives a field's options from the values of earlier siblings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OptionsProvider {
    /// Options looked up by the sibling's value. A multi-select sibling gets
    /// the union of the tables for each chosen member, in member order. An
    /// unset sibling, or a value with no table, gets `fallback`.
    ByValue {
        field: String,
        options: BTreeMap<String, Vec<FieldOption>>,
        #[serde(default)]
        fallback: Vec<FieldOption>,
    },
    #[serde(skip)]
    Custom(CustomOptions),
}

impl OptionsProvider {
    pub fn by_value(field: impl Into<String>) -> Self {
        OptionsProvider::ByValue {
            field: field.into(),
            options: BTreeMap::new(),
            fallback: Vec::new(),
        }
    }

    /// Add a table entry to a `ByValue` provider. No-op for `Custom`.
    pub fn when(mut self, sibling_value: &str, entries: Vec<FieldOption>) -> Self {
        if let OptionsProvider::ByValue { options, .. } = &mut self {
            options.insert(sibling_value.to_string(), entries);
        }
        self
    }

    /// Sibling keys the provider reads.
    pub fn sources(&self) -> Vec<&str> {
        match self {
            OptionsProvider::ByValue { field, .. } => vec![field.as_str()],
            OptionsProvider::Custom(custom) => custom.sources.iter().map(String::as_str).collect(),
        }
    }

    pub fn provide(&self, siblings: &FieldValues) -> Vec<FieldOption> {
        match self {
            OptionsProvider::ByValue {
                field,
                options,
                fallback,
            } => match siblings.get(field) {
                Some(FieldValue::Scalar(s)) => options
                    .get(&s.to_string())
                    .cloned()
                    .unwrap_or_else(|| fallback.clone()),
                Some(FieldValue::List(members)) if !members.is_empty() => {
                    let mut merged: Vec<FieldOption> = Vec::new();
                    for member in members {
                        for option in options.get(&member.to_string()).into_iter().flatten() {
                            if !merged.iter().any(|o| o.value == option.value) {
                                merged.push(option.clone());
                            }
                        }
                    }
                    merged
                }
                _ => fallback.clone(),
            },
            OptionsProvider::Custom(custom) => (custom.func)(siblings),
        }
    }
}

/// Declaration of one filter field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterFieldSchema {
    pub key: String,
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Dependency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_provider: Option<OptionsProvider>,
}

impl FilterFieldSchema {
    pub fn new(key: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            kind,
            options: Vec::new(),
            depends_on: None,
            options_provider: None,
        }
    }

    pub fn single_select(key: impl Into<String>) -> Self {
        Self::new(key, FieldKind::SingleSelect)
    }

    pub fn multi_select(key: impl Into<String>) -> Self {
        Self::new(key, FieldKind::MultiSelect)
    }

    pub fn radio(key: impl Into<String>) -> Self {
        Self::new(key, FieldKind::Radio)
    }

    pub fn numeric_range(key: impl Into<String>) -> Self {
        Self::new(key, FieldKind::NumericRange)
    }

    pub fn boolean(key: impl Into<String>) -> Self {
        Self::new(key, FieldKind::Boolean)
    }

    pub fn free_text(key: impl Into<String>) -> Self {
        Self::new(key, FieldKind::FreeText)
    }

    /// Append a static option.
    pub fn option(mut self, value: impl Into<Scalar>, label_key: impl Into<String>) -> Self {
        self.options.push(FieldOption::new(value, label_key));
        self
    }

    /// Append static options whose label key is `<prefix>.<value>`.
    pub fn options_labelled(mut self, prefix: &str, values: &[&str]) -> Self {
        self.options.extend(
            values
                .iter()
                .map(|v| FieldOption::new(*v, format!("{}.{}", prefix, v))),
        );
        self
    }

    pub fn depends_on(mut self, field: impl Into<String>, predicate: Predicate) -> Self {
        self.depends_on = Some(Dependency {
            field: field.into(),
            predicate,
        });
        self
    }

    pub fn options_from(mut self, provider: OptionsProvider) -> Self {
        self.options_provider = Some(provider);
        self
    }
}

/// The ordered field list of one category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFilterSchema {
    pub category_key: String,
    #[serde(default)]
    pub fields: Vec<FilterFieldSchema>,
}

impl CategoryFilterSchema {
    pub fn new(category_key: impl Into<String>) -> Self {
        Self {
            category_key: category_key.into(),
            fields: Vec::new(),
        }
    }

    /// Schema with no category-specific fields; only global criteria apply.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: FilterFieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FilterFieldSchema> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
