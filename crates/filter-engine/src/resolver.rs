//! Dependency resolution -- which fields are visible and which options they offer.
//!
//! Fields are walked once, in declaration order. Each field only looks at
//! siblings declared before it (registration guarantees this), and only at the
//! answers of siblings that are themselves visible and valid. The answers that
//! survive the walk are exactly the ones a second walk would keep, so pruning
//! reaches its fixed point in one pass.

use crate::schema::{CategoryFilterSchema, FieldOption, FilterFieldSchema};
use crate::value::{FieldValue, FieldValues, Scalar};

/// A visible field together with the options it offers right now.
#[derive(Debug, Clone)]
pub struct ResolvedField<'a> {
    pub field: &'a FilterFieldSchema,
    pub effective_options: Vec<FieldOption>,
}

impl ResolvedField<'_> {
    pub fn key(&self) -> &str {
        &self.field.key
    }
}

/// Outcome of one resolution pass.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    /// Visible fields in declaration order.
    pub visible: Vec<ResolvedField<'a>>,
    /// The input answers that are still valid.
    pub retained: FieldValues,
    /// Keys of input answers that were dropped, in declaration order, followed
    /// by keys the schema does not declare.
    pub pruned: Vec<String>,
}

/// Resolve `schema` against the current category answers.
pub fn resolve<'a>(schema: &'a CategoryFilterSchema, values: &FieldValues) -> Resolution<'a> {
    let mut retained = FieldValues::new();
    let mut visible = Vec::with_capacity(schema.fields.len());
    let mut pruned = Vec::new();

    for field in &schema.fields {
        let shown = field
            .depends_on
            .as_ref()
            .is_none_or(|dep| dep.predicate.evaluate(retained.get(&dep.field)));

        if !shown {
            if values.contains_key(&field.key) {
                pruned.push(field.key.clone());
            }
            continue;
        }

        let effective_options = match &field.options_provider {
            Some(provider) => provider.provide(&retained),
            None => field.options.clone(),
        };

        if let Some(value) = values.get(&field.key) {
            match retain_valid(field, value, &effective_options) {
                Some(kept) => {
                    retained.insert(field.key.clone(), kept);
                }
                None => pruned.push(field.key.clone()),
            }
        }

        visible.push(ResolvedField {
            field,
            effective_options,
        });
    }

    pruned.extend(
        values
            .keys()
            .filter(|key| schema.get(key).is_none())
            .cloned(),
    );

    Resolution {
        visible,
        retained,
        pruned,
    }
}

/// Visible fields of `schema` with their effective options.
pub fn visible_fields<'a>(
    schema: &'a CategoryFilterSchema,
    values: &FieldValues,
) -> Vec<ResolvedField<'a>> {
    resolve(schema, values).visible
}

/// The subset of `values` that is valid for `schema`.
pub fn prune(schema: &CategoryFilterSchema, values: &FieldValues) -> FieldValues {
    resolve(schema, values).retained
}

/// Keep a visible field's answer if it fits the field's current options.
///
/// Option lists only constrain choice kinds, and only when they are non-empty.
/// A list answer keeps its valid members in their original order, each once.
fn retain_valid(
    field: &FilterFieldSchema,
    value: &FieldValue,
    options: &[FieldOption],
) -> Option<FieldValue> {
    if value.is_empty() {
        return None;
    }
    let value = match value {
        FieldValue::List(items) => FieldValue::List(first_occurrences(items)),
        other => other.clone(),
    };
    if !field.kind.takes_options() || options.is_empty() {
        return Some(value);
    }
    let offered = |candidate: &Scalar| options.iter().any(|o| &o.value == candidate);
    match value {
        FieldValue::Scalar(s) => offered(&s).then_some(FieldValue::Scalar(s)),
        FieldValue::List(items) => {
            let kept: Vec<_> = items.into_iter().filter(|m| offered(m)).collect();
            (!kept.is_empty()).then_some(FieldValue::List(kept))
        }
        range @ FieldValue::Range(_) => Some(range),
    }
}

/// Drop repeated members, keeping the first occurrence of each.
fn first_occurrences(items: &[Scalar]) -> Vec<Scalar> {
    let mut unique: Vec<Scalar> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(item) {
            unique.push(item.clone());
        }
    }
    unique
}
