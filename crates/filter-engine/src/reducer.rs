//! Filter state transitions.
//!
//! Every function here is pure and total: it borrows the current state and
//! returns the next one. After any transition the category answers satisfy
//! two rules: no key for a field the resolver would hide, and no empty value.

use serde::{Deserialize, Serialize};

use crate::registry::SchemaRegistry;
use crate::resolver;
use crate::schema::{CategoryFilterSchema, FieldKind};
use crate::state::{Category, FilterState, GlobalField, DELIVERY_OPTIONS_KEY};
use crate::value::{FieldValue, FieldValues, Scalar};

/// What "reset all" does with the selected category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResetPolicy {
    /// Keep the category, clear everything else.
    #[default]
    PreserveCategory,
    /// Return to the all-default state.
    ClearCategory,
}

/// A UI event, as a value. Useful for replaying or logging edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Transition {
    SetGlobal(GlobalField),
    ChangeCategory {
        category: Option<Category>,
    },
    SetCategoryField {
        key: String,
        #[serde(default)]
        value: Option<FieldValue>,
    },
    ToggleArrayMember {
        key: String,
        member: Scalar,
    },
    ResetCategoryFilters,
    ResetAll,
}

/// Apply one transition.
pub fn apply(
    registry: &SchemaRegistry,
    state: &FilterState,
    transition: &Transition,
    policy: ResetPolicy,
) -> FilterState {
    match transition {
        Transition::SetGlobal(field) => set_global_field(registry, state, field.clone()),
        Transition::ChangeCategory { category } => {
            change_category(registry, state, category.clone())
        }
        Transition::SetCategoryField { key, value } => {
            set_category_field(registry, state, key, value.clone())
        }
        Transition::ToggleArrayMember { key, member } => {
            toggle_array_member(registry, state, key, member.clone())
        }
        Transition::ResetCategoryFilters => reset_category_filters(state),
        Transition::ResetAll => reset_all(state, policy),
    }
}

/// Apply a sequence of transitions, left to right. The last write wins.
pub fn apply_all<'t, I>(
    registry: &SchemaRegistry,
    initial: &FilterState,
    transitions: I,
    policy: ResetPolicy,
) -> FilterState
where
    I: IntoIterator<Item = &'t Transition>,
{
    transitions
        .into_iter()
        .fold(initial.clone(), |state, t| apply(registry, &state, t, policy))
}

/// Replace one global criterion. Setting the category switches category.
pub fn set_global_field(
    registry: &SchemaRegistry,
    state: &FilterState,
    field: GlobalField,
) -> FilterState {
    let mut next = state.clone();
    match field {
        GlobalField::Category(category) => return change_category(registry, state, category),
        GlobalField::MinPrice(v) => next.min_price = v,
        GlobalField::MaxPrice(v) => next.max_price = v,
        GlobalField::Location(v) => next.location = v.filter(|s| !s.trim().is_empty()),
        GlobalField::DatePosted(v) => next.date_posted = v,
        GlobalField::SortBy(v) => next.sort_by = v,
        GlobalField::Condition(v) => next.condition = v,
        GlobalField::DeliveryOptions(v) => {
            let mut options: Vec<String> = Vec::with_capacity(v.len());
            for option in v {
                if !option.trim().is_empty() && !options.contains(&option) {
                    options.push(option);
                }
            }
            next.delivery_options = options;
        }
        GlobalField::SellerType(v) => next.seller_type = v,
    }
    next
}

/// Select a category (or none). All category answers are discarded, whatever
/// the new category is.
pub fn change_category(
    registry: &SchemaRegistry,
    state: &FilterState,
    category: Option<Category>,
) -> FilterState {
    let mut next = state.clone();
    next.category = category;
    next.category_filters = FieldValues::new();

    // Resolved only to report what the new category starts with; an empty
    // answer map has nothing to prune.
    let schema = registry.resolve(next.category_key());
    let visible = resolver::visible_fields(schema, &next.category_filters);
    tracing::debug!(
        category = next.category_key().unwrap_or("<none>"),
        visible_fields = visible.len(),
        discarded = state.category_filters.len(),
        "changed category"
    );
    next
}

/// Write (or clear) one category answer, then prune answers that the write
/// made invalid.
///
/// An empty value clears the key. A key the selected category does not
/// declare is ignored.
pub fn set_category_field(
    registry: &SchemaRegistry,
    state: &FilterState,
    key: &str,
    value: Option<FieldValue>,
) -> FilterState {
    let schema = registry.resolve(state.category_key());
    if schema.get(key).is_none() {
        tracing::debug!(field = key, "ignoring write to undeclared field");
        return state.clone();
    }

    let mut values = state.category_filters.clone();
    match value.filter(|v| !v.is_empty()) {
        Some(v) => {
            values.insert(key.to_string(), v);
        }
        None => {
            values.remove(key);
        }
    }

    let mut next = state.clone();
    next.category_filters = settle(schema, &values);
    next
}

/// Add `member` to a multi-value field, or remove it if already present.
///
/// Works on multi-select category fields and on the global
/// `deliveryOptions`. Members keep the order they were added in; removing the
/// last member clears the key. Any other key, and a blank delivery option,
/// leaves the state unchanged.
pub fn toggle_array_member(
    registry: &SchemaRegistry,
    state: &FilterState,
    key: &str,
    member: Scalar,
) -> FilterState {
    if key == DELIVERY_OPTIONS_KEY {
        let option = match member {
            Scalar::Text(option) if !option.trim().is_empty() => option,
            _ => return state.clone(),
        };
        let mut next = state.clone();
        toggle(&mut next.delivery_options, option);
        return next;
    }

    let schema = registry.resolve(state.category_key());
    match schema.get(key) {
        Some(field) if field.kind == FieldKind::MultiSelect => {}
        _ => {
            tracing::debug!(field = key, "ignoring toggle on non multi-select field");
            return state.clone();
        }
    }

    let mut members: Vec<Scalar> = state
        .category_value(key)
        .and_then(FieldValue::as_list)
        .map(<[Scalar]>::to_vec)
        .unwrap_or_default();
    toggle(&mut members, member);

    let mut values = state.category_filters.clone();
    if members.is_empty() {
        values.remove(key);
    } else {
        values.insert(key.to_string(), FieldValue::List(members));
    }

    let mut next = state.clone();
    next.category_filters = settle(schema, &values);
    next
}

/// Clear the category answers; global criteria and the category stay.
pub fn reset_category_filters(state: &FilterState) -> FilterState {
    FilterState {
        category_filters: FieldValues::new(),
        ..state.clone()
    }
}

/// Return to the default state, keeping the category if `policy` says so.
pub fn reset_all(state: &FilterState, policy: ResetPolicy) -> FilterState {
    match policy {
        ResetPolicy::PreserveCategory => FilterState {
            category: state.category.clone(),
            ..FilterState::default()
        },
        ResetPolicy::ClearCategory => FilterState::default(),
    }
}

fn toggle<T: PartialEq>(members: &mut Vec<T>, member: T) {
    match members.iter().position(|m| *m == member) {
        Some(index) => {
            members.remove(index);
        }
        None => members.push(member),
    }
}

fn settle(schema: &CategoryFilterSchema, values: &FieldValues) -> FieldValues {
    let resolution = resolver::resolve(schema, values);
    if !resolution.pruned.is_empty() {
        tracing::debug!(
            category = %schema.category_key,
            pruned = ?resolution.pruned,
            "pruned invalidated filter values"
        );
    }
    resolution.retained
}
