//! Query normalization -- flatten a `FilterState` into a stable query descriptor.
//!
//! The descriptor is what the search executor receives. It is built so that
//! two states meaning the same thing produce byte-identical output, which
//! makes it safe to use as a cache key or URL.
//!
//! # Rules
//!
//! - Global fields at their default are omitted (`sortBy=newest`, anything
//!   unset, and `datePosted=any`).
//! - Multi-value fields are emitted sorted and de-duplicated. The user's
//!   ordering stays in the state.
//! - Category fields are prefixed with `cf.`; ranges split into
//!   `cf.<key>.min` and `cf.<key>.max`.
//! - `-0` is emitted as `0`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::state::{
    DatePosted, FilterState, SortBy, CATEGORY_KEY, CONDITION_KEY, DATE_POSTED_KEY,
    DELIVERY_OPTIONS_KEY, LOCATION_KEY, MAX_PRICE_KEY, MIN_PRICE_KEY, SELLER_TYPE_KEY,
    SORT_BY_KEY,
};
use crate::value::{FieldValue, Scalar};

/// Prefix that keeps category field keys apart from global keys.
pub const CATEGORY_FIELD_PREFIX: &str = "cf.";

/// One value in the descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

/// Flat, key-sorted query for the search executor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryDescriptor(BTreeMap<String, QueryValue>);

impl QueryDescriptor {
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Compact JSON object with keys in sorted order.
    pub fn to_json(&self) -> String {
        // A map of strings to finite scalars always serializes.
        serde_json::to_string(&self.0).unwrap_or_default()
    }

    /// `application/x-www-form-urlencoded` rendering. Lists repeat their key.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<String> = Vec::new();
        for (key, value) in &self.0 {
            match value {
                QueryValue::Scalar(s) => pairs.push(encode_pair(key, s)),
                QueryValue::List(items) => {
                    pairs.extend(items.iter().map(|s| encode_pair(key, s)));
                }
            }
        }
        pairs.join("&")
    }

    fn insert_scalar(&mut self, key: impl Into<String>, value: Scalar) {
        self.0.insert(key.into(), QueryValue::Scalar(value.canonical()));
    }

    fn insert_list(&mut self, key: impl Into<String>, items: &[Scalar]) {
        let mut sorted: Vec<Scalar> = items.iter().map(Scalar::canonical).collect();
        sorted.sort_by(Scalar::canonical_cmp);
        sorted.dedup();
        if !sorted.is_empty() {
            self.0.insert(key.into(), QueryValue::List(sorted));
        }
    }
}

/// Flatten `state` into a [`QueryDescriptor`].
pub fn normalize(state: &FilterState) -> QueryDescriptor {
    let mut query = QueryDescriptor::default();

    if let Some(category) = &state.category {
        query.insert_scalar(CATEGORY_KEY, Scalar::Number(category.id as f64));
    }
    if let Some(min) = state.min_price {
        query.insert_scalar(MIN_PRICE_KEY, Scalar::Number(min));
    }
    if let Some(max) = state.max_price {
        query.insert_scalar(MAX_PRICE_KEY, Scalar::Number(max));
    }
    if let Some(location) = state.location.as_deref().map(str::trim) {
        if !location.is_empty() {
            query.insert_scalar(LOCATION_KEY, Scalar::text(location));
        }
    }
    if let Some(date) = state.date_posted.filter(|d| *d != DatePosted::Any) {
        query.insert_scalar(DATE_POSTED_KEY, Scalar::text(date.as_str()));
    }
    if state.sort_by != SortBy::Newest {
        query.insert_scalar(SORT_BY_KEY, Scalar::text(state.sort_by.as_str()));
    }
    if let Some(condition) = state.condition {
        query.insert_scalar(CONDITION_KEY, Scalar::text(condition.as_str()));
    }
    let delivery: Vec<Scalar> = state
        .delivery_options
        .iter()
        .map(|o| Scalar::text(o.as_str()))
        .collect();
    query.insert_list(DELIVERY_OPTIONS_KEY, &delivery);
    if let Some(seller) = state.seller_type {
        query.insert_scalar(SELLER_TYPE_KEY, Scalar::text(seller.as_str()));
    }

    for (key, value) in &state.category_filters {
        if value.is_empty() {
            continue;
        }
        let name = format!("{}{}", CATEGORY_FIELD_PREFIX, key);
        match value {
            FieldValue::Scalar(s) => query.insert_scalar(name, s.clone()),
            FieldValue::List(items) => query.insert_list(name, items),
            FieldValue::Range(range) => {
                if let Some(min) = range.min {
                    query.insert_scalar(format!("{}.min", name), Scalar::Number(min));
                }
                if let Some(max) = range.max {
                    query.insert_scalar(format!("{}.max", name), Scalar::Number(max));
                }
            }
        }
    }

    query
}

fn encode_pair(key: &str, value: &Scalar) -> String {
    format!(
        "{}={}",
        percent_encode(key),
        percent_encode(&value.to_string())
    )
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
