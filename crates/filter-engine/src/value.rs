//! Filter values -- the scalars, lists and ranges stored per category field.

use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Category field values keyed by field key.
///
/// A `BTreeMap` keeps iteration order independent of insertion order, so two
/// states holding the same answers compare and serialize identically.
pub type FieldValues = BTreeMap<String, FieldValue>;

/// A single primitive value: an option value, a free-text answer or a number.
///
/// Whole numbers serialize as JSON integers (`2`, not `2.0`), matching the
/// query-string rendering.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    pub fn text(s: impl Into<String>) -> Self {
        Scalar::Text(s.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Total order used wherever output has to be deterministic.
    ///
    /// Booleans sort before numbers, numbers before text. `-0.0` and `0.0`
    /// compare equal.
    pub fn canonical_cmp(&self, other: &Scalar) -> Ordering {
        fn rank(s: &Scalar) -> u8 {
            match s {
                Scalar::Bool(_) => 0,
                Scalar::Number(_) => 1,
                Scalar::Text(_) => 2,
            }
        }
        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a.cmp(b),
            (Scalar::Number(a), Scalar::Number(b)) => {
                canonical_number(*a).total_cmp(&canonical_number(*b))
            }
            (Scalar::Text(a), Scalar::Text(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }

    /// Copy of the scalar with `-0.0` folded into `0.0`.
    pub fn canonical(&self) -> Scalar {
        match self {
            Scalar::Number(n) => Scalar::Number(canonical_number(*n)),
            other => other.clone(),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Number(n) => match as_integer(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Scalar::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => f.write_str(&format_number(*n)),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// Inclusive numeric bounds for a numeric-range field. Either end may be open.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumericRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl NumericRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// The value stored for one category field.
///
/// The shape follows the field kind: a scalar for single-select, radio,
/// boolean and free-text fields, a list for multi-select fields, and a range
/// (or a single number) for numeric-range fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
    Range(NumericRange),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Scalar(Scalar::Text(s.into()))
    }

    pub fn number(n: f64) -> Self {
        FieldValue::Scalar(Scalar::Number(n))
    }

    pub fn flag(b: bool) -> Self {
        FieldValue::Scalar(Scalar::Bool(b))
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }

    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        FieldValue::Range(NumericRange::new(min, max))
    }

    /// True for the "not set" sentinels: an empty list, an open range, or
    /// blank text. Such values are never stored.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Scalar(Scalar::Text(s)) => s.trim().is_empty(),
            FieldValue::Scalar(_) => false,
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Range(range) => range.is_open(),
        }
    }

    /// True when the value is `candidate` or, for lists, holds it.
    pub fn matches(&self, candidate: &Scalar) -> bool {
        match self {
            FieldValue::Scalar(s) => s == candidate,
            FieldValue::List(items) => items.contains(candidate),
            FieldValue::Range(_) => false,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Scalar]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<Scalar> for FieldValue {
    fn from(s: Scalar) -> Self {
        FieldValue::Scalar(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::flag(b)
    }
}

impl From<NumericRange> for FieldValue {
    fn from(r: NumericRange) -> Self {
        FieldValue::Range(r)
    }
}

fn canonical_number(n: f64) -> f64 {
    if n == 0.0 {
        0.0
    } else {
        n
    }
}

/// Largest magnitude below which every integer is exactly representable.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// The integer a whole, finite number stands for. `-0` maps to `0`.
fn as_integer(n: f64) -> Option<i64> {
    (n.is_finite() && n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER).then_some(n as i64)
}

/// Format a number without exponent or trailing zeros; `-0` becomes `0`.
pub(crate) fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "null".to_string();
    }
    let n = canonical_number(n);
    if let Some(i) = as_integer(n) {
        return i.to_string();
    }
    let s = format!("{}", n);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}
