//! Parsing raw UI input into well-typed values.
//!
//! The reducer assumes its input is already well-typed. These helpers are the
//! boundary that rejects what a text box or query string can produce but a
//! filter cannot hold (non-numeric prices, inverted ranges).

use crate::error::{FilterError, Result};
use crate::resolver::ResolvedField;
use crate::schema::FieldKind;
use crate::value::{FieldValue, NumericRange, Scalar};

/// Parse a price. Blank input means "no bound". A comma decimal separator is
/// accepted.
///
/// # Errors
/// `FilterError::InvalidInput` for non-numeric, non-finite or negative input.
pub fn parse_price(field: &str, raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value = parse_number(field, trimmed)?;
    if value < 0.0 {
        return Err(invalid(field, format!("'{}' is negative", trimmed)));
    }
    Ok(Some(value))
}

/// Check that a price pair is ordered.
///
/// # Errors
/// `FilterError::InvertedPriceRange` when both bounds are set and `min > max`.
pub fn price_bounds(min: Option<f64>, max: Option<f64>) -> Result<(Option<f64>, Option<f64>)> {
    match (min, max) {
        (Some(lo), Some(hi)) if lo > hi => Err(FilterError::InvertedPriceRange { min: lo, max: hi }),
        bounds => Ok(bounds),
    }
}

/// Parse raw text for a visible category field according to its kind.
///
/// - boolean: `true`/`false`/`1`/`0`/`yes`/`no`
/// - numeric-range: `min..max` with either side optional, or a single number
/// - multi-select: comma-separated members
/// - single-select / radio: one member
/// - free-text: the trimmed text
///
/// Members are matched against the field's current options by their textual
/// form, so `"2"` selects a numeric option `2`. Blank input yields `None`.
///
/// # Errors
/// `FilterError::InvalidInput` for unparseable booleans or numbers and for
/// inverted ranges.
pub fn parse_field_value(field: &ResolvedField<'_>, raw: &str) -> Result<Option<FieldValue>> {
    let key = field.key();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value = match field.field.kind {
        FieldKind::Boolean => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => FieldValue::flag(true),
            "false" | "0" | "no" => FieldValue::flag(false),
            other => return Err(invalid(key, format!("'{}' is not a boolean", other))),
        },
        FieldKind::NumericRange => FieldValue::Range(parse_range(key, trimmed)?),
        FieldKind::FreeText => FieldValue::text(trimmed),
        FieldKind::SingleSelect | FieldKind::Radio => {
            FieldValue::Scalar(match_option(field, trimmed))
        }
        FieldKind::MultiSelect => FieldValue::List(
            trimmed
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(|m| match_option(field, m))
                .collect(),
        ),
    };

    Ok((!value.is_empty()).then_some(value))
}

fn parse_range(field: &str, raw: &str) -> Result<NumericRange> {
    let Some((lo, hi)) = raw.split_once("..") else {
        let n = parse_number(field, raw)?;
        return Ok(NumericRange::new(Some(n), Some(n)));
    };
    let bound = |s: &str| -> Result<Option<f64>> {
        let s = s.trim();
        if s.is_empty() {
            Ok(None)
        } else {
            parse_number(field, s).map(Some)
        }
    };
    let range = NumericRange::new(bound(lo)?, bound(hi)?);
    if let (Some(min), Some(max)) = (range.min, range.max) {
        if min > max {
            return Err(invalid(field, format!("range {}..{} is inverted", min, max)));
        }
    }
    Ok(range)
}

fn parse_number(field: &str, raw: &str) -> Result<f64> {
    let normalized = raw.replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(invalid(field, format!("'{}' is not a number", raw))),
    }
}

fn match_option(field: &ResolvedField<'_>, raw: &str) -> Scalar {
    field
        .effective_options
        .iter()
        .find(|o| o.value.to_string() == raw)
        .map(|o| o.value.clone())
        .unwrap_or_else(|| Scalar::text(raw))
}

fn invalid(field: &str, message: String) -> FilterError {
    FilterError::InvalidInput {
        field: field.to_string(),
        message,
    }
}
