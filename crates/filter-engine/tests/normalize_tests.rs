//! Tests for query normalization.

use chrono::{TimeZone, Utc};
use filter_engine::state::{Condition, DatePosted, SellerType, SortBy};
use filter_engine::{
    normalize, Category, FieldValue, FilterState, QueryValue, Scalar,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn with_filters(pairs: &[(&str, FieldValue)]) -> FilterState {
    FilterState {
        category: Some(Category::new(5, "Automotive")),
        category_filters: pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
        ..FilterState::default()
    }
}

// ── Defaults ────────────────────────────────────────────────────────────────

#[test]
fn default_state_normalizes_to_empty() {
    let query = normalize(&FilterState::default());
    assert!(query.is_empty());
    assert_eq!(query.to_json(), "{}");
    assert_eq!(query.to_query_string(), "");
}

#[test]
fn default_sort_and_any_date_are_omitted() {
    let state = FilterState {
        sort_by: SortBy::Newest,
        date_posted: Some(DatePosted::Any),
        ..FilterState::default()
    };
    assert!(normalize(&state).is_empty());
}

#[test]
fn non_default_globals_are_emitted() {
    let state = FilterState {
        category: Some(Category::new(12, "Fashion")),
        min_price: Some(10.0),
        max_price: Some(99.5),
        location: Some(" Gdańsk ".into()),
        date_posted: Some(DatePosted::ThreeDays),
        sort_by: SortBy::PriceAsc,
        condition: Some(Condition::LikeNew),
        delivery_options: vec!["pickup".into(), "courier".into()],
        seller_type: Some(SellerType::Private),
        ..FilterState::default()
    };

    let query = normalize(&state);
    assert_eq!(
        query.to_json(),
        r#"{"category":12,"condition":"like_new","datePosted":"3days","deliveryOptions":["courier","pickup"],"location":"Gdańsk","maxPrice":99.5,"minPrice":10,"sellerType":"private","sortBy":"price_asc"}"#
    );
}

// ── Category fields ─────────────────────────────────────────────────────────

#[test]
fn category_fields_are_prefixed() {
    let state = with_filters(&[
        ("brand", FieldValue::text("bmw")),
        ("model", FieldValue::list(["x5", "series-3"])),
    ]);

    let query = normalize(&state);
    assert_eq!(
        query.get("cf.brand"),
        Some(&QueryValue::Scalar(Scalar::text("bmw")))
    );
    assert_eq!(
        query.get("cf.model"),
        Some(&QueryValue::List(vec![
            Scalar::text("series-3"),
            Scalar::text("x5")
        ]))
    );
    assert!(!query.contains_key("brand"));
}

#[test]
fn ranges_split_into_min_and_max() {
    let state = with_filters(&[
        ("year", FieldValue::range(Some(2010.0), Some(2020.0))),
        ("mileage", FieldValue::range(None, Some(150000.0))),
    ]);

    let query = normalize(&state);
    assert_eq!(
        query.to_query_string(),
        "category=5&cf.mileage.max=150000&cf.year.max=2020&cf.year.min=2010"
    );
}

#[test]
fn booleans_and_numbers_render_plainly() {
    let state = with_filters(&[
        ("furnished", FieldValue::flag(true)),
        ("rooms", FieldValue::number(3.0)),
        ("ratio", FieldValue::number(-0.0)),
    ]);

    assert_eq!(
        normalize(&state).to_query_string(),
        "category=5&cf.furnished=true&cf.ratio=0&cf.rooms=3"
    );
}

#[test]
fn query_string_is_percent_encoded() {
    let state = FilterState {
        location: Some("Zielona Góra & okolice".into()),
        delivery_options: vec!["pickup".into(), "in person".into()],
        ..FilterState::default()
    };

    assert_eq!(
        normalize(&state).to_query_string(),
        "deliveryOptions=in%20person&deliveryOptions=pickup&location=Zielona%20G%C3%B3ra%20%26%20okolice"
    );
}

// ── Determinism ─────────────────────────────────────────────────────────────

#[test]
fn multi_select_order_does_not_change_output() {
    let a = with_filters(&[("fuelType", FieldValue::list(["diesel", "lpg", "hybrid"]))]);
    let b = with_filters(&[("fuelType", FieldValue::list(["hybrid", "diesel", "lpg"]))]);

    assert_eq!(normalize(&a).to_json(), normalize(&b).to_json());
    assert_eq!(normalize(&a).to_query_string(), normalize(&b).to_query_string());
}

#[test]
fn delivery_order_does_not_change_output() {
    let a = FilterState {
        delivery_options: vec!["courier".into(), "locker".into(), "pickup".into()],
        ..FilterState::default()
    };
    let b = FilterState {
        delivery_options: vec!["pickup".into(), "courier".into(), "locker".into()],
        ..FilterState::default()
    };
    assert_eq!(normalize(&a), normalize(&b));
    assert_eq!(normalize(&a).to_json(), normalize(&b).to_json());
}

#[test]
fn normalize_does_not_reorder_state() {
    let state = with_filters(&[("fuelType", FieldValue::list(["lpg", "diesel"]))]);
    let _ = normalize(&state);
    assert_eq!(
        state.category_value("fuelType"),
        Some(&FieldValue::list(["lpg", "diesel"]))
    );
}

#[test]
fn mixed_scalar_lists_sort_by_type_then_value() {
    let state = with_filters(&[(
        "tags",
        FieldValue::List(vec![
            Scalar::text("b"),
            Scalar::Number(2.0),
            Scalar::Bool(true),
            Scalar::text("a"),
            Scalar::Number(-1.0),
        ]),
    )]);

    assert_eq!(
        normalize(&state).to_json(),
        r#"{"category":5,"cf.tags":[true,-1,2,"a","b"]}"#
    );
}

#[test]
fn json_and_query_string_agree_on_numbers() {
    let state = FilterState {
        min_price: Some(-0.0),
        max_price: Some(20000.0),
        ..with_filters(&[
            ("year", FieldValue::range(Some(2010.0), Some(2015.5))),
            ("doors", FieldValue::number(4.0)),
        ])
    };
    let query = normalize(&state);

    assert_eq!(
        query.to_json(),
        r#"{"category":5,"cf.doors":4,"cf.year.max":2015.5,"cf.year.min":2010,"maxPrice":20000,"minPrice":0}"#
    );
    assert_eq!(
        query.to_query_string(),
        "category=5&cf.doors=4&cf.year.max=2015.5&cf.year.min=2010&maxPrice=20000&minPrice=0"
    );
}

#[test]
fn descriptor_roundtrips_through_json() {
    let state = with_filters(&[
        ("brand", FieldValue::text("audi")),
        ("model", FieldValue::list(["a4", "a3"])),
    ]);
    let query = normalize(&state);

    let parsed: filter_engine::QueryDescriptor = serde_json::from_str(&query.to_json()).unwrap();
    assert_eq!(parsed, query);
}

// ── Date windows ────────────────────────────────────────────────────────────

#[test]
fn date_posted_cutoffs() {
    let now = Utc.with_ymd_and_hms(2026, 3, 16, 12, 0, 0).unwrap();

    assert_eq!(DatePosted::Any.posted_after(now), None);
    assert_eq!(
        DatePosted::Today.posted_after(now),
        Some(Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap())
    );
    assert_eq!(
        DatePosted::Week.posted_after(now),
        Some(Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap())
    );
    assert_eq!(
        DatePosted::Month.posted_after(now),
        Some(Utc.with_ymd_and_hms(2026, 2, 14, 12, 0, 0).unwrap())
    );
}

#[test]
fn state_serializes_with_camel_case_keys() {
    let state = with_filters(&[("brand", FieldValue::text("bmw"))]);
    let json = serde_json::to_value(&state).unwrap();

    assert_eq!(json["categorySpecificFilters"]["brand"], "bmw");
    assert_eq!(json["sortBy"], "newest");
    assert!(json.get("minPrice").is_some());

    let back: FilterState = serde_json::from_value(json).unwrap();
    assert_eq!(back, state);
}
