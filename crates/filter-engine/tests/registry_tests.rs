//! Tests for schema registration and lookup.

use filter_engine::catalog::{builtin_registry, AUTOMOTIVE, ELECTRONICS};
use filter_engine::schema::{CustomOptions, OptionsProvider};
use filter_engine::{
    CategoryFilterSchema, FieldOption, FilterError, FilterFieldSchema, Predicate, SchemaRegistry,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn phones() -> CategoryFilterSchema {
    CategoryFilterSchema::new("Phones")
        .with_field(FilterFieldSchema::single_select("os").options_labelled("os", &["ios", "android"]))
        .with_field(
            FilterFieldSchema::boolean("dualSim").depends_on("os", Predicate::equals("android")),
        )
}

// ── Lookup ──────────────────────────────────────────────────────────────────

#[test]
fn resolve_returns_registered_schema() {
    let registry = SchemaRegistry::with_schemas([phones()]).unwrap();

    let schema = registry.resolve(Some("Phones"));
    assert_eq!(schema.category_key, "Phones");
    assert_eq!(schema.fields.len(), 2);
}

#[test]
fn resolve_none_returns_empty_schema() {
    let registry = SchemaRegistry::with_schemas([phones()]).unwrap();
    assert!(registry.resolve(None).is_empty());
}

#[test]
fn resolve_unknown_category_returns_empty_schema() {
    let registry = SchemaRegistry::with_schemas([phones()]).unwrap();
    assert!(registry.resolve(Some("Garden")).is_empty());
}

#[test]
fn resolve_is_case_sensitive() {
    let registry = SchemaRegistry::with_schemas([phones()]).unwrap();
    assert!(registry.resolve(Some("phones")).is_empty());
    assert!(registry.resolve(Some("Phones ")).is_empty());
}

#[test]
fn categories_are_sorted() {
    let registry = builtin_registry().unwrap();
    assert_eq!(
        registry.categories(),
        vec!["Automotive", "Electronics", "Fashion", "Real Estate"]
    );
    assert_eq!(registry.len(), 4);
    assert!(registry.contains(ELECTRONICS));
    assert!(registry.contains(AUTOMOTIVE));
}

// ── Registration errors ─────────────────────────────────────────────────────

#[test]
fn duplicate_field_key_rejected() {
    let schema = CategoryFilterSchema::new("Books")
        .with_field(FilterFieldSchema::free_text("author"))
        .with_field(FilterFieldSchema::free_text("author"));

    let err = SchemaRegistry::with_schemas([schema]).unwrap_err();
    assert!(matches!(err, FilterError::DuplicateField { ref field, .. } if field == "author"));
    assert!(err.is_configuration());
}

#[test]
fn forward_dependency_rejected() {
    let schema = CategoryFilterSchema::new("Books")
        .with_field(FilterFieldSchema::free_text("isbn").depends_on("format", Predicate::IsSet))
        .with_field(
            FilterFieldSchema::single_select("format").options_labelled("format", &["paper", "ebook"]),
        );

    let err = SchemaRegistry::with_schemas([schema]).unwrap_err();
    assert!(matches!(
        err,
        FilterError::ForwardDependency { ref field, ref target, .. }
            if field == "isbn" && target == "format"
    ));
}

#[test]
fn unknown_dependency_rejected() {
    let schema = CategoryFilterSchema::new("Books")
        .with_field(FilterFieldSchema::free_text("isbn").depends_on("publisher", Predicate::IsSet));

    let err = SchemaRegistry::with_schemas([schema]).unwrap_err();
    assert!(matches!(err, FilterError::UnknownDependency { ref target, .. } if target == "publisher"));
}

#[test]
fn self_dependency_rejected() {
    let schema = CategoryFilterSchema::new("Books")
        .with_field(FilterFieldSchema::boolean("signed").depends_on("signed", Predicate::IsTrue));

    let err = SchemaRegistry::with_schemas([schema]).unwrap_err();
    assert!(matches!(err, FilterError::SelfDependency { .. }));
}

#[test]
fn options_provider_reading_later_field_rejected() {
    let schema = CategoryFilterSchema::new("Books")
        .with_field(
            FilterFieldSchema::single_select("genre")
                .options_from(OptionsProvider::by_value("language")),
        )
        .with_field(
            FilterFieldSchema::single_select("language").options_labelled("lang", &["en", "pl"]),
        );

    let err = SchemaRegistry::with_schemas([schema]).unwrap_err();
    assert!(matches!(
        err,
        FilterError::UnknownOptionsSource { ref source_field, .. } if source_field == "language"
    ));
}

#[test]
fn custom_provider_sources_are_checked() {
    let schema = CategoryFilterSchema::new("Books").with_field(
        FilterFieldSchema::single_select("genre").options_from(OptionsProvider::Custom(
            CustomOptions::new(&["shelf"], |_| Vec::new()),
        )),
    );

    let err = SchemaRegistry::with_schemas([schema]).unwrap_err();
    assert!(matches!(err, FilterError::UnknownOptionsSource { .. }));
}

#[test]
fn global_key_collision_rejected() {
    let schema = CategoryFilterSchema::new("Books")
        .with_field(FilterFieldSchema::numeric_range("minPrice"));

    let err = SchemaRegistry::with_schemas([schema]).unwrap_err();
    assert!(matches!(err, FilterError::ReservedKey { .. }));
}

#[test]
fn options_on_free_text_rejected() {
    let schema = CategoryFilterSchema::new("Books")
        .with_field(FilterFieldSchema::free_text("author").option("tolkien", "authors.tolkien"));

    let err = SchemaRegistry::with_schemas([schema]).unwrap_err();
    assert!(matches!(
        err,
        FilterError::UnexpectedOptions { kind: "free-text", .. }
    ));
}

#[test]
fn duplicate_category_rejected() {
    let mut registry = SchemaRegistry::new();
    registry.register(phones()).unwrap();

    let err = registry.register(phones()).unwrap_err();
    assert!(matches!(err, FilterError::DuplicateCategory(ref name) if name == "Phones"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn rejected_schema_is_not_registered() {
    let mut registry = SchemaRegistry::new();
    let bad = CategoryFilterSchema::new("Books")
        .with_field(FilterFieldSchema::free_text("isbn").depends_on("format", Predicate::IsSet));

    assert!(registry.register(bad).is_err());
    assert!(!registry.contains("Books"));
    assert!(registry.resolve(Some("Books")).is_empty());
}

// ── JSON documents ──────────────────────────────────────────────────────────

#[test]
fn registry_loads_from_json_document() {
    let json = r#"{
        "categories": [{
            "categoryKey": "Bikes",
            "fields": [
                {"key": "bikeType", "kind": "single-select", "options": [
                    {"value": "road", "labelKey": "bikes.road"},
                    {"value": "mtb", "labelKey": "bikes.mtb"}
                ]},
                {"key": "suspension", "kind": "radio",
                 "dependsOn": {"field": "bikeType", "predicate": {"op": "equals", "value": "mtb"}},
                 "options": [
                    {"value": "hardtail", "labelKey": "bikes.hardtail"},
                    {"value": "full", "labelKey": "bikes.full"}
                 ]},
                {"key": "groupset", "kind": "single-select",
                 "optionsProvider": {"type": "byValue", "field": "bikeType", "options": {
                    "road": [{"value": "105", "labelKey": "groupsets.105"}],
                    "mtb": [{"value": "deore", "labelKey": "groupsets.deore"}]
                 }}},
                {"key": "frameSize", "kind": "numeric-range"}
            ]
        }]
    }"#;

    let registry = SchemaRegistry::from_json(json).unwrap();
    let schema = registry.resolve(Some("Bikes"));
    assert_eq!(schema.fields.len(), 4);

    let suspension = schema.get("suspension").unwrap();
    let dependency = suspension.depends_on.as_ref().unwrap();
    assert_eq!(dependency.field, "bikeType");
    assert_eq!(dependency.predicate, Predicate::equals("mtb"));
    assert_eq!(
        suspension.options[0],
        FieldOption::new("hardtail", "bikes.hardtail")
    );
}

#[test]
fn invalid_json_document_rejected() {
    let json = r#"{"categories": [{"categoryKey": "Bikes", "fields": [
        {"key": "a", "kind": "boolean", "dependsOn": {"field": "b", "predicate": {"op": "isTrue"}}},
        {"key": "b", "kind": "boolean"}
    ]}]}"#;

    let err = SchemaRegistry::from_json(json).unwrap_err();
    assert!(matches!(err, FilterError::ForwardDependency { .. }));
}

#[test]
fn malformed_json_is_a_json_error() {
    let err = SchemaRegistry::from_json("{not json").unwrap_err();
    assert!(matches!(err, FilterError::Json(_)));
    assert!(!err.is_configuration());
}

#[test]
fn builtin_registry_roundtrips_through_json() {
    let registry = builtin_registry().unwrap();
    let json = serde_json::to_string(&registry.to_document()).unwrap();

    let reloaded = SchemaRegistry::from_json(&json).unwrap();
    assert_eq!(reloaded.categories(), registry.categories());
    for key in registry.categories() {
        assert_eq!(
            reloaded.resolve(Some(key)).fields.len(),
            registry.resolve(Some(key)).fields.len()
        );
    }
}
