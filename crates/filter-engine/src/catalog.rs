//! Built-in marketplace categories.
//!
//! These schemas cover the categories the listing views ship with. They are
//! ordinary registry input, validated like any loaded document.

use crate::error::Result;
use crate::registry::SchemaRegistry;
use crate::schema::{CategoryFilterSchema, FieldOption, FilterFieldSchema, OptionsProvider, Predicate};
use crate::value::Scalar;

pub const ELECTRONICS: &str = "Electronics";
pub const AUTOMOTIVE: &str = "Automotive";
pub const REAL_ESTATE: &str = "Real Estate";
pub const FASHION: &str = "Fashion";

/// Registry holding every built-in category.
///
/// # Errors
/// Only if a built-in schema breaks a registration rule.
pub fn builtin_registry() -> Result<SchemaRegistry> {
    SchemaRegistry::with_schemas(builtin_schemas())
}

pub fn builtin_schemas() -> Vec<CategoryFilterSchema> {
    vec![electronics(), automotive(), real_estate(), fashion()]
}

fn labelled(prefix: &str, values: &[&str]) -> Vec<FieldOption> {
    values
        .iter()
        .map(|v| FieldOption::new(*v, format!("{}.{}", prefix, v)))
        .collect()
}

pub fn electronics() -> CategoryFilterSchema {
    CategoryFilterSchema::new(ELECTRONICS)
        .with_field(FilterFieldSchema::single_select("deviceType").options_labelled(
            "filters.electronics.deviceType",
            &["smartphones", "laptops", "tablets", "tvs"],
        ))
        .with_field(
            FilterFieldSchema::single_select("brand")
                .depends_on("deviceType", Predicate::IsSet)
                .options_from(
                    OptionsProvider::by_value("deviceType")
                        .when("smartphones", labelled("brands", &["apple", "samsung", "xiaomi"]))
                        .when("laptops", labelled("brands", &["apple", "dell", "lenovo"]))
                        .when("tablets", labelled("brands", &["apple", "samsung", "lenovo"]))
                        .when("tvs", labelled("brands", &["lg", "samsung", "sony"])),
                ),
        )
        .with_field(
            FilterFieldSchema::single_select("screenSize")
                .depends_on("deviceType", Predicate::one_of(["smartphones", "tablets"]))
                .options_labelled(
                    "filters.electronics.screenSize",
                    &["5in", "6in", "7in", "10in", "12in"],
                ),
        )
        .with_field(
            FilterFieldSchema::multi_select("storage")
                .depends_on(
                    "deviceType",
                    Predicate::one_of(["smartphones", "tablets", "laptops"]),
                )
                .options_labelled(
                    "filters.electronics.storage",
                    &["64gb", "128gb", "256gb", "512gb", "1tb"],
                ),
        )
        .with_field(FilterFieldSchema::boolean("warranty"))
}

pub fn automotive() -> CategoryFilterSchema {
    CategoryFilterSchema::new(AUTOMOTIVE)
        .with_field(FilterFieldSchema::multi_select("bodyType").options_labelled(
            "filters.automotive.bodyType",
            &["sedan", "hatchback", "suv", "wagon", "coupe"],
        ))
        .with_field(FilterFieldSchema::single_select("brand").options_labelled(
            "brands",
            &["audi", "bmw", "toyota", "volkswagen"],
        ))
        .with_field(
            FilterFieldSchema::multi_select("model")
                .depends_on("brand", Predicate::IsSet)
                .options_from(
                    OptionsProvider::by_value("brand")
                        .when("audi", labelled("models.audi", &["a3", "a4", "a6", "q5"]))
                        .when("bmw", labelled("models.bmw", &["series-3", "series-5", "x3", "x5"]))
                        .when("toyota", labelled("models.toyota", &["corolla", "rav4", "yaris"]))
                        .when(
                            "volkswagen",
                            labelled("models.volkswagen", &["golf", "passat", "tiguan"]),
                        ),
                ),
        )
        .with_field(FilterFieldSchema::numeric_range("year"))
        .with_field(FilterFieldSchema::numeric_range("mileage"))
        .with_field(FilterFieldSchema::multi_select("fuelType").options_labelled(
            "filters.automotive.fuelType",
            &["petrol", "diesel", "hybrid", "electric", "lpg"],
        ))
        .with_field(
            FilterFieldSchema::numeric_range("batteryRange")
                .depends_on("fuelType", Predicate::one_of(["electric", "hybrid"])),
        )
        .with_field(FilterFieldSchema::radio("gearbox").options_labelled(
            "filters.automotive.gearbox",
            &["manual", "automatic"],
        ))
}

pub fn real_estate() -> CategoryFilterSchema {
    CategoryFilterSchema::new(REAL_ESTATE)
        .with_field(
            FilterFieldSchema::radio("offerType")
                .options_labelled("filters.realEstate.offerType", &["sale", "rent"]),
        )
        .with_field(FilterFieldSchema::single_select("propertyType").options_labelled(
            "filters.realEstate.propertyType",
            &["apartment", "house", "plot", "commercial"],
        ))
        .with_field(
            FilterFieldSchema::radio("rooms")
                .depends_on("propertyType", Predicate::one_of(["apartment", "house"]))
                .option(Scalar::Number(1.0), "filters.realEstate.rooms.1")
                .option(Scalar::Number(2.0), "filters.realEstate.rooms.2")
                .option(Scalar::Number(3.0), "filters.realEstate.rooms.3")
                .option(Scalar::Number(4.0), "filters.realEstate.rooms.4plus"),
        )
        .with_field(
            FilterFieldSchema::numeric_range("floor")
                .depends_on("propertyType", Predicate::equals("apartment")),
        )
        .with_field(FilterFieldSchema::numeric_range("area"))
        .with_field(
            FilterFieldSchema::boolean("furnished")
                .depends_on("offerType", Predicate::equals("rent")),
        )
        .with_field(
            FilterFieldSchema::boolean("petsAllowed")
                .depends_on("offerType", Predicate::equals("rent")),
        )
}

pub fn fashion() -> CategoryFilterSchema {
    CategoryFilterSchema::new(FASHION)
        .with_field(
            FilterFieldSchema::radio("gender")
                .options_labelled("filters.fashion.gender", &["women", "men", "kids"]),
        )
        .with_field(
            FilterFieldSchema::single_select("clothingType")
                .depends_on("gender", Predicate::IsSet)
                .options_from(
                    OptionsProvider::by_value("gender")
                        .when(
                            "women",
                            labelled(
                                "filters.fashion.clothingType",
                                &["dresses", "tops", "trousers", "shoes"],
                            ),
                        )
                        .when(
                            "men",
                            labelled("filters.fashion.clothingType", &["shirts", "trousers", "shoes"]),
                        )
                        .when(
                            "kids",
                            labelled("filters.fashion.clothingType", &["bodysuits", "tops", "shoes"]),
                        ),
                ),
        )
        .with_field(
            FilterFieldSchema::multi_select("shoeSize")
                .depends_on("clothingType", Predicate::equals("shoes"))
                .options_labelled(
                    "filters.fashion.shoeSize",
                    &["36", "37", "38", "39", "40", "41", "42", "43", "44", "45", "46"],
                ),
        )
        .with_field(
            FilterFieldSchema::multi_select("size")
                .depends_on(
                    "clothingType",
                    Predicate::NotOneOf {
                        values: vec![Scalar::text("shoes")],
                    },
                )
                .options_labelled("filters.fashion.size", &["xs", "s", "m", "l", "xl"]),
        )
        .with_field(FilterFieldSchema::multi_select("color").options_labelled(
            "filters.fashion.color",
            &["black", "white", "red", "blue", "green"],
        ))
        .with_field(FilterFieldSchema::free_text("brandName"))
}
