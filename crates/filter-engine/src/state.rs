//! The canonical filter state and its global criteria.
//!
//! `FilterState` is plain data. Transitions in [`crate::reducer`] take a
//! reference and return a new value; nothing in the crate mutates a state
//! that a caller can still observe.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::value::{FieldValue, FieldValues};

pub const CATEGORY_KEY: &str = "category";
pub const MIN_PRICE_KEY: &str = "minPrice";
pub const MAX_PRICE_KEY: &str = "maxPrice";
pub const LOCATION_KEY: &str = "location";
pub const DATE_POSTED_KEY: &str = "datePosted";
pub const SORT_BY_KEY: &str = "sortBy";
pub const CONDITION_KEY: &str = "condition";
pub const DELIVERY_OPTIONS_KEY: &str = "deliveryOptions";
pub const SELLER_TYPE_KEY: &str = "sellerType";

/// Keys of the global criteria. Category schemas may not reuse them.
pub const GLOBAL_KEYS: &[&str] = &[
    CATEGORY_KEY,
    MIN_PRICE_KEY,
    MAX_PRICE_KEY,
    LOCATION_KEY,
    DATE_POSTED_KEY,
    SORT_BY_KEY,
    CONDITION_KEY,
    DELIVERY_OPTIONS_KEY,
    SELLER_TYPE_KEY,
];

/// A category as supplied by the category provider. `name` is the registry key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// How recently a listing must have been posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatePosted {
    #[serde(rename = "any")]
    Any,
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "3days")]
    ThreeDays,
    #[serde(rename = "week")]
    Week,
    #[serde(rename = "month")]
    Month,
}

impl DatePosted {
    pub fn as_str(self) -> &'static str {
        match self {
            DatePosted::Any => "any",
            DatePosted::Today => "today",
            DatePosted::ThreeDays => "3days",
            DatePosted::Week => "week",
            DatePosted::Month => "month",
        }
    }

    /// Length of the look-back window; `None` for `Any`.
    pub fn window(self) -> Option<Duration> {
        match self {
            DatePosted::Any => None,
            DatePosted::Today => Some(Duration::days(1)),
            DatePosted::ThreeDays => Some(Duration::days(3)),
            DatePosted::Week => Some(Duration::days(7)),
            DatePosted::Month => Some(Duration::days(30)),
        }
    }

    /// Earliest posting time that still matches, relative to `now`.
    pub fn posted_after(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.window().map(|w| now - w)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortBy {
    #[default]
    #[serde(rename = "newest")]
    Newest,
    #[serde(rename = "oldest")]
    Oldest,
    #[serde(rename = "price_asc")]
    PriceAsc,
    #[serde(rename = "price_desc")]
    PriceDesc,
}

impl SortBy {
    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Newest => "newest",
            SortBy::Oldest => "oldest",
            SortBy::PriceAsc => "price_asc",
            SortBy::PriceDesc => "price_desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "new")]
    New,
    #[serde(rename = "like_new")]
    LikeNew,
    #[serde(rename = "used")]
    Used,
    #[serde(rename = "for_parts")]
    ForParts,
}

impl Condition {
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::LikeNew => "like_new",
            Condition::Used => "used",
            Condition::ForParts => "for_parts",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SellerType {
    #[serde(rename = "private")]
    Private,
    #[serde(rename = "business")]
    Business,
}

impl SellerType {
    pub fn as_str(self) -> &'static str {
        match self {
            SellerType::Private => "private",
            SellerType::Business => "business",
        }
    }
}

/// A write to one global criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum GlobalField {
    Category(Option<Category>),
    MinPrice(Option<f64>),
    MaxPrice(Option<f64>),
    Location(Option<String>),
    DatePosted(Option<DatePosted>),
    SortBy(SortBy),
    Condition(Option<Condition>),
    DeliveryOptions(Vec<String>),
    SellerType(Option<SellerType>),
}

impl GlobalField {
    pub fn key(&self) -> &'static str {
        match self {
            GlobalField::Category(_) => CATEGORY_KEY,
            GlobalField::MinPrice(_) => MIN_PRICE_KEY,
            GlobalField::MaxPrice(_) => MAX_PRICE_KEY,
            GlobalField::Location(_) => LOCATION_KEY,
            GlobalField::DatePosted(_) => DATE_POSTED_KEY,
            GlobalField::SortBy(_) => SORT_BY_KEY,
            GlobalField::Condition(_) => CONDITION_KEY,
            GlobalField::DeliveryOptions(_) => DELIVERY_OPTIONS_KEY,
            GlobalField::SellerType(_) => SELLER_TYPE_KEY,
        }
    }
}

/// Every criterion the user has chosen.
///
/// `category_filters` only ever holds answers for fields that are visible in
/// the selected category's schema, and never holds an empty value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub category: Option<Category>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub location: Option<String>,
    pub date_posted: Option<DatePosted>,
    pub sort_by: SortBy,
    pub condition: Option<Condition>,
    /// Chosen delivery options in the order the user picked them.
    pub delivery_options: Vec<String>,
    pub seller_type: Option<SellerType>,
    #[serde(rename = "categorySpecificFilters")]
    pub category_filters: FieldValues,
}

impl FilterState {
    /// Registry key of the selected category.
    pub fn category_key(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }

    /// Stored answer for a category field; `None` means "not set".
    pub fn category_value(&self, key: &str) -> Option<&FieldValue> {
        self.category_filters.get(key)
    }

    pub fn is_default(&self) -> bool {
        *self == FilterState::default()
    }
}
