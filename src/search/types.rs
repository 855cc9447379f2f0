use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::PropertyType;

/// Search criteria for browsing listings.
///
/// Every field is optional; an unset field places no constraint on results.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchFilters {
    /// Substring of the title, address, city or country
    pub location: Option<String>,
    /// Minimum nightly rate
    pub min_price: Option<u32>,
    /// Maximum nightly rate
    pub max_price: Option<u32>,
    /// Accepted property types, empty means any
    #[serde(default)]
    pub property_types: BTreeSet<PropertyType>,
    /// Amenities that must all be present
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    /// Number of guests the property must sleep
    pub guests: Option<u32>,
    pub min_bedrooms: Option<u32>,
    pub min_rating: Option<f32>,
}

impl SearchFilters {
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_price_range(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn with_type(mut self, property_type: PropertyType) -> Self {
        self.property_types.insert(property_type);
        self
    }

    pub fn with_amenity(mut self, amenity: impl Into<String>) -> Self {
        self.amenities.insert(amenity.into());
        self
    }

    pub fn with_guests(mut self, guests: u32) -> Self {
        self.guests = Some(guests);
        self
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Recommended,
    PriceLowToHigh,
    PriceHighToLow,
    Rating,
    MostReviewed,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "recommended" => Ok(SortBy::Recommended),
            "price_asc" | "price_low_to_high" => Ok(SortBy::PriceLowToHigh),
            "price_desc" | "price_high_to_low" => Ok(SortBy::PriceHighToLow),
            "rating" => Ok(SortBy::Rating),
            "reviews" | "most_reviewed" => Ok(SortBy::MostReviewed),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortBy::Recommended => "recommended",
            SortBy::PriceLowToHigh => "price_asc",
            SortBy::PriceHighToLow => "price_desc",
            SortBy::Rating => "rating",
            SortBy::MostReviewed => "reviews",
        };
        f.write_str(name)
    }
}

/// One page of a result set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}
