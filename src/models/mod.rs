use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of rental listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Apartment,
    House,
    Villa,
    Cabin,
    Condo,
    Loft,
    Studio,
}

impl PropertyType {
    pub const ALL: [PropertyType; 7] = [
        PropertyType::Apartment,
        PropertyType::House,
        PropertyType::Villa,
        PropertyType::Cabin,
        PropertyType::Condo,
        PropertyType::Loft,
        PropertyType::Studio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::House => "house",
            PropertyType::Villa => "villa",
            PropertyType::Cabin => "cabin",
            PropertyType::Condo => "condo",
            PropertyType::Loft => "loft",
            PropertyType::Studio => "studio",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        PropertyType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("unknown property type: {s}"))
    }
}

/// Geographic position of a listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Location information for a property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub address: String,
    pub city: String,
    pub country: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

/// Nightly pricing, in whole units of `currency`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pricing {
    pub nightly_rate: u32,
    #[serde(default)]
    pub cleaning_fee: u32,
    #[serde(default)]
    pub service_fee: u32,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Capacity {
    pub guests: u32,
    pub bedrooms: u32,
    pub beds: u32,
    pub bathrooms: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Host {
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub superhost: bool,
    #[serde(default)]
    pub joined: Option<i32>,
}

/// Core property data model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: String,
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub location: Location,
    pub pricing: Pricing,
    pub capacity: Capacity,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub review_count: u32,
    pub host: Host,
}

impl Property {
    /// Case-insensitive amenity lookup
    pub fn has_amenity(&self, amenity: &str) -> bool {
        let wanted = amenity.trim().to_lowercase();
        self.amenities.iter().any(|a| a.to_lowercase() == wanted)
    }
}

/// Saved property ids, persisted as a single blob
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Wishlist {
    pub property_ids: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

impl Default for Wishlist {
    fn default() -> Self {
        Self {
            property_ids: Vec::new(),
            last_updated: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewAuthor {
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Guest review of a stay
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: String,
    pub property_id: String,
    pub author: ReviewAuthor,
    pub rating: u8,
    #[serde(default)]
    pub title: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub helpful: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_type_parses_case_insensitively() {
        assert_eq!("Villa".parse::<PropertyType>(), Ok(PropertyType::Villa));
        assert_eq!(" loft ".parse::<PropertyType>(), Ok(PropertyType::Loft));
        assert!("castle".parse::<PropertyType>().is_err());
    }

    #[test]
    fn property_type_serializes_lowercase() {
        let json = serde_json::to_string(&PropertyType::Cabin).unwrap();
        assert_eq!(json, "\"cabin\"");
    }
}
