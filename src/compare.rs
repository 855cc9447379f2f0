use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::error::{Result, ScoutError};
use crate::models::Property;

pub const MIN_COMPARED: usize = 2;
pub const MAX_COMPARED: usize = 4;

/// Side-by-side view of a few listings
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub properties: Vec<Property>,
    pub cheapest: String,
    pub best_rated: String,
    pub most_guests: String,
    /// Amenities every compared listing offers
    pub shared_amenities: BTreeSet<String>,
    /// Amenities only one listing offers, keyed by property id
    pub unique_amenities: BTreeMap<String, BTreeSet<String>>,
}

fn normalized(property: &Property) -> BTreeSet<String> {
    property.amenities.iter().map(|a| a.to_lowercase()).collect()
}

pub fn compare(properties: &[Property]) -> Result<Comparison> {
    if properties.len() < MIN_COMPARED {
        return Err(ScoutError::TooFewToCompare(properties.len()));
    }
    if properties.len() > MAX_COMPARED {
        return Err(ScoutError::TooManyToCompare(properties.len()));
    }

    let mut seen = HashSet::new();
    for p in properties {
        if !seen.insert(p.id.as_str()) {
            return Err(ScoutError::DuplicateInComparison(p.id.clone()));
        }
    }

    // First listing wins ties
    let cheapest = properties
        .iter()
        .reduce(|best, p| if p.pricing.nightly_rate < best.pricing.nightly_rate { p } else { best })
        .map(|p| p.id.clone())
        .unwrap_or_default();
    let best_rated = properties
        .iter()
        .reduce(|best, p| if p.rating > best.rating { p } else { best })
        .map(|p| p.id.clone())
        .unwrap_or_default();
    let most_guests = properties
        .iter()
        .reduce(|best, p| if p.capacity.guests > best.capacity.guests { p } else { best })
        .map(|p| p.id.clone())
        .unwrap_or_default();

    let sets: Vec<BTreeSet<String>> = properties.iter().map(normalized).collect();

    let shared: BTreeSet<String> = sets[0]
        .iter()
        .filter(|a| sets[1..].iter().all(|s| s.contains(*a)))
        .cloned()
        .collect();
    let shared_amenities: BTreeSet<String> = properties[0]
        .amenities
        .iter()
        .filter(|a| shared.contains(&a.to_lowercase()))
        .cloned()
        .collect();

    let unique_amenities: BTreeMap<String, BTreeSet<String>> = properties
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let only_here: BTreeSet<String> = p
                .amenities
                .iter()
                .filter(|a| {
                    let key = a.to_lowercase();
                    sets.iter()
                        .enumerate()
                        .all(|(j, s)| j == i || !s.contains(&key))
                })
                .cloned()
                .collect();
            (p.id.clone(), only_here)
        })
        .collect();

    Ok(Comparison {
        properties: properties.to_vec(),
        cheapest,
        best_rated,
        most_guests,
        shared_amenities,
        unique_amenities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::fixtures;

    fn pick(ids: &[&str]) -> Vec<Property> {
        let all = fixtures::bundled().unwrap();
        ids.iter()
            .map(|id| all.iter().find(|p| p.id == *id).unwrap().clone())
            .collect()
    }

    #[test]
    fn rejects_bad_selection_sizes() {
        assert!(matches!(compare(&pick(&["prop-001"])), Err(ScoutError::TooFewToCompare(1))));
        let five = pick(&["prop-001", "prop-002", "prop-003", "prop-004", "prop-005"]);
        assert!(matches!(compare(&five), Err(ScoutError::TooManyToCompare(5))));
        let dup = pick(&["prop-001", "prop-001"]);
        assert!(matches!(compare(&dup), Err(ScoutError::DuplicateInComparison(_))));
    }

    #[test]
    fn picks_winners_and_amenity_sets() {
        let comparison = compare(&pick(&["prop-001", "prop-004", "prop-007"])).unwrap();

        assert_eq!(comparison.cheapest, "prop-007");
        assert_eq!(comparison.best_rated, "prop-004");
        assert_eq!(comparison.most_guests, "prop-004");

        // prop-007 has no WiFi or kitchen, so nothing is shared
        assert!(comparison.shared_amenities.is_empty());
        assert!(comparison.unique_amenities["prop-001"].contains("Washer"));
        assert!(comparison.unique_amenities["prop-004"].contains("Pool"));
        assert!(comparison.unique_amenities["prop-007"].contains("Fireplace"));
        assert!(!comparison.unique_amenities["prop-004"].contains("Free parking"));
    }

    #[test]
    fn shared_amenities_ignore_case() {
        let mut listings = pick(&["prop-001", "prop-003"]);
        listings[1].amenities = ["wifi".to_string(), "kitchen".to_string()].into();
        let comparison = compare(&listings).unwrap();
        let shared: Vec<_> = comparison.shared_amenities.iter().cloned().collect();
        assert_eq!(shared, vec!["Kitchen".to_string(), "WiFi".to_string()]);
    }
}
