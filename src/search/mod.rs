pub mod types;

pub use types::{Page, SearchFilters, SortBy};

use std::cmp::Ordering;

use crate::models::Property;

impl SearchFilters {
    /// True when the property satisfies every active criterion
    pub fn matches(&self, property: &Property) -> bool {
        if let Some(location) = self.location.as_deref() {
            let needle = location.trim().to_lowercase();
            if !needle.is_empty() {
                let loc = &property.location;
                let hit = [&property.title, &loc.address, &loc.city, &loc.country]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle));
                if !hit {
                    return false;
                }
            }
        }

        let rate = property.pricing.nightly_rate;
        if self.min_price.is_some_and(|min| rate < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| rate > max) {
            return false;
        }

        if !self.property_types.is_empty() && !self.property_types.contains(&property.property_type)
        {
            return false;
        }

        if !self.amenities.iter().all(|a| property.has_amenity(a)) {
            return false;
        }

        if self.guests.is_some_and(|g| property.capacity.guests < g) {
            return false;
        }
        if self
            .min_bedrooms
            .is_some_and(|b| property.capacity.bedrooms < b)
        {
            return false;
        }
        if self.min_rating.is_some_and(|r| property.rating < r) {
            return false;
        }

        true
    }
}

/// Keep the properties matching `filters`, preserving input order
pub fn filter_properties(properties: &[Property], filters: &SearchFilters) -> Vec<Property> {
    properties
        .iter()
        .filter(|p| filters.matches(p))
        .cloned()
        .collect()
}

/// Stable in-place sort
pub fn sort_properties(properties: &mut [Property], sort: SortBy) {
    match sort {
        SortBy::Recommended => {}
        SortBy::PriceLowToHigh => properties.sort_by_key(|p| p.pricing.nightly_rate),
        SortBy::PriceHighToLow => {
            properties.sort_by(|a, b| b.pricing.nightly_rate.cmp(&a.pricing.nightly_rate))
        }
        SortBy::Rating => properties.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.review_count.cmp(&a.review_count))
        }),
        SortBy::MostReviewed => properties.sort_by(|a, b| b.review_count.cmp(&a.review_count)),
    }
}

/// Slice out a 1-based page. `per_page == 0` is treated as 1.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(per_page);
    let start = (page - 1).saturating_mul(per_page);

    let items = if start >= total {
        Vec::new()
    } else {
        items[start..(start + per_page).min(total)].to_vec()
    };

    Page {
        items,
        page,
        per_page,
        total,
        total_pages,
    }
}

/// Filter, sort and paginate in one pass
pub fn search(
    properties: &[Property],
    filters: &SearchFilters,
    sort: SortBy,
    page: usize,
    per_page: usize,
) -> Page<Property> {
    let mut hits = filter_properties(properties, filters);
    sort_properties(&mut hits, sort);
    paginate(&hits, page, per_page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PropertyType;
    use crate::sources::fixtures;

    fn ids(properties: &[Property]) -> Vec<&str> {
        properties.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn empty_filters_match_everything() {
        let all = fixtures::bundled().unwrap();
        let hits = filter_properties(&all, &SearchFilters::default());
        assert_eq!(hits.len(), all.len());
    }

    #[test]
    fn location_matches_city_or_country_substring() {
        let all = fixtures::bundled().unwrap();

        let lisbon = filter_properties(&all, &SearchFilters::default().with_location("lisb"));
        assert!(!lisbon.is_empty());
        assert!(lisbon.iter().all(|p| p.location.city == "Lisbon"));

        let portugal = filter_properties(&all, &SearchFilters::default().with_location("PORTUGAL"));
        assert!(portugal.len() >= lisbon.len());

        let blank = filter_properties(&all, &SearchFilters::default().with_location("   "));
        assert_eq!(blank.len(), all.len());
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let all = fixtures::bundled().unwrap();
        let rate = all[0].pricing.nightly_rate;
        let filters = SearchFilters::default().with_price_range(Some(rate), Some(rate));
        let hits = filter_properties(&all, &filters);
        assert!(ids(&hits).contains(&all[0].id.as_str()));
        assert!(hits.iter().all(|p| p.pricing.nightly_rate == rate));
    }

    #[test]
    fn type_set_and_amenity_subset() {
        let all = fixtures::bundled().unwrap();
        let filters = SearchFilters::default()
            .with_type(PropertyType::Cabin)
            .with_type(PropertyType::Villa)
            .with_amenity("wifi");
        let hits = filter_properties(&all, &filters);
        assert!(!hits.is_empty());
        for p in &hits {
            assert!(matches!(p.property_type, PropertyType::Cabin | PropertyType::Villa));
            assert!(p.has_amenity("WiFi"));
        }

        let impossible = SearchFilters::default().with_amenity("Helipad");
        assert!(filter_properties(&all, &impossible).is_empty());
    }

    #[test]
    fn guest_count_is_a_minimum() {
        let all = fixtures::bundled().unwrap();
        let hits = filter_properties(&all, &SearchFilters::default().with_guests(6));
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|p| p.capacity.guests >= 6));
    }

    #[test]
    fn sorts_by_price_and_rating() {
        let mut all = fixtures::bundled().unwrap();
        sort_properties(&mut all, SortBy::PriceLowToHigh);
        assert!(all
            .windows(2)
            .all(|w| w[0].pricing.nightly_rate <= w[1].pricing.nightly_rate));

        sort_properties(&mut all, SortBy::Rating);
        assert!(all.windows(2).all(|w| w[0].rating >= w[1].rating));
    }

    #[test]
    fn location_matches_title() {
        let all = fixtures::bundled().unwrap();
        let hits = filter_properties(&all, &SearchFilters::default().with_location("alfama"));
        assert_eq!(ids(&hits), vec!["prop-001"]);
    }

    #[test]
    fn bedroom_and_rating_thresholds() {
        let all = fixtures::bundled().unwrap();

        let roomy = SearchFilters {
            min_bedrooms: Some(3),
            ..Default::default()
        };
        assert_eq!(ids(&filter_properties(&all, &roomy)), vec!["prop-002", "prop-004"]);

        let top_rated = SearchFilters {
            min_rating: Some(4.8),
            ..Default::default()
        };
        assert_eq!(
            ids(&filter_properties(&all, &top_rated)),
            vec!["prop-001", "prop-004", "prop-008"]
        );
    }

    fn listing(id: &str, rate: u32, rating: f32, reviews: u32) -> Property {
        let mut property = fixtures::bundled().unwrap().remove(0);
        property.id = id.to_string();
        property.pricing.nightly_rate = rate;
        property.rating = rating;
        property.review_count = reviews;
        property
    }

    #[test]
    fn rating_ties_fall_back_to_review_count() {
        let mut properties = vec![
            listing("few", 100, 4.5, 3),
            listing("top", 100, 4.9, 1),
            listing("many", 100, 4.5, 40),
        ];
        sort_properties(&mut properties, SortBy::Rating);
        assert_eq!(ids(&properties), vec!["top", "many", "few"]);
    }

    #[test]
    fn descending_orders_keep_equal_keys_in_input_order() {
        let mut properties = vec![
            listing("a", 90, 4.0, 10),
            listing("b", 200, 4.0, 10),
            listing("c", 90, 4.0, 55),
            listing("d", 200, 4.0, 2),
        ];

        sort_properties(&mut properties, SortBy::PriceHighToLow);
        assert_eq!(ids(&properties), vec!["b", "d", "a", "c"]);

        sort_properties(&mut properties, SortBy::MostReviewed);
        assert_eq!(ids(&properties), vec!["c", "b", "a", "d"]);

        sort_properties(&mut properties, SortBy::PriceLowToHigh);
        assert_eq!(ids(&properties), vec!["c", "a", "b", "d"]);

        let before = ids(&properties).join(",");
        sort_properties(&mut properties, SortBy::Recommended);
        assert_eq!(ids(&properties).join(","), before);
    }

    #[test]
    fn paginate_handles_edges() {
        let items: Vec<u32> = (1..=5).collect();

        let first = paginate(&items, 1, 2);
        assert_eq!(first.items, vec![1, 2]);
        assert_eq!(first.total_pages, 3);

        let last = paginate(&items, 3, 2);
        assert_eq!(last.items, vec![5]);

        let past_end = paginate(&items, 9, 2);
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 5);

        let zero = paginate(&items, 0, 0);
        assert_eq!(zero.page, 1);
        assert_eq!(zero.per_page, 1);
        assert_eq!(zero.items, vec![1]);
    }

    #[test]
    fn sort_order_parses_aliases() {
        assert_eq!("price-asc".parse::<SortBy>(), Ok(SortBy::PriceLowToHigh));
        assert_eq!("most_reviewed".parse::<SortBy>(), Ok(SortBy::MostReviewed));
        assert!("random".parse::<SortBy>().is_err());
    }
}
