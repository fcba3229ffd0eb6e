//! The fixed town list and the helpers both search variants share.

use crate::state::Location;

/// The regional capitals shown as map markers and served by the fixed-list
/// search variant.
pub fn regional_capitals() -> Vec<Location> {
    [
        ("Accra", 5.6145, -0.2056),
        ("Kumasi", 6.6885, -1.6244),
        ("Tamale", 9.4000, -0.8400),
        ("Sekondi-Takoradi", 4.9433, -1.7040),
        ("Sunyani", 7.3333, -2.3333),
        ("Cape Coast", 5.1000, -1.2500),
        ("Koforidua", 6.0910, -0.2600),
        ("Ho", 6.6000, 0.4700),
        ("Bolgatanga", 10.7856, -0.8514),
        ("Wa", 10.0607, -2.5019),
        ("Damongo", 9.0833, -1.8167),
        ("Techiman", 7.5833, -1.9333),
        ("Sefwi Wiawso", 6.1969, -2.4900),
        ("Nalerigu", 10.5333, -0.3833),
        ("Dambai", 7.7833, 0.2833),
        ("Goaso", 6.8000, -2.5167),
    ]
    .into_iter()
    .map(|(name, lat, lon)| Location::new(name, lat, lon))
    .collect()
}

/// Case-insensitive substring filter over the fixed list. An empty or
/// whitespace-only query yields no results.
pub fn filter_towns(towns: &[Location], query: &str) -> Vec<Location> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    towns
        .iter()
        .filter(|town| town.label.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// The town closest to the given position, if any lies within `radius`
/// degrees. Flat-earth distance is fine at regional scale.
pub fn nearest_town(towns: &[Location], latitude: f64, longitude: f64, radius: f64) -> Option<&Location> {
    towns
        .iter()
        .map(|town| {
            let (dlat, dlon) = (town.latitude - latitude, town.longitude - longitude);
            (town, (dlat * dlat + dlon * dlon).sqrt())
        })
        .filter(|(_, distance)| *distance <= radius)
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(town, _)| town)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_matches_case_insensitive_substring() {
        let towns = regional_capitals();
        let results = filter_towns(&towns, "accra");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].label, "Accra");
    }

    #[test]
    fn test_filter_empty_query_returns_nothing() {
        let towns = regional_capitals();
        assert!(filter_towns(&towns, "").is_empty());
        assert!(filter_towns(&towns, "   ").is_empty());
    }

    #[test]
    fn test_filter_partial_matches_multiple() {
        let towns = regional_capitals();
        // "ta" hits Tamale, Sekondi-Takoradi, Bolgatanga at least
        let results = filter_towns(&towns, "ta");
        assert!(results.len() >= 3);
        assert!(results.iter().any(|t| t.label == "Tamale"));
    }

    #[test]
    fn test_nearest_town_within_radius() {
        let towns = regional_capitals();
        let hit = nearest_town(&towns, 5.62, -0.21, 0.3);
        assert_eq!(hit.map(|t| t.label.as_str()), Some("Accra"));
    }

    #[test]
    fn test_nearest_town_outside_radius() {
        let towns = regional_capitals();
        // Middle of the Gulf of Guinea, nothing nearby
        assert!(nearest_town(&towns, 1.0, 1.0, 0.3).is_none());
    }

    #[test]
    fn test_nearest_town_prefers_closest() {
        let towns = regional_capitals();
        // Between Accra (5.6145, -0.2056) and Koforidua (6.0910, -0.2600),
        // slightly closer to Koforidua.
        let hit = nearest_town(&towns, 5.95, -0.25, 1.0);
        assert_eq!(hit.map(|t| t.label.as_str()), Some("Koforidua"));
    }
}
