//! Search and duration filtering for the tour catalog.
//!
//! Durations are free text ("meio-dia", "2-4h", "dia inteiro"), so the bucket
//! filter works from an hour estimate: the first `<n>h` wins, otherwise the
//! first `<n> dia` counts as `n * 8` hours, otherwise 3 hours. The estimate is
//! an approximation tuned to the Portuguese labels in the catalog and its
//! quirks are kept as-is (an empty duration counts as 0 hours, `2H` is not
//! recognised).

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::Tour;

static HOURS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)\s*h").expect("hours pattern is valid")
});
static DAYS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)\s*dia").expect("days pattern is valid")
});

/// Hours assumed for durations like "meio-dia" that carry no number.
const DEFAULT_HOURS: u64 = 3;
const HOURS_PER_DAY: u64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationBucket {
    /// Up to 2 hours.
    Short,
    /// More than 2 and at most 5 hours.
    Medium,
    /// More than 5 hours.
    Long,
}

impl DurationBucket {
    pub const ALL: [DurationBucket; 3] = [
        DurationBucket::Short,
        DurationBucket::Medium,
        DurationBucket::Long,
    ];

    /// Parse a bucket name. Blank input means "no bucket" and also yields
    /// `None`, as does anything unrecognised.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "short" | "curta" => Some(DurationBucket::Short),
            "medium" | "medio" | "médio" | "media" | "média" => Some(DurationBucket::Medium),
            "long" | "longa" => Some(DurationBucket::Long),
            _ => None,
        }
    }

    pub fn contains(self, hours: u64) -> bool {
        match self {
            DurationBucket::Short => hours <= 2,
            DurationBucket::Medium => hours > 2 && hours <= 5,
            DurationBucket::Long => hours > 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DurationBucket::Short => "Curta (até 2h)",
            DurationBucket::Medium => "Média (3-5h)",
            DurationBucket::Long => "Longa (5h+)",
        }
    }

    /// Step through no filter → short → medium → long → no filter.
    pub fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(DurationBucket::Short),
            Some(DurationBucket::Short) => Some(DurationBucket::Medium),
            Some(DurationBucket::Medium) => Some(DurationBucket::Long),
            Some(DurationBucket::Long) => None,
        }
    }
}

impl fmt::Display for DurationBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Estimate how many hours a free-text duration stands for.
pub fn estimate_hours(duration: &str) -> u64 {
    if duration.is_empty() {
        return 0;
    }
    if let Some(hours) = first_number(&HOURS_PATTERN, duration) {
        return hours;
    }
    if let Some(days) = first_number(&DAYS_PATTERN, duration) {
        return days.saturating_mul(HOURS_PER_DAY);
    }
    DEFAULT_HOURS
}

fn first_number(pattern: &Regex, text: &str) -> Option<u64> {
    let digits = pattern.captures(text)?.get(1)?.as_str();
    // Only overflow can fail here; treat it as "very long".
    Some(digits.parse().unwrap_or(u64::MAX))
}

/// Case-insensitive substring match on name, location or description.
pub fn matches_query(tour: &Tour, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    [&tour.name, &tour.location, &tour.description]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn matches_bucket(tour: &Tour, bucket: Option<DurationBucket>) -> bool {
    match bucket {
        Some(bucket) => bucket.contains(estimate_hours(&tour.duration)),
        None => true,
    }
}

/// Tours that match both the text query and the duration bucket, in input
/// order.
pub fn filter_tours(tours: &[Tour], query: &str, bucket: Option<DurationBucket>) -> Vec<Tour> {
    tours
        .iter()
        .filter(|tour| matches_query(tour, query) && matches_bucket(tour, bucket))
        .cloned()
        .collect()
}

/// Same as [`filter_tours`] but takes the bucket by name, the way a select box
/// hands it over. Unknown or blank names apply no bucket filter.
pub fn filter_tours_by_name(tours: &[Tour], query: &str, bucket: &str) -> Vec<Tour> {
    filter_tours(tours, query, DurationBucket::parse(bucket))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed_tours;
    use crate::models::Category;

    fn tour(name: &str, duration: &str) -> Tour {
        Tour {
            id: name.to_string(),
            name: name.to_string(),
            location: "X".to_string(),
            duration: duration.to_string(),
            price: 10.0,
            category: Category::Adventure,
            description: String::new(),
            image_ref: String::new(),
            created_at: None,
        }
    }

    #[test]
    fn hour_estimates_follow_the_heuristic() {
        assert_eq!(estimate_hours("2h"), 2);
        assert_eq!(estimate_hours("2-4h"), 4);
        assert_eq!(estimate_hours("1-2h"), 2);
        assert_eq!(estimate_hours("3 h"), 3);
        assert_eq!(estimate_hours("2 dias"), 16);
        assert_eq!(estimate_hours("meio-dia"), 3);
        assert_eq!(estimate_hours("dia inteiro"), 3);
        assert_eq!(estimate_hours("manhã/tarde"), 3);
        assert_eq!(estimate_hours(""), 0);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(filter_tours(&[], "forte", Some(DurationBucket::Short)).is_empty());
        assert!(filter_tours_by_name(&[], "", "").is_empty());
    }

    #[test]
    fn no_query_and_no_bucket_keeps_everything_in_order() {
        let tours = seed_tours();
        assert_eq!(filter_tours_by_name(&tours, "", ""), tours);
    }

    #[test]
    fn three_hours_is_medium_only() {
        let tours = vec![tour("A", "3h")];
        assert_eq!(filter_tours(&tours, "", Some(DurationBucket::Medium)).len(), 1);
        assert!(filter_tours(&tours, "", Some(DurationBucket::Short)).is_empty());
        assert!(filter_tours(&tours, "", Some(DurationBucket::Long)).is_empty());
    }

    #[test]
    fn text_match_is_case_insensitive_across_fields() {
        let tours = seed_tours();
        let by_name = filter_tours(&tours, "FORTE", None);
        assert_eq!(by_name.len(), 1);
        let by_location: Vec<_> = filter_tours(&tours, "costa marques", None)
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(
            by_location,
            [
                "Forte Príncipe da Beira",
                "Cachoeira do Rio Cautário",
                "Parque Estadual Serra dos Reis"
            ]
        );
        assert_eq!(filter_tours(&tours, "araras", None).len(), 1);
    }

    #[test]
    fn query_and_bucket_combine() {
        let mut tours = seed_tours();
        tours.push(tour("Teste", "4h"));
        let medium = filter_tours_by_name(&tours, "teste", "medio");
        assert_eq!(medium.len(), 1);
        assert_eq!(medium[0].name, "Teste");
        assert!(filter_tours_by_name(&tours, "teste", "curta").is_empty());
    }

    #[test]
    fn seed_catalog_buckets() {
        let tours = seed_tours();
        let short: Vec<_> = filter_tours(&tours, "", Some(DurationBucket::Short))
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(short, ["Forte Príncipe da Beira", "Museu Madeira-Mamoré"]);
        assert!(filter_tours(&tours, "", Some(DurationBucket::Long)).is_empty());
    }

    #[test]
    fn bucket_cycle_returns_to_no_filter() {
        let mut bucket = None;
        for expected in DurationBucket::ALL {
            bucket = DurationBucket::cycle(bucket);
            assert_eq!(bucket, Some(expected));
        }
        assert_eq!(DurationBucket::cycle(bucket), None);
    }
}
