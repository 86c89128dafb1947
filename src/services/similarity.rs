//! Weighted multi-factor similarity between two catalog items.
//!
//! Each factor is normalized to [0,1] on its own. Missing data on either side
//! yields a neutral 0.5 for score, year and episodes, while genres use 0.5 when
//! both sides are empty and 0.1 when only one is. The metric is not promised
//! to be symmetric; callers always pass the reference item first.

use std::collections::HashSet;

use crate::models::{CatalogItem, Genre};

/// Factor weights; they sum to 1.0
pub const GENRE_WEIGHT: f64 = 0.40;
pub const SCORE_WEIGHT: f64 = 0.20;
pub const TYPE_WEIGHT: f64 = 0.15;
pub const YEAR_WEIGHT: f64 = 0.15;
pub const EPISODE_WEIGHT: f64 = 0.10;

/// Value used by numeric factors when either side is unknown
const NEUTRAL: f64 = 0.5;
const GENRE_ONE_SIDED: f64 = 0.1;
const TYPE_MISMATCH: f64 = 0.3;

/// Spans over which a numeric difference decays from 1.0 to 0.0
const SCORE_SPAN: f64 = 10.0;
const YEAR_SPAN: f64 = 30.0;
const EPISODE_SPAN: f64 = 50.0;

/// Per-factor sub-scores, each in [0,1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityBreakdown {
    pub genre: f64,
    pub score: f64,
    pub kind: f64,
    pub year: f64,
    pub episodes: f64,
}

impl SimilarityBreakdown {
    /// Weighted sum of the factors, clamped to [0,1]
    pub fn total(&self) -> f64 {
        let sum = self.genre * GENRE_WEIGHT
            + self.score * SCORE_WEIGHT
            + self.kind * TYPE_WEIGHT
            + self.year * YEAR_WEIGHT
            + self.episodes * EPISODE_WEIGHT;
        sum.clamp(0.0, 1.0)
    }
}

/// Computes each factor for `candidate` relative to `reference`
pub fn breakdown(reference: &CatalogItem, candidate: &CatalogItem) -> SimilarityBreakdown {
    SimilarityBreakdown {
        genre: genre_overlap(&reference.genres, &candidate.genres),
        score: closeness(
            reference.declared_score(),
            candidate.declared_score(),
            SCORE_SPAN,
        ),
        kind: if reference.kind == candidate.kind {
            1.0
        } else {
            TYPE_MISMATCH
        },
        year: closeness(
            positive(reference.start_year()),
            positive(candidate.start_year()),
            YEAR_SPAN,
        ),
        episodes: closeness(
            reference.known_episodes().map(f64::from),
            candidate.known_episodes().map(f64::from),
            EPISODE_SPAN,
        ),
    }
}

/// Similarity of `candidate` to `reference` in [0,1]
pub fn similarity(reference: &CatalogItem, candidate: &CatalogItem) -> f64 {
    breakdown(reference, candidate).total()
}

/// Jaccard index over lowercase genre names
pub fn genre_overlap(a: &[Genre], b: &[Genre]) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return NEUTRAL,
        (true, false) | (false, true) => return GENRE_ONE_SIDED,
        (false, false) => {}
    }

    let left = genre_names(a);
    let right = genre_names(b);

    let intersection = left.intersection(&right).count();
    let union = left.union(&right).count();

    intersection as f64 / union.max(1) as f64
}

fn genre_names(genres: &[Genre]) -> HashSet<String> {
    genres.iter().map(|g| g.name.to_lowercase()).collect()
}

/// `1 - |a - b| / span` floored at 0, or neutral when either side is unknown
fn closeness(a: Option<f64>, b: Option<f64>, span: f64) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => (1.0 - (a - b).abs() / span).max(0.0),
        _ => NEUTRAL,
    }
}

fn positive(year: i32) -> Option<f64> {
    (year > 0).then(|| f64::from(year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const EPSILON: f64 = 1e-9;

    fn anime(
        id: u64,
        genres: &[&str],
        score: f64,
        kind: &str,
        year: i32,
        episodes: u32,
    ) -> CatalogItem {
        let mut item = CatalogItem::new(id, format!("anime {}", id));
        item.genres = genres.iter().map(|g| Genre::named(*g)).collect();
        item.score = Some(score);
        item.kind = Some(kind.to_string());
        item.aired_from = NaiveDate::from_ymd_opt(year, 1, 1);
        item.episodes = Some(episodes);
        item
    }

    #[test]
    fn test_weights_sum_to_one() {
        let sum = GENRE_WEIGHT + SCORE_WEIGHT + TYPE_WEIGHT + YEAR_WEIGHT + EPISODE_WEIGHT;
        assert!((sum - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_identical_item_scores_exactly_one() {
        let reference = anime(1, &["Action", "Drama"], 8.0, "TV", 2020, 24);
        assert_eq!(similarity(&reference, &reference), 1.0);

        let twin = anime(2, &["Action", "Drama"], 8.0, "TV", 2020, 24);
        assert_eq!(similarity(&reference, &twin), 1.0);
    }

    #[test]
    fn test_dissimilar_example() {
        let reference = anime(1, &["Action", "Drama"], 8.0, "TV", 2020, 24);
        let candidate = anime(2, &["Comedy"], 5.0, "Movie", 1990, 1);

        let parts = breakdown(&reference, &candidate);
        assert!((parts.genre - 0.0).abs() < EPSILON);
        assert!((parts.score - 0.7).abs() < EPSILON);
        assert!((parts.kind - 0.3).abs() < EPSILON);
        assert!((parts.year - 0.0).abs() < EPSILON);
        assert!((parts.episodes - 0.54).abs() < EPSILON);
        // disjoint non-empty genre sets contribute nothing
        assert!((parts.total() - 0.239).abs() < EPSILON);
    }

    #[test]
    fn test_one_sided_genres_example() {
        let reference = anime(1, &["Action", "Drama"], 8.0, "TV", 2020, 24);
        let candidate = anime(2, &[], 5.0, "Movie", 1990, 1);

        let parts = breakdown(&reference, &candidate);
        assert!((parts.genre - 0.1).abs() < EPSILON);
        assert!((parts.total() - 0.279).abs() < EPSILON);
    }

    #[test]
    fn test_both_genres_empty_is_neutral() {
        assert_eq!(genre_overlap(&[], &[]), 0.5);
    }

    #[test]
    fn test_genre_overlap_is_case_insensitive_set() {
        let a = vec![Genre::named("Action"), Genre::named("action"), Genre::named("Drama")];
        let b = vec![Genre::named("ACTION"), Genre::named("Fantasy")];
        // {action, drama} vs {action, fantasy}
        assert!((genre_overlap(&a, &b) - 1.0 / 3.0).abs() < EPSILON);
    }

    #[test]
    fn test_genre_overlap_matches_by_name_not_id() {
        let a = vec![Genre {
            id: Some(1),
            name: "Action".to_string(),
        }];
        let b = vec![Genre {
            id: Some(99),
            name: "Action".to_string(),
        }];
        assert_eq!(genre_overlap(&a, &b), 1.0);
    }

    #[test]
    fn test_missing_numeric_fields_are_neutral() {
        let reference = anime(1, &["Action"], 8.0, "TV", 2020, 24);
        let mut candidate = CatalogItem::new(2u64, "bare");
        candidate.genres = vec![Genre::named("Action")];
        candidate.kind = Some("TV".to_string());
        candidate.score = Some(0.0);

        let parts = breakdown(&reference, &candidate);
        assert_eq!(parts.score, 0.5);
        assert_eq!(parts.year, 0.5);
        assert_eq!(parts.episodes, 0.5);
        assert_eq!(parts.genre, 1.0);
        assert_eq!(parts.kind, 1.0);
    }

    #[test]
    fn test_absent_types_on_both_sides_match() {
        let a = CatalogItem::new(1u64, "a");
        let b = CatalogItem::new(2u64, "b");
        assert_eq!(breakdown(&a, &b).kind, 1.0);
    }

    #[test]
    fn test_type_comparison_is_exact() {
        let a = anime(1, &["Action"], 8.0, "TV", 2020, 24);
        let b = anime(2, &["Action"], 8.0, "tv", 2020, 24);
        assert_eq!(breakdown(&a, &b).kind, 0.3);
    }

    #[test]
    fn test_large_gaps_floor_at_zero() {
        let a = anime(1, &["Action"], 9.5, "TV", 1960, 1);
        let b = anime(2, &["Action"], 1.0, "TV", 2024, 500);
        let parts = breakdown(&a, &b);
        assert!((parts.score - 0.15).abs() < EPSILON);
        assert_eq!(parts.year, 0.0);
        assert_eq!(parts.episodes, 0.0);
    }

    #[test]
    fn test_all_fields_absent() {
        let a = CatalogItem::new(1u64, "a");
        let b = CatalogItem::new(2u64, "b");
        // 0.5 * 0.4 + 0.5 * 0.2 + 1.0 * 0.15 + 0.5 * 0.15 + 0.5 * 0.1
        assert!((similarity(&a, &b) - 0.575).abs() < EPSILON);
    }
}
