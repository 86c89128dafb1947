use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod jikan;

pub use jikan::{JikanAnime, JikanSearchResponse};

/// Identifier for a catalog item, numeric for Jikan (`mal_id`) or an opaque string
///
/// Variants never compare equal to each other: `Numeric(5)` and `Text("5")` are
/// different items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Numeric(u64),
    Text(String),
}

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemId::Numeric(id) => write!(f, "{}", id),
            ItemId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        ItemId::Numeric(id)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        ItemId::Text(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct GenreRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mal_id: Option<u64>,
    name: String,
}

/// A genre tag. Accepts either `{"mal_id": 1, "name": "Action"}` or `"Action"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GenreRepr", into = "GenreRecord")]
pub struct Genre {
    pub id: Option<u64>,
    pub name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GenreRepr {
    Record(GenreRecord),
    Name(String),
}

impl From<GenreRepr> for Genre {
    fn from(repr: GenreRepr) -> Self {
        match repr {
            GenreRepr::Record(record) => Genre {
                id: record.mal_id,
                name: record.name,
            },
            GenreRepr::Name(name) => Genre { id: None, name },
        }
    }
}

impl From<Genre> for GenreRecord {
    fn from(genre: Genre) -> Self {
        GenreRecord {
            mal_id: genre.id,
            name: genre.name,
        }
    }
}

impl Genre {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// One catalog entry, an immutable snapshot for the duration of a request
///
/// Every field but `id` and `title` may be missing; accessors fold the catalog's
/// `0 means unknown` convention into `Option`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub title_native: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub aired_from: Option<NaiveDate>,
    #[serde(default)]
    pub popularity: Option<u32>,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl CatalogItem {
    /// Creates an item with only the required fields set
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            title_native: None,
            genres: Vec::new(),
            score: None,
            kind: None,
            episodes: None,
            aired_from: None,
            popularity: None,
            synopsis: String::new(),
            image_url: None,
        }
    }

    /// Score if one was declared; zero and negatives count as absent
    pub fn declared_score(&self) -> Option<f64> {
        self.score.filter(|s| *s > 0.0)
    }

    /// Year the item started airing, 0 when unknown
    pub fn start_year(&self) -> i32 {
        self.aired_from.map(|d| d.year()).unwrap_or(0)
    }

    /// Episode count if known
    pub fn known_episodes(&self) -> Option<u32> {
        self.episodes.filter(|e| *e > 0)
    }

    /// Popularity rank if known; rank 0 is treated as missing
    pub fn popularity_rank(&self) -> Option<u32> {
        self.popularity.filter(|p| *p > 0)
    }
}

/// A catalog item with its similarity to the current reference item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub similarity: f64,
}

impl ScoredItem {
    /// Similarity as a rounded percentage for display
    pub fn match_percent(&self) -> u8 {
        (self.similarity * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// Ranked recommendations for a single reference item
///
/// Only the ranker builds one from scratch; the sorter reorders it in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecommendationList(Vec<ScoredItem>);

impl RecommendationList {
    pub(crate) fn from_ranked(items: Vec<ScoredItem>) -> Self {
        Self(items)
    }

    pub fn items(&self) -> &[ScoredItem] {
        &self.0
    }

    pub(crate) fn items_mut(&mut self) -> &mut [ScoredItem] {
        &mut self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<ScoredItem> {
        self.0
    }
}

impl From<Vec<ScoredItem>> for RecommendationList {
    /// Wraps a list the client sent back for re-sorting
    fn from(items: Vec<ScoredItem>) -> Self {
        Self(items)
    }
}

/// Secondary ordering applied to an existing recommendation list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Similarity,
    Score,
    Popularity,
}

/// Autocomplete entry for the search box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: ItemId,
    pub title: String,
    pub title_native: Option<String>,
}

impl From<CatalogItem> for Suggestion {
    fn from(item: CatalogItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            title_native: item.title_native,
        }
    }
}
