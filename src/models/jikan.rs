use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

use super::{CatalogItem, Genre, ItemId};

// ============================================================================
// Jikan v4 API Types
// ============================================================================

/// Envelope returned by `GET /anime`
#[derive(Debug, Clone, Deserialize)]
pub struct JikanSearchResponse {
    /// Entries that do not parse are dropped; the rest of the page is kept
    #[serde(default, deserialize_with = "skip_malformed")]
    pub data: Vec<JikanAnime>,
}

fn skip_malformed<'de, D>(deserializer: D) -> Result<Vec<JikanAnime>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;

    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<JikanAnime>(entry) {
            Ok(anime) => Some(anime),
            Err(e) => {
                tracing::warn!(error = %e, provider = "jikan", "Skipping malformed catalog entry");
                None
            }
        })
        .collect())
}

/// Raw anime entry as Jikan returns it. Nearly every field may be `null`.
#[derive(Debug, Clone, Deserialize)]
pub struct JikanAnime {
    pub mal_id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_japanese: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<Genre>>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(rename = "type", default)]
    pub anime_type: Option<String>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub aired: Option<JikanAired>,
    #[serde(default)]
    pub popularity: Option<u32>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub images: Option<JikanImages>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JikanAired {
    /// ISO-8601 timestamp, e.g. "2002-10-03T00:00:00+00:00"
    #[serde(default)]
    pub from: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JikanImages {
    #[serde(default)]
    pub jpg: Option<JikanImageSet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JikanImageSet {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub large_image_url: Option<String>,
}

/// Parses Jikan's air date; accepts a full RFC 3339 timestamp or a bare date
fn parse_air_date(raw: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

impl From<JikanAnime> for CatalogItem {
    fn from(anime: JikanAnime) -> Self {
        let aired_from = anime
            .aired
            .and_then(|aired| aired.from)
            .and_then(|from| parse_air_date(&from));

        let image_url = anime
            .images
            .and_then(|images| images.jpg)
            .and_then(|jpg| jpg.image_url.or(jpg.large_image_url))
            .filter(|url| !url.is_empty());

        CatalogItem {
            id: ItemId::Numeric(anime.mal_id),
            title: anime.title.unwrap_or_default(),
            title_native: anime.title_japanese.filter(|t| !t.is_empty()),
            genres: anime.genres.unwrap_or_default(),
            score: anime.score,
            kind: anime.anime_type,
            episodes: anime.episodes,
            aired_from,
            popularity: anime.popularity,
            synopsis: anime.synopsis.unwrap_or_default(),
            image_url,
        }
    }
}
